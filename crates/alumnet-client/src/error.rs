//! Client workflow errors. Every variant is recoverable by user
//! retry; nothing here crosses a component boundary as a panic.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    /// Pre-network structural validation; one message per violated
    /// rule. Never reaches the network.
    #[error("{}", .0.join("; "))]
    Validation(Vec<String>),

    /// Transport failure or a non-2xx answer without a parseable body.
    #[error("network error: {0}")]
    Network(String),

    /// HTTP 429 — the server's throttle, distinct from input errors so
    /// the UI can advise "try later" rather than "fix your input".
    #[error("too many requests, please try again later")]
    RateLimited,

    /// The store rejected the request; backend `errors[]` messages are
    /// joined into one display string.
    #[error("{0}")]
    StoreValidation(String),

    /// Code or link invalid/expired. The local draft survives so the
    /// user can retry or request a resend.
    #[error("{0}")]
    Verification(String),

    #[error("no pending registration to verify or resend")]
    NoPendingRegistration,

    #[error("email and password are required")]
    MissingCredentials,

    /// Advisory local lockout after repeated login failures. The
    /// server's throttle is the real control.
    #[error("too many failed attempts, try again in {remaining_minutes} minute(s)")]
    LockedOut { remaining_minutes: i64 },
}
