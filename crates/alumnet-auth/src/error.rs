//! Authentication error types.

use alumnet_core::error::AlumnetError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email and password are required")]
    MissingCredentials,

    #[error("email address has not been verified")]
    EmailNotVerified,

    #[error("account is suspended")]
    AccountSuspended,

    #[error("account awaits institution approval")]
    PendingApproval,

    #[error("email is already registered: {0}")]
    AlreadyRegistered(String),

    #[error("no pending registration for this address")]
    NoPendingRegistration,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for AlumnetError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AlreadyRegistered(email) => AlumnetError::AlreadyRegistered { email },
            AuthError::NoPendingRegistration | AuthError::MissingCredentials => {
                AlumnetError::Validation {
                    message: err.to_string(),
                }
            }
            AuthError::InvalidCredentials
            | AuthError::EmailNotVerified
            | AuthError::AccountSuspended
            | AuthError::PendingApproval => AlumnetError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::TokenExpired | AuthError::TokenInvalid(_) => {
                AlumnetError::AuthenticationFailed {
                    reason: err.to_string(),
                }
            }
            AuthError::Crypto(msg) => AlumnetError::Crypto(msg),
        }
    }
}
