//! SurrealDB repository implementations for the `alumnet-core` traits.

mod pending;
mod user;
mod verification;

pub use pending::SurrealPendingRegistrationRepository;
pub use user::SurrealUserRepository;
pub use verification::SurrealVerificationTokenRepository;
