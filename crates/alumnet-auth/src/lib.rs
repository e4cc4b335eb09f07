//! Alumnet Auth — registration, email verification with auto-login,
//! the alumni approval gate, password login, and JWT session tokens.

pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthService, LoginOutput, RegisterOutput, VerifyOutput};
pub use token::SessionClaims;
