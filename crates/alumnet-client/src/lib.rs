//! Alumnet client — the frontend-side onboarding and login workflows:
//! pre-network validation, the pending-registration draft, email
//! verification with auto-login, advisory login lockout, and
//! role/status-based routing.

pub mod api;
pub mod error;
pub mod flow;
pub mod lockout;
pub mod routes;
pub mod state;

pub use api::{CredentialApi, HttpCredentialApi, StoreResponse};
pub use error::FlowError;
pub use flow::{AuthFlow, LoginOutcome, RegisterOutcome, VerifyOutcome};
pub use routes::Route;
pub use state::{AuthState, ClientSession, ClientUser};
