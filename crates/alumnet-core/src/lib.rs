//! Alumnet Core — domain models, error taxonomy, and repository traits
//! shared by the credential store, the auth services, and the client
//! onboarding workflow.

pub mod error;
pub mod models;
pub mod repository;

pub use error::{AlumnetError, AlumnetResult, FieldError};
