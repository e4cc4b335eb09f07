//! Domain models for Alumnet.
//!
//! These are the core types shared across all crates.

pub mod registration;
pub mod role;
pub mod session;
pub mod user;
pub mod verification;
