//! HTTP request handlers.

pub mod approval;
pub mod auth;
