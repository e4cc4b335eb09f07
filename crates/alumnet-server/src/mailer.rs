//! Email delivery seam.
//!
//! The service hands issued tokens to a [`Mailer`]; production wires a
//! real provider behind this trait, development and tests use
//! [`LogMailer`], which writes the would-be email to the log.

use alumnet_core::models::verification::{TokenKind, VerificationToken};
use tracing::info;

pub trait Mailer: Send + Sync {
    fn send_verification(&self, token: &VerificationToken);
    fn send_password_reset(&self, token: &VerificationToken);
}

/// Logs outgoing mail instead of sending it.
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send_verification(&self, token: &VerificationToken) {
        match token.kind {
            TokenKind::Otp => info!(
                email = %token.email,
                code = %token.value,
                expires_at = %token.expires_at,
                "verification code email (not sent)"
            ),
            TokenKind::LinkToken => info!(
                email = %token.email,
                token = %token.value,
                expires_at = %token.expires_at,
                "verification link email (not sent)"
            ),
        }
    }

    fn send_password_reset(&self, token: &VerificationToken) {
        info!(
            email = %token.email,
            token = %token.value,
            expires_at = %token.expires_at,
            "password reset email (not sent)"
        );
    }
}
