//! Verification tokens — proof of email ownership.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Shape of a verification credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Six-digit numeric one-time code, typed by the user.
    Otp,
    /// Opaque URL-safe token, embedded in an emailed link.
    LinkToken,
}

/// What a token proves once consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    EmailVerification,
    PasswordReset,
}

impl TokenPurpose {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenPurpose::EmailVerification => "email_verification",
            TokenPurpose::PasswordReset => "password_reset",
        }
    }

    pub fn parse(s: &str) -> Option<TokenPurpose> {
        match s {
            "email_verification" => Some(TokenPurpose::EmailVerification),
            "password_reset" => Some(TokenPurpose::PasswordReset),
            _ => None,
        }
    }
}

/// The single active token for an `(email, purpose)` pair. Reissuing
/// replaces it; consumption is one-shot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationToken {
    pub email: String,
    pub value: String,
    pub kind: TokenKind,
    pub purpose: TokenPurpose,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub consumed: bool,
}

#[derive(Debug, Clone)]
pub struct IssueToken {
    pub email: String,
    pub value: String,
    pub kind: TokenKind,
    pub purpose: TokenPurpose,
    pub expires_at: DateTime<Utc>,
}

/// A submitted verification credential, tagged at the call site by the
/// flow that produced it (code entry form vs. emailed link).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationCode {
    Otp(String),
    LinkToken(String),
}

impl VerificationCode {
    pub fn value(&self) -> &str {
        match self {
            VerificationCode::Otp(v) | VerificationCode::LinkToken(v) => v,
        }
    }

    pub fn kind(&self) -> TokenKind {
        match self {
            VerificationCode::Otp(_) => TokenKind::Otp,
            VerificationCode::LinkToken(_) => TokenKind::LinkToken,
        }
    }

    /// Convenience for entry points that only have the raw string
    /// (e.g. a pasted value): exactly six ASCII digits is an OTP,
    /// anything else a link token. Prefer tagging at the call site.
    pub fn from_raw(raw: &str) -> Self {
        if raw.len() == 6 && raw.bytes().all(|b| b.is_ascii_digit()) {
            VerificationCode::Otp(raw.to_string())
        } else {
            VerificationCode::LinkToken(raw.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_digits_is_an_otp() {
        assert_eq!(
            VerificationCode::from_raw("042137"),
            VerificationCode::Otp("042137".into())
        );
    }

    #[test]
    fn anything_else_is_a_link_token() {
        for raw in ["42137", "0421371", "abc123", "Q4JtY2xs3vVbkGc"] {
            assert_eq!(
                VerificationCode::from_raw(raw),
                VerificationCode::LinkToken(raw.into()),
                "{raw} should not parse as an OTP"
            );
        }
    }
}
