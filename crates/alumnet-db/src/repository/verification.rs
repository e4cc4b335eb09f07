//! SurrealDB implementation of [`VerificationTokenRepository`].
//!
//! Tokens are keyed by `(email, purpose)`, so reissuing replaces the
//! previous token and only the most recently issued value can succeed.
//! Consumption is one-shot: a compare-and-set on `consumed = false`
//! guards against replay. Code comparison is constant-time.

use alumnet_core::error::{AlumnetError, AlumnetResult};
use alumnet_core::models::verification::{
    IssueToken, TokenKind, TokenPurpose, VerificationToken,
};
use alumnet_core::repository::VerificationTokenRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct TokenRow {
    email: String,
    value: String,
    kind: String,
    purpose: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    consumed: bool,
}

fn kind_to_string(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Otp => "otp",
        TokenKind::LinkToken => "link_token",
    }
}

fn parse_kind(s: &str) -> Result<TokenKind, DbError> {
    match s {
        "otp" => Ok(TokenKind::Otp),
        "link_token" => Ok(TokenKind::LinkToken),
        other => Err(DbError::Decode(format!("unknown token kind: {other}"))),
    }
}

impl TokenRow {
    fn try_into_token(self) -> Result<VerificationToken, DbError> {
        let kind = parse_kind(&self.kind)?;
        let purpose = TokenPurpose::parse(&self.purpose)
            .ok_or_else(|| DbError::Decode(format!("unknown purpose: {}", self.purpose)))?;
        Ok(VerificationToken {
            email: self.email,
            value: self.value,
            kind,
            purpose,
            issued_at: self.issued_at,
            expires_at: self.expires_at,
            consumed: self.consumed,
        })
    }
}

fn record_key(email: &str, purpose: TokenPurpose) -> String {
    format!("{}:{}", email.trim().to_lowercase(), purpose.as_str())
}

/// SurrealDB implementation of the verification-token repository.
#[derive(Clone)]
pub struct SurrealVerificationTokenRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealVerificationTokenRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> VerificationTokenRepository for SurrealVerificationTokenRepository<C> {
    async fn replace(&self, input: IssueToken) -> AlumnetResult<VerificationToken> {
        let email = input.email.trim().to_lowercase();
        let key = record_key(&email, input.purpose);

        let result = self
            .db
            .query(
                "UPSERT type::record('verification_token', $key) SET \
                 email = $email, value = $value, kind = $kind, \
                 purpose = $purpose, issued_at = time::now(), \
                 expires_at = $expires_at, consumed = false",
            )
            .bind(("key", key.clone()))
            .bind(("email", email))
            .bind(("value", input.value))
            .bind(("kind", kind_to_string(input.kind).to_string()))
            .bind(("purpose", input.purpose.as_str().to_string()))
            .bind(("expires_at", input.expires_at))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<TokenRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "verification_token".into(),
            id: key,
        })?;

        Ok(row.try_into_token()?)
    }

    async fn get_active(
        &self,
        email: &str,
        purpose: TokenPurpose,
    ) -> AlumnetResult<VerificationToken> {
        let key = record_key(email, purpose);

        let mut result = self
            .db
            .query("SELECT * FROM type::record('verification_token', $key)")
            .bind(("key", key.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TokenRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "verification_token".into(),
            id: key,
        })?;

        Ok(row.try_into_token()?)
    }

    async fn consume(
        &self,
        email: &str,
        value: &str,
        purpose: TokenPurpose,
    ) -> AlumnetResult<VerificationToken> {
        let key = record_key(email, purpose);

        let token = match self.get_active(email, purpose).await {
            Ok(t) => t,
            Err(AlumnetError::NotFound { .. }) => {
                return Err(AlumnetError::Verification(
                    "no verification code found for this address".into(),
                ));
            }
            Err(e) => return Err(e),
        };

        if token.consumed {
            return Err(AlumnetError::Verification(
                "verification code has already been used".into(),
            ));
        }
        if token.expires_at <= Utc::now() {
            return Err(AlumnetError::Verification(
                "verification code has expired".into(),
            ));
        }

        let matches: bool =
            subtle::ConstantTimeEq::ct_eq(value.as_bytes(), token.value.as_bytes()).into();
        if !matches {
            return Err(AlumnetError::Verification(
                "invalid verification code".into(),
            ));
        }

        // One-shot guarantee: only the first consumer flips the flag.
        let mut result = self
            .db
            .query(
                "UPDATE type::record('verification_token', $key) SET \
                 consumed = true \
                 WHERE consumed = false AND value = $value",
            )
            .bind(("key", key))
            .bind(("value", value.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TokenRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| {
            AlumnetError::Verification("verification code has already been used".into())
        })?;

        Ok(row.try_into_token()?)
    }
}
