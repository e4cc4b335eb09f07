//! Verification-token semantics: single active token per
//! (email, purpose), last-writer-wins on reissue, one-shot
//! consumption, expiry.

use alumnet_core::error::AlumnetError;
use alumnet_core::models::verification::{IssueToken, TokenKind, TokenPurpose};
use alumnet_core::repository::VerificationTokenRepository;
use alumnet_db::repository::SurrealVerificationTokenRepository;
use chrono::{Duration, Utc};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

async fn setup() -> SurrealVerificationTokenRepository<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    alumnet_db::run_migrations(&db).await.unwrap();
    SurrealVerificationTokenRepository::new(db)
}

fn otp(email: &str, value: &str) -> IssueToken {
    IssueToken {
        email: email.into(),
        value: value.into(),
        kind: TokenKind::Otp,
        purpose: TokenPurpose::EmailVerification,
        expires_at: Utc::now() + Duration::minutes(15),
    }
}

#[tokio::test]
async fn issue_and_consume() {
    let repo = setup().await;
    repo.replace(otp("user@x.edu", "042137")).await.unwrap();

    let consumed = repo
        .consume("user@x.edu", "042137", TokenPurpose::EmailVerification)
        .await
        .unwrap();
    assert!(consumed.consumed);
}

#[tokio::test]
async fn resend_invalidates_previous_token() {
    let repo = setup().await;
    repo.replace(otp("user@x.edu", "111111")).await.unwrap();
    repo.replace(otp("user@x.edu", "222222")).await.unwrap();

    // The superseded code no longer works.
    let err = repo
        .consume("user@x.edu", "111111", TokenPurpose::EmailVerification)
        .await
        .unwrap_err();
    assert!(matches!(err, AlumnetError::Verification(_)));

    // Only the most recently issued one does.
    repo.consume("user@x.edu", "222222", TokenPurpose::EmailVerification)
        .await
        .unwrap();
}

#[tokio::test]
async fn consumption_is_one_shot() {
    let repo = setup().await;
    repo.replace(otp("user@x.edu", "042137")).await.unwrap();

    repo.consume("user@x.edu", "042137", TokenPurpose::EmailVerification)
        .await
        .unwrap();

    let err = repo
        .consume("user@x.edu", "042137", TokenPurpose::EmailVerification)
        .await
        .unwrap_err();
    assert!(matches!(err, AlumnetError::Verification(_)));
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let repo = setup().await;
    repo.replace(IssueToken {
        email: "user@x.edu".into(),
        value: "042137".into(),
        kind: TokenKind::Otp,
        purpose: TokenPurpose::EmailVerification,
        expires_at: Utc::now() - Duration::seconds(1),
    })
    .await
    .unwrap();

    let err = repo
        .consume("user@x.edu", "042137", TokenPurpose::EmailVerification)
        .await
        .unwrap_err();
    match err {
        AlumnetError::Verification(msg) => assert!(msg.contains("expired")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn wrong_value_is_rejected() {
    let repo = setup().await;
    repo.replace(otp("user@x.edu", "042137")).await.unwrap();

    let err = repo
        .consume("user@x.edu", "999999", TokenPurpose::EmailVerification)
        .await
        .unwrap_err();
    assert!(matches!(err, AlumnetError::Verification(_)));

    // A failed guess does not burn the real code.
    repo.consume("user@x.edu", "042137", TokenPurpose::EmailVerification)
        .await
        .unwrap();
}

#[tokio::test]
async fn purposes_are_independent() {
    let repo = setup().await;
    repo.replace(otp("user@x.edu", "042137")).await.unwrap();
    repo.replace(IssueToken {
        email: "user@x.edu".into(),
        value: "reset-link-token".into(),
        kind: TokenKind::LinkToken,
        purpose: TokenPurpose::PasswordReset,
        expires_at: Utc::now() + Duration::hours(24),
    })
    .await
    .unwrap();

    // Issuing a reset token must not displace the verification OTP.
    repo.consume("user@x.edu", "042137", TokenPurpose::EmailVerification)
        .await
        .unwrap();
    repo.consume("user@x.edu", "reset-link-token", TokenPurpose::PasswordReset)
        .await
        .unwrap();
}

#[tokio::test]
async fn unknown_email_has_no_token() {
    let repo = setup().await;

    let err = repo
        .consume("ghost@x.edu", "042137", TokenPurpose::EmailVerification)
        .await
        .unwrap_err();
    match err {
        AlumnetError::Verification(msg) => assert!(msg.contains("no verification code")),
        other => panic!("unexpected error: {other}"),
    }
}
