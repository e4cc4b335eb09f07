//! Repository trait definitions for the credential store.
//!
//! All operations are async. Emails are unique across roles and
//! compared case-insensitively; implementations store them lowercased.

use uuid::Uuid;

use crate::error::AlumnetResult;
use crate::models::{
    registration::{CreatePendingRegistration, PendingRegistration},
    user::{AccountStatus, User},
    verification::{IssueToken, TokenPurpose, VerificationToken},
};

pub trait UserRepository: Send + Sync {
    /// Promote a verified pending registration into a durable user.
    /// `status` is `Verified` for students and institutions, `Pending`
    /// for alumni awaiting institution approval.
    fn create_from_pending(
        &self,
        pending: PendingRegistration,
        status: AccountStatus,
    ) -> impl Future<Output = AlumnetResult<User>> + Send;

    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AlumnetResult<User>> + Send;

    fn get_by_email(&self, email: &str) -> impl Future<Output = AlumnetResult<User>> + Send;

    fn email_exists(&self, email: &str) -> impl Future<Output = AlumnetResult<bool>> + Send;

    /// Compare-and-set status transition; fails unless the stored
    /// status still equals `from`. Approval decisions rely on this to
    /// stay atomic per account.
    fn transition_status(
        &self,
        id: Uuid,
        from: AccountStatus,
        to: AccountStatus,
    ) -> impl Future<Output = AlumnetResult<User>> + Send;

    /// Re-hash and store a new password (reset flow).
    fn update_password(
        &self,
        id: Uuid,
        password: &str,
    ) -> impl Future<Output = AlumnetResult<()>> + Send;

    /// Alumni awaiting approval, scoped to an institution.
    fn list_pending_alumni(
        &self,
        institution_name: &str,
    ) -> impl Future<Output = AlumnetResult<Vec<User>>> + Send;
}

pub trait PendingRegistrationRepository: Send + Sync {
    /// Create or replace the single draft for an email
    /// (last-writer-wins).
    fn upsert(
        &self,
        input: CreatePendingRegistration,
    ) -> impl Future<Output = AlumnetResult<PendingRegistration>> + Send;

    fn get_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = AlumnetResult<PendingRegistration>> + Send;

    fn delete_by_email(&self, email: &str) -> impl Future<Output = AlumnetResult<()>> + Send;
}

pub trait VerificationTokenRepository: Send + Sync {
    /// Create or replace the single active token for
    /// `(email, purpose)`. Any previously issued token stops working.
    fn replace(
        &self,
        input: IssueToken,
    ) -> impl Future<Output = AlumnetResult<VerificationToken>> + Send;

    fn get_active(
        &self,
        email: &str,
        purpose: TokenPurpose,
    ) -> impl Future<Output = AlumnetResult<VerificationToken>> + Send;

    /// One-shot consumption: marks the token consumed iff the value
    /// matches, it has not been consumed, and it has not expired.
    fn consume(
        &self,
        email: &str,
        value: &str,
        purpose: TokenPurpose,
    ) -> impl Future<Output = AlumnetResult<VerificationToken>> + Send;
}
