//! SurrealDB implementation of [`PendingRegistrationRepository`].
//!
//! Drafts are keyed by the resolved verification email, so a second
//! registration for the same address replaces the first one
//! (last-writer-wins). The raw password is hashed here; it never
//! reaches the database.

use alumnet_core::error::{AlumnetError, AlumnetResult};
use alumnet_core::models::registration::{CreatePendingRegistration, PendingRegistration};
use alumnet_core::models::user::Profile;
use alumnet_core::repository::PendingRegistrationRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DbError;
use crate::repository::user::hash_password;

#[derive(Debug, SurrealValue)]
struct PendingRow {
    email: String,
    role: String,
    first_name: String,
    last_name: String,
    password_hash: String,
    profile: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PendingRow {
    fn try_into_pending(self) -> Result<PendingRegistration, DbError> {
        let role = alumnet_core::models::role::Role::from_storage_tag(&self.role)
            .ok_or_else(|| DbError::Decode(format!("unknown role tag: {}", self.role)))?;
        let profile: Profile = serde_json::from_value(self.profile)
            .map_err(|e| DbError::Decode(format!("invalid profile: {e}")))?;
        Ok(PendingRegistration {
            email: self.email,
            role,
            first_name: self.first_name,
            last_name: self.last_name,
            password_hash: self.password_hash,
            profile,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the pending-registration repository.
#[derive(Clone)]
pub struct SurrealPendingRegistrationRepository<C: Connection> {
    db: Surreal<C>,
    pepper: Option<String>,
}

impl<C: Connection> SurrealPendingRegistrationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db, pepper: None }
    }

    pub fn with_pepper(db: Surreal<C>, pepper: String) -> Self {
        Self {
            db,
            pepper: Some(pepper),
        }
    }
}

impl<C: Connection> PendingRegistrationRepository
    for SurrealPendingRegistrationRepository<C>
{
    async fn upsert(&self, input: CreatePendingRegistration) -> AlumnetResult<PendingRegistration> {
        let email = input.email.trim().to_lowercase();
        let password_hash = hash_password(&input.password, self.pepper.as_deref())?;
        let profile = serde_json::to_value(&input.profile)
            .map_err(|e| AlumnetError::Internal(format!("profile encode: {e}")))?;

        let result = self
            .db
            .query(
                "UPSERT type::record('pending_registration', $key) SET \
                 email = $email, role = $role, \
                 first_name = $first_name, last_name = $last_name, \
                 password_hash = $password_hash, profile = $profile, \
                 updated_at = time::now()",
            )
            .bind(("key", email.clone()))
            .bind(("email", email.clone()))
            .bind(("role", input.role.storage_tag().to_string()))
            .bind(("first_name", input.first_name))
            .bind(("last_name", input.last_name))
            .bind(("password_hash", password_hash))
            .bind(("profile", profile))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<PendingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "pending_registration".into(),
            id: email,
        })?;

        Ok(row.try_into_pending()?)
    }

    async fn get_by_email(&self, email: &str) -> AlumnetResult<PendingRegistration> {
        let email = email.trim().to_lowercase();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('pending_registration', $key)")
            .bind(("key", email.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PendingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "pending_registration".into(),
            id: email,
        })?;

        Ok(row.try_into_pending()?)
    }

    async fn delete_by_email(&self, email: &str) -> AlumnetResult<()> {
        let email = email.trim().to_lowercase();

        self.db
            .query("DELETE type::record('pending_registration', $key)")
            .bind(("key", email))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
