//! SurrealDB implementation of [`UserRepository`].
//!
//! Password hashing uses Argon2id with OWASP-recommended parameters
//! (memory: 19 MiB, iterations: 2, parallelism: 1). Salt is randomly
//! generated per hash. An optional pepper (server-side secret) can be
//! provided at construction time.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use alumnet_core::error::{AlumnetError, AlumnetResult};
use alumnet_core::models::registration::PendingRegistration;
use alumnet_core::models::role::Role;
use alumnet_core::models::user::{AccountStatus, Profile, User};
use alumnet_core::repository::UserRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct UserRow {
    first_name: String,
    last_name: String,
    email: String,
    password_hash: String,
    role: String,
    status: String,
    email_verified: bool,
    profile: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct UserRowWithId {
    record_id: String,
    first_name: String,
    last_name: String,
    email: String,
    password_hash: String,
    role: String,
    status: String,
    email_verified: bool,
    profile: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn parse_role(tag: &str) -> Result<Role, DbError> {
    Role::from_storage_tag(tag).ok_or_else(|| DbError::Decode(format!("unknown role tag: {tag}")))
}

fn parse_status(s: &str) -> Result<AccountStatus, DbError> {
    AccountStatus::parse(s).ok_or_else(|| DbError::Decode(format!("unknown status: {s}")))
}

fn parse_profile(value: serde_json::Value) -> Result<Profile, DbError> {
    serde_json::from_value(value).map_err(|e| DbError::Decode(format!("invalid profile: {e}")))
}

impl UserRow {
    fn into_user(self, id: Uuid) -> Result<User, DbError> {
        Ok(User {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password_hash: self.password_hash,
            role: parse_role(&self.role)?,
            status: parse_status(&self.status)?,
            email_verified: self.email_verified,
            profile: parse_profile(self.profile)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl UserRowWithId {
    fn try_into_user(self) -> Result<User, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        Ok(User {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password_hash: self.password_hash,
            role: parse_role(&self.role)?,
            status: parse_status(&self.status)?,
            email_verified: self.email_verified,
            profile: parse_profile(self.profile)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Hash a password with Argon2id using OWASP-recommended parameters.
///
/// If a pepper is provided, it is prepended to the password before
/// hashing. The salt is randomly generated for each call.
pub(crate) fn hash_password(password: &str, pepper: Option<&str>) -> Result<String, DbError> {
    // OWASP ASVS recommended: m=19456 (19 MiB), t=2, p=1
    let params = argon2::Params::new(19456, 2, 1, None)
        .map_err(|e| DbError::Crypto(format!("argon2 params error: {e}")))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let peppered: String;
    let input = match pepper {
        Some(p) => {
            peppered = format!("{p}{password}");
            peppered.as_bytes()
        }
        None => password.as_bytes(),
    };

    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    let hash = argon2
        .hash_password(input, &salt)
        .map_err(|e| DbError::Crypto(format!("password hash error: {e}")))?;

    Ok(hash.to_string())
}

/// SurrealDB implementation of the User repository.
#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
    /// Optional server-side pepper for password hashing.
    pepper: Option<String>,
}

impl<C: Connection> SurrealUserRepository<C> {
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

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create_from_pending(
        &self,
        pending: PendingRegistration,
        status: AccountStatus,
    ) -> AlumnetResult<User> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let profile = serde_json::to_value(&pending.profile)
            .map_err(|e| AlumnetError::Internal(format!("profile encode: {e}")))?;

        let result = self
            .db
            .query(
                "CREATE type::record('user', $id) SET \
                 first_name = $first_name, last_name = $last_name, \
                 email = $email, password_hash = $password_hash, \
                 role = $role, status = $status, \
                 email_verified = true, \
                 profile = $profile",
            )
            .bind(("id", id_str.clone()))
            .bind(("first_name", pending.first_name))
            .bind(("last_name", pending.last_name))
            .bind(("email", pending.email.to_lowercase()))
            .bind(("password_hash", pending.password_hash))
            .bind(("role", pending.role.storage_tag().to_string()))
            .bind(("status", status.as_str().to_string()))
            .bind(("profile", profile))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> AlumnetResult<User> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('user', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn get_by_email(&self, email: &str) -> AlumnetResult<User> {
        let email = email.trim().to_lowercase();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE email = $email",
            )
            .bind(("email", email.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: format!("email={email}"),
        })?;

        Ok(row.try_into_user()?)
    }

    async fn email_exists(&self, email: &str) -> AlumnetResult<bool> {
        let email = email.trim().to_lowercase();

        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM user \
                 WHERE email = $email GROUP ALL",
            )
            .bind(("email", email))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0) > 0)
    }

    async fn transition_status(
        &self,
        id: Uuid,
        from: AccountStatus,
        to: AccountStatus,
    ) -> AlumnetResult<User> {
        let id_str = id.to_string();

        // Compare-and-set: the WHERE clause makes concurrent decisions
        // for the same account last-writer-loses.
        let mut result = self
            .db
            .query(
                "UPDATE type::record('user', $id) SET \
                 status = $to, updated_at = time::now() \
                 WHERE status = $from",
            )
            .bind(("id", id_str))
            .bind(("from", from.as_str().to_string()))
            .bind(("to", to.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(row.into_user(id)?),
            None => {
                // Either the user is gone or the status moved under us.
                let current = self.get_by_id(id).await?;
                Err(AlumnetError::InvalidTransition {
                    from: current.status.as_str().into(),
                    to: to.as_str().into(),
                })
            }
        }
    }

    async fn update_password(&self, id: Uuid, password: &str) -> AlumnetResult<()> {
        let id_str = id.to_string();
        let password_hash = hash_password(password, self.pepper.as_deref())?;

        self.db
            .query(
                "UPDATE type::record('user', $id) SET \
                 password_hash = $password_hash, updated_at = time::now()",
            )
            .bind(("id", id_str))
            .bind(("password_hash", password_hash))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list_pending_alumni(&self, institution_name: &str) -> AlumnetResult<Vec<User>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE role = 'alumni' AND status = 'pending' \
                 AND profile.institution_name = $institution \
                 ORDER BY created_at ASC",
            )
            .bind(("institution", institution_name.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        let users = rows
            .into_iter()
            .map(|row| row.try_into_user())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_role_tag_is_a_decode_error() {
        let err = parse_role("superuser").unwrap_err();
        assert!(matches!(err, DbError::Decode(_)));
    }

    #[test]
    fn unknown_status_is_a_decode_error() {
        let err = parse_status("frozen").unwrap_err();
        assert!(matches!(err, DbError::Decode(_)));
    }

    #[test]
    fn malformed_profile_is_a_decode_error() {
        let err = parse_profile(serde_json::json!({"kind": "wizard"})).unwrap_err();
        assert!(matches!(err, DbError::Decode(_)));
    }

    #[test]
    fn hashing_produces_a_phc_string() {
        let hash = hash_password("correct-horse", None).unwrap();
        assert!(hash.starts_with("$argon2id$"));
    }
}
