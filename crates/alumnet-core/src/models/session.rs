//! Session artifacts: the bearer token plus user snapshot handed to a
//! client after successful authentication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::role::Role;
use crate::models::user::{AccountStatus, Profile, User};

/// The user fields a session carries; never includes the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub status: AccountStatus,
    pub email_verified: bool,
    pub profile: Profile,
}

impl UserSnapshot {
    pub fn of(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            role: user.role,
            status: user.status,
            email_verified: user.email_verified,
            profile: user.profile.clone(),
        }
    }
}

/// An authenticated login artifact. Destroyed by clearing client
/// state; bearer tokens are stateless and carry their own expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserSnapshot,
    pub issued_at: DateTime<Utc>,
    /// Alumni who verified their email but still await institution
    /// approval hold a session that routes to the waiting page only
    /// and is rejected by the alumni-capability gate.
    pub pending_approval: bool,
}

impl Session {
    pub fn new(token: String, user: UserSnapshot, issued_at: DateTime<Utc>) -> Self {
        let pending_approval = user.role == Role::Alumni && user.status == AccountStatus::Pending;
        Self {
            token,
            user,
            issued_at,
            pending_approval,
        }
    }
}
