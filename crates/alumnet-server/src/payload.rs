//! Wire-facing payload shapes.
//!
//! The wire contract predates this server: user objects travel as
//! camelCase JSON with the role under `userType` in the storage
//! vocabulary (`admin` for institutions). Clients map it back.

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use alumnet_core::models::session::{Session, UserSnapshot};
use alumnet_core::models::user::User;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Storage role tag: `student` / `alumni` / `admin`.
    pub user_type: String,
    pub status: String,
    pub email_verified: bool,
    pub profile: Value,
}

impl UserPayload {
    pub fn of(user: &User) -> Self {
        Self::of_snapshot(&UserSnapshot::of(user))
    }

    pub fn of_snapshot(user: &UserSnapshot) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            user_type: user.role.storage_tag().to_string(),
            status: user.status.as_str().to_string(),
            email_verified: user.email_verified,
            profile: serde_json::to_value(&user.profile).unwrap_or(Value::Null),
        }
    }
}

/// `data` payload of a session-granting response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    pub user: UserPayload,
    pub pending_approval: bool,
}

impl SessionPayload {
    pub fn of(session: &Session) -> Self {
        Self {
            user: UserPayload::of_snapshot(&session.user),
            pending_approval: session.pending_approval,
        }
    }
}
