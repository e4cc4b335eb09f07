//! Client-held authentication state: the session snapshot, bearer
//! token, and pending-registration draft. One value object owned by
//! the top-level flow; every mutation goes through a named operation.

use serde::{Deserialize, Serialize};

use alumnet_core::models::registration::RegistrationForm;
use alumnet_core::models::role::Role;
use alumnet_core::models::user::AccountStatus;

use crate::api::WireUser;
use crate::error::FlowError;

/// The signed-in user as the client sees it, with the role already
/// mapped back from the storage vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientUser {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub status: AccountStatus,
    pub email_verified: bool,
}

impl ClientUser {
    /// Map a wire user into the client vocabulary. Unknown role tags
    /// or statuses mean the backend and client disagree about the
    /// contract; that is a transport-level failure, not user input.
    pub fn from_wire(user: &WireUser) -> Result<Self, FlowError> {
        let role = Role::from_storage_tag(&user.user_type)
            .ok_or_else(|| FlowError::Network(format!("unknown role tag: {}", user.user_type)))?;
        let status = AccountStatus::parse(&user.status)
            .ok_or_else(|| FlowError::Network(format!("unknown status: {}", user.status)))?;
        Ok(Self {
            id: user.id.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            role,
            status,
            email_verified: user.email_verified,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSession {
    pub token: String,
    pub user: ClientUser,
    pub pending_approval: bool,
}

/// Everything the client persists locally. The draft mirrors the
/// server-side pending registration between submission and
/// verification; at most one is held at a time.
#[derive(Debug, Default)]
pub struct AuthState {
    session: Option<ClientSession>,
    draft: Option<RegistrationForm>,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&ClientSession> {
        self.session.as_ref()
    }

    pub fn draft(&self) -> Option<&RegistrationForm> {
        self.draft.as_ref()
    }

    /// The email a verification code was sent to, when a draft exists.
    pub fn draft_email(&self) -> Option<String> {
        self.draft
            .as_ref()
            .and_then(|d| d.resolved_email())
            .map(|e| e.to_lowercase())
    }

    pub fn store_session(&mut self, session: ClientSession) {
        self.session = Some(session);
    }

    /// Replaces any previous draft: starting a new registration
    /// abandons the old one.
    pub fn store_draft(&mut self, form: RegistrationForm) {
        self.draft = Some(form);
    }

    pub fn clear_draft(&mut self) {
        self.draft = None;
    }

    pub fn clear_session(&mut self) {
        self.session = None;
    }

    /// Logout: session snapshot, bearer token, and draft go together.
    pub fn clear_all(&mut self) {
        self.session = None;
        self.draft = None;
    }
}
