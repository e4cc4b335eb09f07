//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::role::Role;

/// Account approval status.
///
/// Students and institutions are self-verifying: they jump straight to
/// `Verified` once their email is confirmed. Alumni enter `Verified`
/// only through an institution approval decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Pending,
    Verified,
    Suspended,
}

impl AccountStatus {
    /// Valid transitions: `Pending → Verified` (approval),
    /// `Pending → Suspended` (rejection), `Verified → Suspended`.
    pub fn can_transition_to(self, next: AccountStatus) -> bool {
        matches!(
            (self, next),
            (AccountStatus::Pending, AccountStatus::Verified)
                | (AccountStatus::Pending, AccountStatus::Suspended)
                | (AccountStatus::Verified, AccountStatus::Suspended)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AccountStatus::Pending => "pending",
            AccountStatus::Verified => "verified",
            AccountStatus::Suspended => "suspended",
        }
    }

    pub fn parse(s: &str) -> Option<AccountStatus> {
        match s {
            "pending" => Some(AccountStatus::Pending),
            "verified" => Some(AccountStatus::Verified),
            "suspended" => Some(AccountStatus::Suspended),
            _ => None,
        }
    }
}

/// Role-specific profile fields, tagged by role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Profile {
    Student(StudentProfile),
    Alumni(AlumniProfile),
    Institution(InstitutionProfile),
}

impl Profile {
    pub fn role(&self) -> Role {
        match self {
            Profile::Student(_) => Role::Student,
            Profile::Alumni(_) => Role::Alumni,
            Profile::Institution(_) => Role::Institution,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub roll_number: String,
    pub department: String,
    pub current_year: Option<u16>,
    pub graduation_year: Option<u16>,
    pub institution_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlumniProfile {
    /// Institution whose console decides this account's approval.
    pub institution_name: String,
    pub department: Option<String>,
    pub graduation_year: u16,
    pub company: Option<String>,
    pub location: Option<String>,
    pub current_position: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstitutionProfile {
    pub institution_name: String,
    pub institution_code: String,
    pub institution_type: Option<String>,
    pub established_year: Option<u16>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Unique across all roles; stored lowercased.
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub status: AccountStatus,
    pub email_verified: bool,
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_transitions() {
        use AccountStatus::*;
        assert!(Pending.can_transition_to(Verified));
        assert!(Pending.can_transition_to(Suspended));
        assert!(Verified.can_transition_to(Suspended));
        // Terminal states cannot move back.
        assert!(!Verified.can_transition_to(Pending));
        assert!(!Suspended.can_transition_to(Verified));
        assert!(!Suspended.can_transition_to(Pending));
    }

    #[test]
    fn profile_role_tags() {
        let p = Profile::Alumni(AlumniProfile {
            institution_name: "IIT Delhi".into(),
            department: None,
            graduation_year: 2019,
            company: None,
            location: None,
            current_position: None,
        });
        assert_eq!(p.role(), Role::Alumni);
    }
}
