//! Account roles and the storage vocabulary mapping.
//!
//! The client-facing vocabulary is `student` / `alumni` / `institution`.
//! The credential store tags institution accounts as `admin`; the
//! mapping is bidirectional and lossless, and every boundary crossing
//! goes through it rather than remapping ad hoc at call sites.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Account role. Fixed at registration; never mutated afterward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Alumni,
    Institution,
}

impl Role {
    /// Client-facing tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Alumni => "alumni",
            Role::Institution => "institution",
        }
    }

    /// Parse a client-facing tag.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "student" => Some(Role::Student),
            "alumni" => Some(Role::Alumni),
            "institution" => Some(Role::Institution),
            _ => None,
        }
    }

    /// The tag the credential store persists. Institution accounts are
    /// stored under `admin`.
    pub fn storage_tag(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Alumni => "alumni",
            Role::Institution => "admin",
        }
    }

    /// Inverse of [`Role::storage_tag`].
    pub fn from_storage_tag(tag: &str) -> Option<Role> {
        match tag {
            "student" => Some(Role::Student),
            "alumni" => Some(Role::Alumni),
            "admin" => Some(Role::Institution),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_mapping_is_bijective() {
        for role in [Role::Student, Role::Alumni, Role::Institution] {
            assert_eq!(Role::from_storage_tag(role.storage_tag()), Some(role));
        }
    }

    #[test]
    fn institution_is_stored_as_admin() {
        assert_eq!(Role::Institution.storage_tag(), "admin");
        assert_eq!(Role::from_storage_tag("admin"), Some(Role::Institution));
        // The client-facing tag never leaks into storage and vice versa.
        assert_eq!(Role::from_storage_tag("institution"), None);
        assert_eq!(Role::parse("admin"), None);
    }

    #[test]
    fn client_tags_round_trip() {
        for role in [Role::Student, Role::Alumni, Role::Institution] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("superuser"), None);
    }
}
