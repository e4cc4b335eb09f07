//! Login-time credential checks against stored Argon2id hashes.
//!
//! Hashing happens in the storage layer when a draft or password reset
//! is persisted; this module only ever sees the PHC string side. The
//! two layers must agree on the pepper, which is prepended to the
//! candidate password before verification.

use std::borrow::Cow;

use argon2::password_hash::{Error as HashError, PasswordHash};
use argon2::{Argon2, PasswordVerifier};

use crate::error::AuthError;

/// Candidate bytes for verification: the raw password, or the
/// pepper-prefixed form when a pepper is configured.
fn candidate_bytes<'a>(password: &'a str, pepper: Option<&str>) -> Cow<'a, [u8]> {
    match pepper {
        Some(p) => Cow::Owned(format!("{p}{password}").into_bytes()),
        None => Cow::Borrowed(password.as_bytes()),
    }
}

/// Check a candidate password against a stored PHC-format hash.
///
/// A mismatch is `Ok(false)`, not an error: callers collapse it into
/// the same "invalid credentials" response as an unknown account. Only
/// an unparseable or corrupt stored hash surfaces as
/// [`AuthError::Crypto`].
pub fn verify_password(
    password: &str,
    hash: &str,
    pepper: Option<&str>,
) -> Result<bool, AuthError> {
    let stored = PasswordHash::new(hash)
        .map_err(|e| AuthError::Crypto(format!("stored hash is not valid PHC: {e}")))?;

    let candidate = candidate_bytes(password, pepper);
    match Argon2::default().verify_password(&candidate, &stored) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(e) => Err(AuthError::Crypto(format!("password verification: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use argon2::PasswordHasher;
    use argon2::password_hash::SaltString;
    use argon2::password_hash::rand_core::OsRng;

    use super::*;

    fn hash_candidate(password: &str, pepper: Option<&str>) -> String {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(&candidate_bytes(password, pepper), &salt)
            .unwrap()
            .to_string()
    }

    #[test]
    fn match_and_mismatch_are_both_ok() {
        let hash = hash_candidate("correct-horse", None);
        assert!(verify_password("correct-horse", &hash, None).unwrap());
        assert!(!verify_password("battery-staple", &hash, None).unwrap());
    }

    #[test]
    fn pepper_must_match_on_both_sides() {
        let hash = hash_candidate("correct-horse", Some("server-secret"));
        assert!(verify_password("correct-horse", &hash, Some("server-secret")).unwrap());
        assert!(!verify_password("correct-horse", &hash, None).unwrap());
        assert!(!verify_password("correct-horse", &hash, Some("other")).unwrap());
    }

    #[test]
    fn corrupt_stored_hash_is_a_crypto_error() {
        let err = verify_password("pw", "plaintext-oops", None).unwrap_err();
        assert!(matches!(err, AuthError::Crypto(_)));
    }

    #[test]
    fn candidate_borrows_without_pepper() {
        let plain = candidate_bytes("pw", None);
        assert!(matches!(plain, Cow::Borrowed(_)));
        assert_eq!(plain.as_ref(), b"pw");
        assert_eq!(candidate_bytes("pw", Some("x")).as_ref(), b"xpw");
    }
}
