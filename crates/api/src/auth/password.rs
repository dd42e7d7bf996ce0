//! Admin password hashing.
//!
//! Hashes are Argon2id PHC strings; the salt and cost parameters are read
//! back from the stored string on verification.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use pathway_core::error::CoreError;

pub const MIN_PASSWORD_LENGTH: usize = 8;
/// Argon2 input above this is rejected rather than hashed.
pub const MAX_PASSWORD_LENGTH: usize = 128;

pub fn hash_password(password: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

/// `Ok(false)` on a wrong password. `Err` means the stored hash itself is
/// unreadable.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, password_hash::Error> {
    let parsed = PasswordHash::new(stored_hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Length rules for a new admin password.
pub fn validate_password_strength(password: &str) -> Result<(), CoreError> {
    let length = password.chars().count();
    if password.trim().is_empty() || length < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at most {MAX_PASSWORD_LENGTH} characters long"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn hash_verifies_only_the_original_password() {
        let hash = hash_password("enrol-batch-7").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("enrol-batch-7", &hash).unwrap());
        assert!(!verify_password("enrol-batch-8", &hash).unwrap());
    }

    #[test]
    fn unreadable_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }

    #[test]
    fn length_bounds() {
        assert_matches!(validate_password_strength("short"), Err(CoreError::Validation(_)));
        assert_matches!(validate_password_strength("        "), Err(CoreError::Validation(_)));
        assert_matches!(
            validate_password_strength(&"x".repeat(MAX_PASSWORD_LENGTH + 1)),
            Err(CoreError::Validation(_))
        );
        assert!(validate_password_strength("eightchr").is_ok());
    }
}
