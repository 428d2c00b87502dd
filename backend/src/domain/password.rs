//! Password hashing helpers.
//!
//! Stored secrets are salted Argon2id PHC strings; plaintext passwords never
//! leave the call stack. Verification failures and parse failures of stored
//! hashes both read as "wrong password" to the caller.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::password_hash::rand_core::OsRng;
use argon2::Argon2;

/// Errors raised while hashing a password.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// The Argon2 backend rejected the input.
    #[error("password hashing failed: {message}")]
    Hashing {
        /// Backend failure description.
        message: String,
    },
}

/// Hash a plaintext password into an Argon2id PHC string with a fresh salt.
pub fn hash(password: &str) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| PasswordHashError::Hashing {
            message: err.to_string(),
        })
}

/// Verify a plaintext password against a stored PHC string.
///
/// Returns `false` for mismatches and for unparseable stored hashes; the
/// identity service treats both as invalid credentials.
pub fn verify(stored: &str, password: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Burn comparable work to a real verification when no account matched, so
/// the missing-user and wrong-password paths take similar time.
pub fn dummy_verify(password: &str) {
    let _ = hash(password);
}
