//! Password hashes stored on user rows.
//!
//! Hashes are Argon2id PHC strings (`$argon2id$v=19$m=...,t=...,p=...$<salt>$<hash>`),
//! so the parameters travel with each hash. Verifying a login is the
//! authentication layer's job; [`verify_password`] is provided so that layer
//! does not need to know the format.

use crate::errors::{Error, Result};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use uuid::Uuid;

/// Hashes `password` with Argon2id and a fresh random salt.
///
/// Fails with [`Error::Internal`] only if the hasher rejects its own input,
/// which means the salt or parameters are broken rather than the password.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes()).map_err(|e| Error::Internal {
        message: format!("Failed to encode password salt: {e}"),
    })?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Internal {
            message: format!("Failed to hash password: {e}"),
        })
}

/// Checks `password` against a hash produced by [`hash_password`].
///
/// Anything that is not a valid PHC string is treated as a mismatch.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}
