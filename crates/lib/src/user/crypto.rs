//! Password hashing for the user system
//!
//! Argon2id with a random salt, stored in PHC string format.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core},
};

use super::errors::UserError;
use crate::Result;

/// Hash a password using Argon2id
///
/// # Returns
/// The PHC-format hash string, which embeds its salt
pub fn hash_password(password: impl AsRef<str>) -> Result<String> {
    let salt = SaltString::generate(&mut rand_core::OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_ref().as_bytes(), &salt)
        .map_err(|e| UserError::HashingFailed {
            reason: e.to_string(),
        })?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against its hash
///
/// # Returns
/// Ok(()) if password is correct, `UserError::BadCredentials` otherwise
pub fn verify_password(password: impl AsRef<str>, password_hash: impl AsRef<str>) -> Result<()> {
    let parsed_hash =
        PasswordHash::new(password_hash.as_ref()).map_err(|e| UserError::HashingFailed {
            reason: format!("stored hash is malformed: {e}"),
        })?;

    Argon2::default()
        .verify_password(password.as_ref().as_bytes(), &parsed_hash)
        .map_err(|_| UserError::BadCredentials.into())
}
