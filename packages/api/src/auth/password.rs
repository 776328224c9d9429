//! # Password hashing and verification: Argon2id
//!
//! - [`hash_password`] generates a random salt via [`OsRng`], hashes the plaintext
//!   with the default Argon2id parameters and returns a PHC-format string
//!   (e.g. `$argon2id$v=19$m=19456,t=2,p=1$...`). This string is stored in the
//!   `password` column of the `users` table.
//! - [`verify_password`] parses a stored PHC string and checks the plaintext
//!   against it. Comparison of the derived hash is constant-time. A stored value
//!   that is empty or malformed never verifies.
//! - [`verify_unknown_user`] runs the same verification against a fixed hash
//!   and always fails, so a login for a missing account costs as much as one
//!   with a wrong password.
//!
//! Both are CPU-heavy; request handlers run them on the blocking pool.

use std::sync::LazyLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed to hash password: {0}")]
pub struct HashError(String);

/// Stands in for the stored hash when the account does not exist.
static UNKNOWN_USER_HASH: LazyLock<String> =
    LazyLock::new(|| hash_password("zote unknown user").unwrap_or_default());

/// Hash a password using Argon2id. Returns a PHC-format string.
pub fn hash_password(password: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| HashError(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a PHC-format hash string.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        if !hash.is_empty() {
            tracing::warn!("stored password hash is malformed");
        }
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Verify `password` for an account that does not exist. Never succeeds.
pub fn verify_unknown_user(password: &str) -> bool {
    let _ = verify_password(password, &UNKNOWN_USER_HASH);
    false
}
