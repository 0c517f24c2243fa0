//! Password hashing and verification with Argon2.

use crate::error::{ApiError, ApiResult};
use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};

/// Hash a password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("failed to hash password: {e}")))?;

    Ok(password_hash.to_string())
}

/// Verify a password against a stored Argon2 hash.
///
/// A malformed stored hash is reported the same way as a mismatch; the
/// caller only learns that the credentials were not accepted.
pub fn verify_password(password: &str, password_hash: &str) -> ApiResult<()> {
    let parsed_hash =
        PasswordHash::new(password_hash).map_err(|_| ApiError::InvalidCredentials)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::InvalidCredentials)
}
