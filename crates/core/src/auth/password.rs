use crate::{HmsError, HmsResult};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;

/// Hashes `password` with Argon2id and a fresh random salt.
///
/// The result is a self-describing PHC string (`$argon2id$v=19$...`) that embeds the salt
/// and cost parameters, so verification needs nothing else.
pub fn hash_password(password: &str) -> HmsResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| HmsError::PasswordHash(e.to_string()))
}

/// Returns `true` when `provided` matches `stored_hash`.
///
/// A malformed stored hash is treated as a mismatch.
pub fn verify_password(provided: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("stored password hash is malformed: {}", e);
            return false;
        }
    };
    Argon2::default()
        .verify_password(provided.as_bytes(), &parsed)
        .is_ok()
}

/// Runs [`hash_password`] on the blocking pool, off the async workers.
pub async fn spawn_hash(password: String) -> HmsResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| HmsError::PasswordHash(e.to_string()))?
}

/// Runs [`verify_password`] on the blocking pool. A failed task counts as a mismatch.
pub async fn spawn_verify(provided: String, stored_hash: String) -> bool {
    match tokio::task::spawn_blocking(move || verify_password(&provided, &stored_hash)).await {
        Ok(matched) => matched,
        Err(e) => {
            tracing::error!("password verification task failed: {}", e);
            false
        }
    }
}
