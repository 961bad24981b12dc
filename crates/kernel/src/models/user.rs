//! User model and password hashing.
//!
//! Stored hashes come in two forms: a lowercase hex SHA-512 digest (the
//! default, deterministic scheme) or an Argon2 PHC string for accounts
//! provisioned with `folio hash-password --argon2`.

use anyhow::Result;
use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// User record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created: DateTime<Utc>,
}

impl User {
    /// Create a new user record from an already-hashed password.
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            username: username.into(),
            password_hash: password_hash.into(),
            created: Utc::now(),
        }
    }

    /// Verify a password against this user's hash.
    ///
    /// The plaintext is never compared; only its hash is.
    pub fn verify_password(&self, password: &str) -> bool {
        if self.password_hash.is_empty() {
            return false;
        }

        if self.password_hash.starts_with("$argon2") {
            let Ok(parsed_hash) = PasswordHash::new(&self.password_hash) else {
                return false;
            };
            return Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok();
        }

        let candidate = hash_password(password);
        let stored = self.password_hash.to_ascii_lowercase();
        candidate.as_bytes().ct_eq(stored.as_bytes()).into()
    }
}

/// Hash a password with SHA-512, hex encoded.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha512::digest(password.as_bytes()))
}

/// Hash a password using Argon2id.
pub fn hash_password_argon2(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))?;

    Ok(hash.to_string())
}
