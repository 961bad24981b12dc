//! Startup seeding of the administrator account.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::AdminSeed;
use crate::models::User;
use crate::models::user::hash_password;
use crate::store::{StoreError, UserStore};

/// What [`seed_admin`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The collection was empty and the account was created.
    Created,
    /// The account was created with a random password, which the caller
    /// must show to the operator once. It is never logged.
    Generated(String),
    /// Users already exist; nothing was written.
    Skipped,
}

/// Create the administrator account if, and only if, no users exist.
pub async fn seed_admin(users: &dyn UserStore, seed: &AdminSeed) -> Result<SeedOutcome> {
    let existing = users.count().await.context("failed to count users")?;
    if existing > 0 {
        info!(users = existing, "user collection populated; skipping admin seed");
        return Ok(SeedOutcome::Skipped);
    }

    let (password_hash, generated) = match (&seed.password_hash, &seed.password) {
        (Some(hash), _) => (hash.clone(), None),
        (None, Some(password)) => (hash_password(password), None),
        (None, None) => {
            let generated = hex::encode(rand::random::<[u8; 12]>());
            warn!(
                username = %seed.username,
                "no ADMIN_PASSWORD_HASH or ADMIN_PASSWORD set; generated a bootstrap password"
            );
            (hash_password(&generated), Some(generated))
        }
    };

    match users.insert(&User::new(&seed.username, password_hash)).await {
        Ok(()) => {
            info!(username = %seed.username, "default admin user created");
            Ok(generated.map_or(SeedOutcome::Created, SeedOutcome::Generated))
        }
        // Another instance seeded concurrently.
        Err(StoreError::Conflict) => Ok(SeedOutcome::Skipped),
        Err(e) => Err(e).context("failed to create default admin user"),
    }
}
