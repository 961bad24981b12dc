//! Configuration loaded from environment variables.

use std::env;

use anyhow::{Context, Result, bail};

use crate::content::RenderMode;
use crate::services::token::ACCESS_TOKEN_LIFETIME;

/// Minimum accepted length of `JWT_SECRET`, in bytes.
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// PostgreSQL connection URL. When None, items live in process memory.
    pub database_url: Option<String>,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// HMAC secret for access tokens. When None, a random per-process
    /// secret is generated and tokens do not survive a restart.
    pub jwt_secret: Option<String>,

    /// Access token lifetime in seconds (default: 3600).
    pub token_ttl_secs: i64,

    /// Bootstrap administrator account.
    pub admin: AdminSeed,

    /// Content renderer (default: passthrough).
    pub render_mode: RenderMode,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,
}

/// Account created when the user collection is empty.
#[derive(Clone)]
pub struct AdminSeed {
    /// Username (default: "admin").
    pub username: String,

    /// Stored password hash, used as-is.
    pub password_hash: Option<String>,

    /// Plaintext password, hashed at bootstrap when no hash is given.
    pub password: Option<String>,
}

impl std::fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeed")
            .field("username", &self.username)
            .field("password_hash", &self.password_hash.as_ref().map(|_| "<redacted>"))
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let database_url = non_empty_var("DATABASE_URL");

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let jwt_secret = non_empty_var("JWT_SECRET");
        if let Some(secret) = &jwt_secret {
            if secret.len() < MIN_JWT_SECRET_LEN {
                bail!("JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} bytes");
            }
        }

        let token_ttl_secs: i64 = env::var("TOKEN_TTL_SECS")
            .unwrap_or_else(|_| ACCESS_TOKEN_LIFETIME.to_string())
            .parse()
            .context("TOKEN_TTL_SECS must be a valid integer")?;
        if token_ttl_secs <= 0 {
            bail!("TOKEN_TTL_SECS must be positive");
        }

        let admin = AdminSeed {
            username: non_empty_var("ADMIN_USERNAME").unwrap_or_else(|| "admin".to_string()),
            password_hash: non_empty_var("ADMIN_PASSWORD_HASH"),
            password: non_empty_var("ADMIN_PASSWORD"),
        };

        let render_mode = match non_empty_var("RENDER_MODE") {
            Some(mode) => mode.parse().context("invalid RENDER_MODE")?,
            None => RenderMode::default(),
        };

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_else(|_| vec!["*".to_string()]);

        Ok(Self {
            port,
            database_url,
            database_max_connections,
            jwt_secret,
            token_ttl_secs,
            admin,
            render_mode,
            cors_allowed_origins,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
