//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::bootstrap::{self, SeedOutcome};
use crate::config::Config;
use crate::content::{ChartRepository, ContentRepository, Renderer, render};
use crate::db;
use crate::page::PageAggregator;
use crate::services::{AuthService, TokenService};
use crate::store::Stores;

/// Which storage backend the service runs on.
#[derive(Clone)]
pub enum Storage {
    Postgres(PgPool),
    Memory,
}

impl Storage {
    /// Backend name for health reporting.
    pub fn name(&self) -> &'static str {
        match self {
            Storage::Postgres(_) => "postgres",
            Storage::Memory => "memory",
        }
    }
}

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Storage backend handle.
    storage: Storage,

    /// Content item repository.
    contents: ContentRepository,

    /// Chart item repository.
    charts: ChartRepository,

    /// Page aggregator over both repositories.
    pages: PageAggregator,

    /// Login and token validation.
    auth: AuthService,
}

impl AppState {
    /// Create application state from configuration.
    ///
    /// Connects to storage, applies the schema (unique indexes included) and
    /// seeds the admin account before returning.
    pub async fn new(config: &Config) -> Result<Self> {
        let (storage, stores) = match &config.database_url {
            Some(url) => {
                let pool = db::create_pool(url, config.database_max_connections)
                    .await
                    .context("failed to create database pool")?;

                db::run_migrations(&pool)
                    .await
                    .context("failed to run migrations")?;

                (Storage::Postgres(pool.clone()), Stores::postgres(pool))
            }
            None => {
                warn!("DATABASE_URL not set; content is kept in memory and lost on exit");
                (Storage::Memory, Stores::memory())
            }
        };

        let seeded = bootstrap::seed_admin(stores.users.as_ref(), &config.admin)
            .await
            .context("failed to seed admin account")?;
        if let SeedOutcome::Generated(password) = seeded {
            // Shown once on the console, kept out of the log pipeline.
            eprintln!(
                "Generated password for admin user '{}': {password}",
                config.admin.username
            );
        }

        let secret = match &config.jwt_secret {
            Some(secret) => secret.as_bytes().to_vec(),
            None => {
                warn!("JWT_SECRET not set; using a random secret, tokens will not survive restart");
                rand::random::<[u8; 32]>().to_vec()
            }
        };
        let tokens = TokenService::new(&secret, config.token_ttl_secs);

        let renderer = render::for_mode(config.render_mode);
        info!(renderer = renderer.name(), storage = storage.name(), "services configured");

        Ok(Self::from_parts(storage, stores, renderer, tokens))
    }

    /// Assemble state from already-constructed parts.
    pub fn from_parts(
        storage: Storage,
        stores: Stores,
        renderer: Arc<dyn Renderer>,
        tokens: TokenService,
    ) -> Self {
        let contents = ContentRepository::new(stores.content, renderer);
        let charts = ChartRepository::new(stores.charts);
        let pages = PageAggregator::new(contents.clone(), charts.clone());
        let auth = AuthService::new(stores.users, tokens);

        Self {
            inner: Arc::new(AppStateInner {
                storage,
                contents,
                charts,
                pages,
                auth,
            }),
        }
    }

    /// Get the storage backend.
    pub fn storage(&self) -> &Storage {
        &self.inner.storage
    }

    /// Get the content repository.
    pub fn contents(&self) -> &ContentRepository {
        &self.inner.contents
    }

    /// Get the chart repository.
    pub fn charts(&self) -> &ChartRepository {
        &self.inner.charts
    }

    /// Get the page aggregator.
    pub fn pages(&self) -> &PageAggregator {
        &self.inner.pages
    }

    /// Get the auth service.
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    /// Check if the storage backend is reachable.
    pub async fn storage_healthy(&self) -> bool {
        match &self.inner.storage {
            Storage::Postgres(pool) => db::check_health(pool).await,
            Storage::Memory => true,
        }
    }
}
