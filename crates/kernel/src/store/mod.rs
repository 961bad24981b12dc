//! Storage backends.
//!
//! Repositories talk to storage through the [`ItemStore`] and [`UserStore`]
//! traits. Two backends exist: PostgreSQL ([`PgStore`]) and an in-process
//! map ([`MemoryStore`]) used when no database is configured. Both enforce
//! `(page_type, order_id)` uniqueness themselves, atomically per write.

mod memory;
mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{ChartItem, ContentItem, User};

pub use memory::{MemoryStore, MemoryUserStore};
pub use postgres::PgStore;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("unique constraint violated")]
    Conflict,

    /// The targeted record does not exist.
    #[error("record not found")]
    NotFound,

    /// The backend failed (connection, query, decoding).
    #[error("storage backend failure")]
    Backend(#[source] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict,
            sqlx::Error::RowNotFound => StoreError::NotFound,
            _ => StoreError::Backend(anyhow::Error::new(e)),
        }
    }
}

/// Result type alias using StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

/// Positioned item storage for one collection.
#[async_trait]
pub trait ItemStore<T>: Send + Sync {
    /// All items on a page, ascending by `order_id`.
    async fn list_by_page_type(&self, page_type: &str) -> StoreResult<Vec<T>>;

    /// Load one item by ID.
    async fn find(&self, id: Uuid) -> StoreResult<Option<T>>;

    /// Insert a new item. Fails with `Conflict` if its position is taken.
    async fn insert(&self, item: &T) -> StoreResult<()>;

    /// Replace the item with the same ID. Fails with `NotFound` if absent and
    /// `Conflict` if the new position belongs to another item.
    async fn replace(&self, item: &T) -> StoreResult<()>;

    /// Remove an item. Fails with `NotFound` if absent.
    async fn delete(&self, id: Uuid) -> StoreResult<()>;
}

/// Credential record storage.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Insert a user. Fails with `Conflict` if the username exists.
    async fn insert(&self, user: &User) -> StoreResult<()>;

    async fn count(&self) -> StoreResult<i64>;
}

/// The set of stores backing one running service.
#[derive(Clone)]
pub struct Stores {
    pub content: Arc<dyn ItemStore<ContentItem>>,
    pub charts: Arc<dyn ItemStore<ChartItem>>,
    pub users: Arc<dyn UserStore>,
}

impl Stores {
    /// Stores backed by a PostgreSQL pool.
    pub fn postgres(pool: PgPool) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self {
            content: store.clone(),
            charts: store.clone(),
            users: store,
        }
    }

    /// Stores held in process memory.
    pub fn memory() -> Self {
        Self {
            content: Arc::new(MemoryStore::<ContentItem>::new()),
            charts: Arc::new(MemoryStore::<ChartItem>::new()),
            users: Arc::new(MemoryUserStore::new()),
        }
    }
}
