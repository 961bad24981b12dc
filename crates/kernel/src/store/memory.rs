//! In-memory storage backend.
//!
//! Items are keyed by `(page_type, order_id)` in a `BTreeMap`, so the key
//! itself is the uniqueness constraint and a page scan comes back sorted.
//! Every write takes the lock once and checks and mutates under it.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use super::{ItemStore, StoreError, StoreResult, UserStore};
use crate::models::{Positioned, User};

type PositionKey = (String, i64);

fn position_of<T: Positioned>(item: &T) -> PositionKey {
    (item.page_type().to_string(), item.order_id())
}

/// In-memory item store for one collection.
pub struct MemoryStore<T> {
    inner: RwLock<MemoryStoreInner<T>>,
}

struct MemoryStoreInner<T> {
    by_position: BTreeMap<PositionKey, T>,
    positions: HashMap<Uuid, PositionKey>,
}

impl<T> MemoryStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner {
                by_position: BTreeMap::new(),
                positions: HashMap::new(),
            }),
        }
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> ItemStore<T> for MemoryStore<T>
where
    T: Positioned + Clone + Send + Sync + 'static,
{
    async fn list_by_page_type(&self, page_type: &str) -> StoreResult<Vec<T>> {
        let inner = self.inner.read();
        let start = (page_type.to_string(), i64::MIN);
        let end = (page_type.to_string(), i64::MAX);

        Ok(inner
            .by_position
            .range(start..=end)
            .map(|(_, item)| item.clone())
            .collect())
    }

    async fn find(&self, id: Uuid) -> StoreResult<Option<T>> {
        let inner = self.inner.read();
        Ok(inner
            .positions
            .get(&id)
            .and_then(|key| inner.by_position.get(key))
            .cloned())
    }

    async fn insert(&self, item: &T) -> StoreResult<()> {
        let mut inner = self.inner.write();
        let key = position_of(item);

        if inner.by_position.contains_key(&key) || inner.positions.contains_key(&item.id()) {
            return Err(StoreError::Conflict);
        }

        inner.positions.insert(item.id(), key.clone());
        inner.by_position.insert(key, item.clone());
        Ok(())
    }

    async fn replace(&self, item: &T) -> StoreResult<()> {
        let mut inner = self.inner.write();
        let Some(old_key) = inner.positions.get(&item.id()).cloned() else {
            return Err(StoreError::NotFound);
        };

        let new_key = position_of(item);
        if new_key != old_key && inner.by_position.contains_key(&new_key) {
            return Err(StoreError::Conflict);
        }

        inner.by_position.remove(&old_key);
        inner.positions.insert(item.id(), new_key.clone());
        inner.by_position.insert(new_key, item.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut inner = self.inner.write();
        let key = inner.positions.remove(&id).ok_or(StoreError::NotFound)?;
        inner.by_position.remove(&key);
        Ok(())
    }
}

/// In-memory credential store.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self.users.read().get(username).cloned())
    }

    async fn insert(&self, user: &User) -> StoreResult<()> {
        let mut users = self.users.write();
        if users.contains_key(&user.username) {
            return Err(StoreError::Conflict);
        }
        users.insert(user.username.clone(), user.clone());
        Ok(())
    }

    async fn count(&self) -> StoreResult<i64> {
        Ok(self.users.read().len() as i64)
    }
}
