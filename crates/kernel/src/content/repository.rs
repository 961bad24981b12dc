//! Content and chart repositories.
//!
//! [`ItemRepository`] is the kind-generic layer over an [`ItemStore`]: it
//! tags every storage failure with the collection and position involved.
//! [`ContentRepository`] and [`ChartRepository`] build items from validated
//! input (rendering HTML, encoding chart data) and delegate to it.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use super::render::Renderer;
use crate::models::{ChartInput, ChartItem, Collection, ContentInput, ContentItem, Positioned};
use crate::store::{ItemStore, StoreError};

/// Repository-level errors, tagged with the collection they came from.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{collection} already has an item at order_id {order_id} on page '{page_type}'")]
    ConstraintViolation {
        collection: Collection,
        page_type: String,
        order_id: i64,
    },

    #[error("{} {id} not found", collection.item_noun())]
    NotFound { collection: Collection, id: Uuid },

    #[error("{collection} storage failure")]
    Storage {
        collection: Collection,
        #[source]
        source: anyhow::Error,
    },
}

impl RepositoryError {
    /// Collection the error came from.
    pub fn collection(&self) -> Collection {
        match self {
            RepositoryError::ConstraintViolation { collection, .. }
            | RepositoryError::NotFound { collection, .. }
            | RepositoryError::Storage { collection, .. } => *collection,
        }
    }
}

/// Result type alias using RepositoryError.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Kind-generic repository over one collection's store.
pub struct ItemRepository<T> {
    store: Arc<dyn ItemStore<T>>,
}

impl<T> Clone for ItemRepository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<T: Positioned> ItemRepository<T> {
    /// Create a repository over a store.
    pub fn new(store: Arc<dyn ItemStore<T>>) -> Self {
        Self { store }
    }

    fn storage_error(source: StoreError) -> RepositoryError {
        RepositoryError::Storage {
            collection: T::COLLECTION,
            source: anyhow::Error::new(source),
        }
    }

    fn write_error(source: StoreError, item: &T) -> RepositoryError {
        match source {
            StoreError::Conflict => RepositoryError::ConstraintViolation {
                collection: T::COLLECTION,
                page_type: item.page_type().to_string(),
                order_id: item.order_id(),
            },
            StoreError::NotFound => RepositoryError::NotFound {
                collection: T::COLLECTION,
                id: item.id(),
            },
            other => Self::storage_error(other),
        }
    }

    /// Items on a page, ascending by `order_id`, as sorted by the store.
    pub async fn list_by_page_type(&self, page_type: &str) -> RepositoryResult<Vec<T>> {
        let items = self
            .store
            .list_by_page_type(page_type)
            .await
            .map_err(Self::storage_error)?;

        debug_assert!(
            items.windows(2).all(|w| w[0].order_id() < w[1].order_id()),
            "store returned {} items out of order",
            T::COLLECTION
        );

        Ok(items)
    }

    /// Load one item.
    pub async fn find(&self, id: Uuid) -> RepositoryResult<Option<T>> {
        self.store.find(id).await.map_err(Self::storage_error)
    }

    /// Persist a new item.
    pub async fn insert(&self, item: &T) -> RepositoryResult<()> {
        self.store
            .insert(item)
            .await
            .map_err(|e| Self::write_error(e, item))?;

        info!(
            collection = %T::COLLECTION,
            id = %item.id(),
            page_type = %item.page_type(),
            order_id = item.order_id(),
            "item created"
        );
        Ok(())
    }

    /// Replace all mutable fields of an existing item.
    pub async fn replace(&self, item: &T) -> RepositoryResult<()> {
        self.store
            .replace(item)
            .await
            .map_err(|e| Self::write_error(e, item))?;

        info!(
            collection = %T::COLLECTION,
            id = %item.id(),
            page_type = %item.page_type(),
            order_id = item.order_id(),
            "item updated"
        );
        Ok(())
    }

    /// Remove an item. A missing ID is reported as `NotFound`.
    pub async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        self.store.delete(id).await.map_err(|e| match e {
            StoreError::NotFound => RepositoryError::NotFound {
                collection: T::COLLECTION,
                id,
            },
            other => Self::storage_error(other),
        })?;

        info!(collection = %T::COLLECTION, %id, "item deleted");
        Ok(())
    }
}

/// Repository for rich-text content items.
#[derive(Clone)]
pub struct ContentRepository {
    items: ItemRepository<ContentItem>,
    renderer: Arc<dyn Renderer>,
}

impl ContentRepository {
    /// Create a content repository rendering through `renderer`.
    pub fn new(store: Arc<dyn ItemStore<ContentItem>>, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            items: ItemRepository::new(store),
            renderer,
        }
    }

    pub async fn list_by_page_type(&self, page_type: &str) -> RepositoryResult<Vec<ContentItem>> {
        self.items.list_by_page_type(page_type).await
    }

    pub async fn find(&self, id: Uuid) -> RepositoryResult<Option<ContentItem>> {
        self.items.find(id).await
    }

    /// Render and insert a new content item.
    pub async fn insert(&self, input: ContentInput) -> RepositoryResult<ContentItem> {
        let item = self.build(Uuid::now_v7(), input);
        self.items.insert(&item).await?;
        Ok(item)
    }

    /// Re-render and replace an existing content item.
    pub async fn update(&self, id: Uuid, input: ContentInput) -> RepositoryResult<ContentItem> {
        let item = self.build(id, input);
        self.items.replace(&item).await?;
        Ok(item)
    }

    pub async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        self.items.delete(id).await
    }

    fn build(&self, id: Uuid, input: ContentInput) -> ContentItem {
        let html_content = self.renderer.render(&input.content);
        debug!(renderer = self.renderer.name(), %id, "rendered content");
        ContentItem::from_input(id, input, html_content)
    }
}

/// Repository for chart items.
#[derive(Clone)]
pub struct ChartRepository {
    items: ItemRepository<ChartItem>,
}

impl ChartRepository {
    /// Create a chart repository.
    pub fn new(store: Arc<dyn ItemStore<ChartItem>>) -> Self {
        Self {
            items: ItemRepository::new(store),
        }
    }

    pub async fn list_by_page_type(&self, page_type: &str) -> RepositoryResult<Vec<ChartItem>> {
        self.items.list_by_page_type(page_type).await
    }

    pub async fn find(&self, id: Uuid) -> RepositoryResult<Option<ChartItem>> {
        self.items.find(id).await
    }

    /// Encode and insert a new chart.
    pub async fn insert(&self, input: ChartInput) -> RepositoryResult<ChartItem> {
        let item = ChartItem::from_input(Uuid::now_v7(), input);
        self.items.insert(&item).await?;
        Ok(item)
    }

    /// Encode and replace an existing chart.
    pub async fn update(&self, id: Uuid, input: ChartInput) -> RepositoryResult<ChartItem> {
        let item = ChartItem::from_input(id, input);
        self.items.replace(&item).await?;
        Ok(item)
    }

    pub async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        self.items.delete(id).await
    }
}
