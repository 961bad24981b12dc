//! PostgreSQL storage backend.
//!
//! Uniqueness of `(page_type, order_id)` and `username` is enforced by the
//! unique indexes created in `migrations/`; a violation surfaces here as
//! [`StoreError::Conflict`].

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{ItemStore, StoreError, StoreResult, UserStore};
use crate::models::{ChartItem, ContentItem, User};

/// PostgreSQL-backed store for all collections.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn expect_one_row(rows_affected: u64) -> StoreResult<()> {
    if rows_affected == 0 {
        Err(StoreError::NotFound)
    } else {
        Ok(())
    }
}

#[async_trait]
impl ItemStore<ContentItem> for PgStore {
    async fn list_by_page_type(&self, page_type: &str) -> StoreResult<Vec<ContentItem>> {
        let items = sqlx::query_as::<_, ContentItem>(
            r#"
            SELECT id, page_type, content, html_content, order_id
            FROM content_item
            WHERE page_type = $1
            ORDER BY order_id
            "#,
        )
        .bind(page_type)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn find(&self, id: Uuid) -> StoreResult<Option<ContentItem>> {
        let item = sqlx::query_as::<_, ContentItem>(
            "SELECT id, page_type, content, html_content, order_id FROM content_item WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    async fn insert(&self, item: &ContentItem) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO content_item (id, page_type, content, html_content, order_id)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(item.id)
        .bind(&item.page_type)
        .bind(&item.content)
        .bind(&item.html_content)
        .bind(item.order_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn replace(&self, item: &ContentItem) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE content_item
            SET page_type = $2, content = $3, html_content = $4, order_id = $5, changed = NOW()
            WHERE id = $1
            "#,
        )
        .bind(item.id)
        .bind(&item.page_type)
        .bind(&item.content)
        .bind(&item.html_content)
        .bind(item.order_id)
        .execute(&self.pool)
        .await?;

        expect_one_row(result.rows_affected())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM content_item WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        expect_one_row(result.rows_affected())
    }
}

#[async_trait]
impl ItemStore<ChartItem> for PgStore {
    async fn list_by_page_type(&self, page_type: &str) -> StoreResult<Vec<ChartItem>> {
        let items = sqlx::query_as::<_, ChartItem>(
            r#"
            SELECT id, page_type, chart_type, chart_data, order_id
            FROM chart_item
            WHERE page_type = $1
            ORDER BY order_id
            "#,
        )
        .bind(page_type)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn find(&self, id: Uuid) -> StoreResult<Option<ChartItem>> {
        let item = sqlx::query_as::<_, ChartItem>(
            "SELECT id, page_type, chart_type, chart_data, order_id FROM chart_item WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    async fn insert(&self, item: &ChartItem) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO chart_item (id, page_type, chart_type, chart_data, order_id)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(item.id)
        .bind(&item.page_type)
        .bind(&item.chart_type)
        .bind(&item.chart_data)
        .bind(item.order_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn replace(&self, item: &ChartItem) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE chart_item
            SET page_type = $2, chart_type = $3, chart_data = $4, order_id = $5, changed = NOW()
            WHERE id = $1
            "#,
        )
        .bind(item.id)
        .bind(&item.page_type)
        .bind(&item.chart_type)
        .bind(&item.chart_data)
        .bind(item.order_id)
        .execute(&self.pool)
        .await?;

        expect_one_row(result.rows_affected())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM chart_item WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        expect_one_row(result.rows_affected())
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn insert(&self, user: &User) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, created)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
