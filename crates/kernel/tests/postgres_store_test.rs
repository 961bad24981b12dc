//! PostgreSQL store tests.
//!
//! These run against the database named by `DATABASE_URL` and are skipped
//! when it is unset. Every test writes to its own page type, so they can
//! share one database and run in parallel.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use serde_json::json;
use uuid::Uuid;

use folio_kernel::db;
use folio_kernel::models::{ChartInput, ChartItem, ContentInput, ContentItem, User};
use folio_kernel::store::{StoreError, Stores};

async fn postgres_stores() -> Option<Stores> {
    let _ = dotenvy::dotenv();
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping PostgreSQL store test");
        return None;
    };

    let pool = db::create_pool(&url, 2).await.unwrap();
    db::run_migrations(&pool).await.unwrap();
    Some(Stores::postgres(pool))
}

/// A page type no other test run uses.
fn fresh_page() -> String {
    format!("test-{}", Uuid::now_v7())
}

fn content(page_type: &str, order_id: i64) -> ContentItem {
    ContentItem::from_input(
        Uuid::now_v7(),
        ContentInput {
            page_type: page_type.to_string(),
            content: json!(format!("<p>{order_id}</p>")),
            order_id,
        },
        format!("<p>{order_id}</p>"),
    )
}

fn chart(page_type: &str, order_id: i64) -> ChartItem {
    ChartItem::from_input(
        Uuid::now_v7(),
        ChartInput {
            page_type: page_type.to_string(),
            chart_type: "bar".to_string(),
            chart_data: json!({ "series": [order_id] }),
            order_id,
        },
    )
}

#[tokio::test]
async fn duplicate_content_position_conflicts() {
    let Some(stores) = postgres_stores().await else {
        return;
    };
    let page = fresh_page();

    let first = content(&page, 5);
    stores.content.insert(&first).await.unwrap();

    let err = stores.content.insert(&content(&page, 5)).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict), "got {err:?}");
    assert_eq!(stores.content.find(first.id).await.unwrap(), Some(first));
}

#[tokio::test]
async fn duplicate_chart_position_conflicts() {
    let Some(stores) = postgres_stores().await else {
        return;
    };
    let page = fresh_page();

    stores.charts.insert(&chart(&page, 2)).await.unwrap();

    let err = stores.charts.insert(&chart(&page, 2)).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict), "got {err:?}");
}

#[tokio::test]
async fn content_and_chart_may_share_a_position() {
    let Some(stores) = postgres_stores().await else {
        return;
    };
    let page = fresh_page();

    stores.content.insert(&content(&page, 1)).await.unwrap();
    stores.charts.insert(&chart(&page, 1)).await.unwrap();
}

#[tokio::test]
async fn replace_onto_taken_position_conflicts() {
    let Some(stores) = postgres_stores().await else {
        return;
    };
    let page = fresh_page();

    let a = chart(&page, 1);
    let mut b = chart(&page, 2);
    stores.charts.insert(&a).await.unwrap();
    stores.charts.insert(&b).await.unwrap();

    b.order_id = 1;
    let err = stores.charts.replace(&b).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict), "got {err:?}");
    assert_eq!(stores.charts.find(a.id).await.unwrap(), Some(a));
}

#[tokio::test]
async fn replace_moves_item_between_pages() {
    let Some(stores) = postgres_stores().await else {
        return;
    };
    let from = fresh_page();
    let to = fresh_page();

    let mut item = content(&from, 3);
    stores.content.insert(&item).await.unwrap();

    item.page_type = to.clone();
    item.order_id = 9;
    stores.content.replace(&item).await.unwrap();

    assert!(stores.content.list_by_page_type(&from).await.unwrap().is_empty());
    assert_eq!(
        stores.content.list_by_page_type(&to).await.unwrap(),
        vec![item]
    );
}

#[tokio::test]
async fn missing_ids_are_not_found() {
    let Some(stores) = postgres_stores().await else {
        return;
    };
    let page = fresh_page();

    let err = stores.content.replace(&content(&page, 1)).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound), "got {err:?}");

    let err = stores.charts.replace(&chart(&page, 1)).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound), "got {err:?}");

    let err = stores.content.delete(Uuid::now_v7()).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound), "got {err:?}");

    let err = stores.charts.delete(Uuid::now_v7()).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound), "got {err:?}");
}

#[tokio::test]
async fn delete_frees_the_position() {
    let Some(stores) = postgres_stores().await else {
        return;
    };
    let page = fresh_page();

    let item = chart(&page, 4);
    stores.charts.insert(&item).await.unwrap();
    stores.charts.delete(item.id).await.unwrap();

    stores.charts.insert(&chart(&page, 4)).await.unwrap();
    assert!(stores.charts.find(item.id).await.unwrap().is_none());
}

#[tokio::test]
async fn lists_come_back_in_order_id_order() {
    let Some(stores) = postgres_stores().await else {
        return;
    };
    let page = fresh_page();

    for order_id in [7, -2, 3, 0] {
        stores.content.insert(&content(&page, order_id)).await.unwrap();
        stores.charts.insert(&chart(&page, order_id * 10)).await.unwrap();
    }

    let contents: Vec<i64> = stores
        .content
        .list_by_page_type(&page)
        .await
        .unwrap()
        .iter()
        .map(|c| c.order_id)
        .collect();
    assert_eq!(contents, vec![-2, 0, 3, 7]);

    let charts: Vec<i64> = stores
        .charts
        .list_by_page_type(&page)
        .await
        .unwrap()
        .iter()
        .map(|c| c.order_id)
        .collect();
    assert_eq!(charts, vec![-20, 0, 30, 70]);
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let Some(stores) = postgres_stores().await else {
        return;
    };
    let username = fresh_page();

    stores.users.insert(&User::new(&username, "x")).await.unwrap();
    let err = stores
        .users
        .insert(&User::new(&username, "y"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict), "got {err:?}");
}
