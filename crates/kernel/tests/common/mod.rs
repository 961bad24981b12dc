#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! [`TestApp`] wires the REAL router, repositories and auth service onto the
//! in-memory stores. Each store is wrapped in a [`CountingStore`] so tests
//! can assert that a request never reached storage.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use folio_kernel::content::PassthroughRenderer;
use folio_kernel::models::user::hash_password;
use folio_kernel::models::{ChartItem, ContentItem, User};
use folio_kernel::services::TokenService;
use folio_kernel::state::Storage;
use folio_kernel::store::{
    ItemStore, MemoryStore, MemoryUserStore, StoreError, StoreResult, Stores, UserStore,
};
use folio_kernel::{AppState, routes};

/// Token signing secret shared by every test app.
pub const TEST_SECRET: &[u8] = b"test-secret-test-secret-test-sec";

pub const TEST_USER: &str = "editor";
pub const TEST_PASSWORD: &str = "correct horse battery staple";

/// Item store wrapper counting every call.
pub struct CountingStore<T> {
    inner: MemoryStore<T>,
    calls: AtomicUsize,
    broken: bool,
}

impl<T> CountingStore<T> {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            calls: AtomicUsize::new(0),
            broken: false,
        }
    }

    /// A store whose every call fails with a backend error.
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) -> StoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.broken {
            return Err(StoreError::Backend(anyhow::anyhow!(
                "connection refused: postgres://folio:hunter2@db/folio"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl<T> ItemStore<T> for CountingStore<T>
where
    MemoryStore<T>: ItemStore<T>,
    T: Send + Sync + 'static,
{
    async fn list_by_page_type(&self, page_type: &str) -> StoreResult<Vec<T>> {
        self.hit()?;
        self.inner.list_by_page_type(page_type).await
    }

    async fn find(&self, id: Uuid) -> StoreResult<Option<T>> {
        self.hit()?;
        self.inner.find(id).await
    }

    async fn insert(&self, item: &T) -> StoreResult<()> {
        self.hit()?;
        self.inner.insert(item).await
    }

    async fn replace(&self, item: &T) -> StoreResult<()> {
        self.hit()?;
        self.inner.replace(item).await
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        self.hit()?;
        self.inner.delete(id).await
    }
}

/// Test application wrapper using the REAL kernel routes and state.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub content_store: Arc<CountingStore<ContentItem>>,
    pub chart_store: Arc<CountingStore<ChartItem>>,
}

impl TestApp {
    /// Create a test application with one known user.
    pub async fn new() -> Self {
        Self::with_token_lifetime(3600).await
    }

    /// Create a test application issuing tokens with the given lifetime.
    pub async fn with_token_lifetime(lifetime_secs: i64) -> Self {
        Self::build(lifetime_secs, CountingStore::new()).await
    }

    /// Create a test application whose chart storage is unreachable.
    pub async fn with_broken_charts() -> Self {
        Self::build(3600, CountingStore::broken()).await
    }

    async fn build(lifetime_secs: i64, charts: CountingStore<ChartItem>) -> Self {
        let content_store = Arc::new(CountingStore::<ContentItem>::new());
        let chart_store = Arc::new(charts);
        let users = Arc::new(MemoryUserStore::new());
        users
            .insert(&User::new(TEST_USER, hash_password(TEST_PASSWORD)))
            .await
            .unwrap();

        let stores = Stores {
            content: content_store.clone(),
            charts: chart_store.clone(),
            users,
        };

        let state = AppState::from_parts(
            Storage::Memory,
            stores,
            Arc::new(PassthroughRenderer),
            TokenService::new(TEST_SECRET, lifetime_secs),
        );

        Self {
            router: routes::app(state.clone()),
            state,
            content_store,
            chart_store,
        }
    }

    /// Total storage calls across both item collections.
    pub fn item_store_calls(&self) -> usize {
        self.content_store.calls() + self.chart_store.calls()
    }

    /// Send a request through the router.
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Log in as the test user and return the access token.
    pub async fn login(&self) -> String {
        let response = self
            .request(json_request(
                "POST",
                "/login",
                None,
                &json!({ "username": TEST_USER, "password": TEST_PASSWORD }),
            ))
            .await;
        assert_eq!(response.status(), 200);

        let body = response_json(response).await;
        body["access_token"].as_str().unwrap().to_string()
    }

    /// GET with a bearer token.
    pub async fn get(&self, uri: &str, token: &str) -> Response {
        self.request(
            Request::get(uri)
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Send a JSON body with a bearer token.
    pub async fn send(&self, method: &str, uri: &str, token: &str, body: &Value) -> Response {
        self.request(json_request(method, uri, Some(token), body)).await
    }

    /// DELETE with a bearer token.
    pub async fn delete(&self, uri: &str, token: &str) -> Response {
        self.request(
            Request::delete(uri)
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Create an item through the admin API and return its ID.
    pub async fn create(&self, uri: &str, token: &str, body: &Value) -> String {
        let response = self.send("POST", uri, token, body).await;
        assert_eq!(response.status(), 201, "create {uri} {body}");
        response_json(response).await["id"]
            .as_str()
            .unwrap()
            .to_string()
    }
}

/// Build a JSON request, optionally authenticated.
pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Collect a response body as JSON.
pub async fn response_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// `(type, order_id)` pairs of an aggregated page body.
pub fn page_shape(body: &Value) -> Vec<(String, i64)> {
    body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| {
            (
                entry["type"].as_str().unwrap().to_string(),
                entry["data"]["order_id"].as_i64().unwrap(),
            )
        })
        .collect()
}
