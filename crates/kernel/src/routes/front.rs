//! Reader-facing page routes.

use axum::extract::State;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::AppResult;
use crate::models::ContentItem;
use crate::page::PageEntry;
use crate::services::Identity;
use crate::state::AppState;

/// Page type shown on the dashboard.
pub const DASHBOARD_PAGE: &str = "dashboard";

/// Page type shown on the summary page.
pub const SUMMARY_PAGE: &str = "summary";

/// Page type shown on the reports page.
pub const REPORTS_PAGE: &str = "reports";

#[derive(Debug, Serialize)]
struct DashboardResponse {
    logged_in_as: String,
    contents: Vec<ContentItem>,
}

#[derive(Debug, Serialize)]
struct PageResponse {
    items: Vec<PageEntry>,
}

/// GET /: liveness message.
async fn home() -> Json<Value> {
    Json(json!({ "msg": "Welcome to Folio!" }))
}

/// GET /dashboard: dashboard content, without charts.
async fn dashboard(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> AppResult<Json<DashboardResponse>> {
    let contents = state.contents().list_by_page_type(DASHBOARD_PAGE).await?;

    Ok(Json(DashboardResponse {
        logged_in_as: identity.username,
        contents,
    }))
}

async fn page(state: &AppState, page_type: &str) -> AppResult<Json<PageResponse>> {
    let items = state.pages().aggregate(page_type).await?;
    Ok(Json(PageResponse { items }))
}

/// GET /summary: merged content and charts.
async fn summary(State(state): State<AppState>) -> AppResult<Json<PageResponse>> {
    page(&state, SUMMARY_PAGE).await
}

/// GET /reports: merged content and charts.
async fn reports(State(state): State<AppState>) -> AppResult<Json<PageResponse>> {
    page(&state, REPORTS_PAGE).await
}

/// Routes open to anonymous callers.
pub fn public_router() -> Router<AppState> {
    Router::new().route("/", get(home))
}

/// Routes requiring a bearer token; the caller layers authentication.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/summary", get(summary))
        .route("/reports", get(reports))
}
