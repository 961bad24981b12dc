//! Admin routes for content and chart items.
//!
//! Handlers check that required fields are present, then delegate to the
//! repositories. Position uniqueness is left entirely to storage.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{ChartInput, ChartItem, Collection, ContentInput, ContentItem};
use crate::services::Identity;
use crate::state::AppState;

const MISSING_FIELDS: &str = "Missing required fields";

/// Content create/update request body.
#[derive(Debug, Default, Deserialize)]
pub struct ContentPayload {
    pub page_type: Option<String>,
    pub content: Option<Value>,
    pub order_id: Option<i64>,
}

/// Chart create/update request body.
#[derive(Debug, Default, Deserialize)]
pub struct ChartPayload {
    pub page_type: Option<String>,
    pub chart_type: Option<String>,
    pub chart_data: Option<Value>,
    pub order_id: Option<i64>,
}

/// Write acknowledgement.
#[derive(Debug, Serialize)]
pub struct WriteResponse {
    pub msg: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
}

fn present_text(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Null, `""` and an absent field all count as missing.
fn present_value(value: Option<Value>) -> Option<Value> {
    value.filter(|v| match v {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    })
}

impl ContentPayload {
    /// Check required fields.
    pub fn validate(self) -> Result<ContentInput, AppError> {
        match (
            present_text(self.page_type),
            present_value(self.content),
            self.order_id,
        ) {
            (Some(page_type), Some(content), Some(order_id)) => Ok(ContentInput {
                page_type,
                content,
                order_id,
            }),
            _ => Err(AppError::Validation(MISSING_FIELDS.to_string())),
        }
    }
}

impl ChartPayload {
    /// Check required fields.
    pub fn validate(self) -> Result<ChartInput, AppError> {
        match (
            present_text(self.page_type),
            present_text(self.chart_type),
            present_value(self.chart_data),
            self.order_id,
        ) {
            (Some(page_type), Some(chart_type), Some(chart_data), Some(order_id)) => {
                Ok(ChartInput {
                    page_type,
                    chart_type,
                    chart_data,
                    order_id,
                })
            }
            _ => Err(AppError::Validation(MISSING_FIELDS.to_string())),
        }
    }
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(payload)| payload)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

/// A path segment that is not a UUID cannot name an existing item.
fn parse_id(raw: &str, collection: Collection) -> Result<Uuid, AppError> {
    raw.parse::<Uuid>().map_err(|_| {
        AppError::NotFound(match collection {
            Collection::Content => "Content not found".to_string(),
            Collection::Charts => "Chart not found".to_string(),
        })
    })
}

/// GET /admin/contents/{page_type}
async fn list_contents(
    State(state): State<AppState>,
    Path(page_type): Path<String>,
) -> AppResult<Json<Vec<ContentItem>>> {
    Ok(Json(state.contents().list_by_page_type(&page_type).await?))
}

/// GET /admin/charts/{page_type}
async fn list_charts(
    State(state): State<AppState>,
    Path(page_type): Path<String>,
) -> AppResult<Json<Vec<ChartItem>>> {
    Ok(Json(state.charts().list_by_page_type(&page_type).await?))
}

/// POST /admin/add_content
async fn add_content(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    body: Result<Json<ContentPayload>, JsonRejection>,
) -> AppResult<(StatusCode, Json<WriteResponse>)> {
    let input = json_body(body)?.validate()?;
    let item = state.contents().insert(input).await?;

    info!(user = %identity.username, id = %item.id, "content added");
    Ok((
        StatusCode::CREATED,
        Json(WriteResponse {
            msg: "Content added successfully",
            id: Some(item.id),
        }),
    ))
}

/// POST /admin/add_chart
async fn add_chart(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    body: Result<Json<ChartPayload>, JsonRejection>,
) -> AppResult<(StatusCode, Json<WriteResponse>)> {
    let input = json_body(body)?.validate()?;
    let item = state.charts().insert(input).await?;

    info!(user = %identity.username, id = %item.id, "chart added");
    Ok((
        StatusCode::CREATED,
        Json(WriteResponse {
            msg: "Chart added successfully",
            id: Some(item.id),
        }),
    ))
}

/// PUT /admin/content/{id}
async fn update_content(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    body: Result<Json<ContentPayload>, JsonRejection>,
) -> AppResult<Json<WriteResponse>> {
    let input = json_body(body)?.validate()?;
    let id = parse_id(&id, Collection::Content)?;
    state.contents().update(id, input).await?;

    info!(user = %identity.username, %id, "content updated");
    Ok(Json(WriteResponse {
        msg: "Content updated successfully",
        id: None,
    }))
}

/// DELETE /admin/content/{id}
async fn delete_content(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> AppResult<Json<WriteResponse>> {
    let id = parse_id(&id, Collection::Content)?;
    state.contents().delete(id).await?;

    info!(user = %identity.username, %id, "content deleted");
    Ok(Json(WriteResponse {
        msg: "Content deleted successfully",
        id: None,
    }))
}

/// PUT /admin/chart/{id}
async fn update_chart(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    body: Result<Json<ChartPayload>, JsonRejection>,
) -> AppResult<Json<WriteResponse>> {
    let input = json_body(body)?.validate()?;
    let id = parse_id(&id, Collection::Charts)?;
    state.charts().update(id, input).await?;

    info!(user = %identity.username, %id, "chart updated");
    Ok(Json(WriteResponse {
        msg: "Chart updated successfully",
        id: None,
    }))
}

/// DELETE /admin/chart/{id}
async fn delete_chart(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> AppResult<Json<WriteResponse>> {
    let id = parse_id(&id, Collection::Charts)?;
    state.charts().delete(id).await?;

    info!(user = %identity.username, %id, "chart deleted");
    Ok(Json(WriteResponse {
        msg: "Chart deleted successfully",
        id: None,
    }))
}

/// Admin routes; the caller layers authentication.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/contents/{page_type}", get(list_contents))
        .route("/admin/charts/{page_type}", get(list_charts))
        .route("/admin/add_content", post(add_content))
        .route("/admin/add_chart", post(add_chart))
        .route(
            "/admin/content/{id}",
            put(update_content).delete(delete_content),
        )
        .route("/admin/chart/{id}", put(update_chart).delete(delete_chart))
}
