//! Authentication routes.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::services::IssuedToken;
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// JSON login handler.
///
/// POST /login
async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<IssuedToken>> {
    let missing = || AppError::Validation("Missing username or password".to_string());

    let Json(request) = body.map_err(|_| missing())?;
    let username = request.username.filter(|u| !u.is_empty()).ok_or_else(missing)?;
    let password = request.password.filter(|p| !p.is_empty()).ok_or_else(missing)?;

    let token = state.auth().login(&username, &password).await?;
    Ok(Json(token))
}

/// Create the auth router.
pub fn router() -> Router<AppState> {
    Router::new().route("/login", post(login))
}
