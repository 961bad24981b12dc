//! Bearer token authentication middleware.
//!
//! Checks `Authorization: Bearer <token>` headers, verifies the JWT and
//! stores the caller's [`Identity`] in request extensions.

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::AppError;
use crate::services::Identity;
use crate::state::AppState;

/// Middleware that rejects requests without a valid bearer token.
///
/// Missing, malformed, tampered and expired tokens all get the same 401,
/// returned before the handler (and therefore any storage access) runs.
pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);

    let Some(token) = token.filter(|t| !t.is_empty()) else {
        debug!(path = %request.uri().path(), "missing bearer token");
        return AppError::Unauthorized.into_response();
    };

    let identity: Identity = match state.auth().authorize(token) {
        Ok(identity) => identity,
        Err(e) => {
            debug!(error = %e, path = %request.uri().path(), "invalid bearer token");
            return AppError::Unauthorized.into_response();
        }
    };

    request.extensions_mut().insert(identity);
    next.run(request).await
}
