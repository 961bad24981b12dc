//! Application error types.

use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::content::RepositoryError;
use crate::services::AuthError;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed request fields.
    #[error("{0}")]
    Validation(String),

    /// A path that cannot name any item.
    #[error("{0}")]
    NotFound(String),

    /// Missing, invalid or expired bearer token.
    #[error("unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Auth(AuthError::InvalidCredentials | AuthError::InvalidToken) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Repository(RepositoryError::ConstraintViolation { .. }) => {
                StatusCode::CONFLICT
            }
            AppError::Repository(RepositoryError::NotFound { .. }) => StatusCode::NOT_FOUND,
            AppError::Repository(RepositoryError::Storage { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Server-side failures are logged with their cause chain and never
        // described to the caller.
        let msg = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = ?anyhow::Error::from(self), "request failed");
            "Internal server error".to_string()
        } else {
            match &self {
                AppError::Unauthorized | AppError::Auth(AuthError::InvalidToken) => {
                    "Missing or invalid token".to_string()
                }
                AppError::Auth(AuthError::InvalidCredentials) => {
                    "Bad username or password".to_string()
                }
                other => other.to_string(),
            }
        };

        let mut response = (status, Json(json!({ "msg": msg }))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                header::HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;
