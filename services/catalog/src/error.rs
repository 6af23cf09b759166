//! Custom error types for the catalog service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Custom error type for the catalog service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed input, rejected before any mutation
    #[error("Validation error: {0}")]
    Validation(String),

    /// A referenced identifier does not resolve
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error
    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!("Storage operation failed: {:#}", err);
        ApiError::Internal
    }
}

/// Type alias for catalog results
pub type ApiResult<T> = Result<T, ApiError>;
