//! Error types for the caching service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == App Error Enum ==
/// Unified error type for the caching service.
///
/// `Backend` exists so cache failures can be logged and swallowed at call
/// sites; the read-through path never lets it reach an HTTP response.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found in the source of truth
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Cache backend failure (connection, serialization, capacity)
    #[error("Cache backend error: {0}")]
    Backend(String),

    /// Source-of-truth query failure
    #[error("Source error: {0}")]
    Source(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Backend(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            AppError::Source(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the caching service.
pub type Result<T> = std::result::Result<T, AppError>;
