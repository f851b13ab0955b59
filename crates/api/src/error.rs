//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Malformed query parameters are never an error: the browse engine ignores
//! them. Only backend failures and unknown routes reach the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use jiraibrary_facets::RepositoryError;
use serde_json::json;
use thiserror::Error;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog repository operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Repository(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let detail = match &self {
            Self::Repository(_) => "Internal server error".to_string(),
            Self::NotFound(what) => format!("Not found: {what}"),
        };

        (self.status(), Json(json!({ "detail": detail }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
