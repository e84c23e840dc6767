/// API error type and StoreError -> HTTP status mapping
///
/// Error bodies are `{ "message": "...", "error": "..." }` where `error` is an
/// optional one-line diagnostic. Cause chains are logged, never returned.

use crate::project::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

/// HTTP-facing error with status code and short message
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub diagnostic: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            diagnostic: None,
        }
    }

    /// Create a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Create a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Create a 500 Internal Server Error
    pub fn internal(message: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Self {
            diagnostic: Some(diagnostic.into()),
            ..Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
        }
    }

    /// Map a store error, using `context` as the message for persistence failures
    pub fn from_store(err: StoreError, context: &str) -> Self {
        match err {
            StoreError::InvalidArgument(message) => Self::bad_request(message),
            StoreError::NotFound(message) => Self::not_found(message),
            StoreError::StoreUnavailable(cause) => {
                tracing::error!("❌ {}: {:#}", context, cause);
                Self::internal(context, cause.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            message: &self.message,
            error: self.diagnostic.as_deref(),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_mapping() {
        let err = ApiError::from_store(StoreError::InvalidArgument("All fields are required".into()), "ctx");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "All fields are required");

        let err = ApiError::from_store(StoreError::NotFound("Pipeline not found".into()), "ctx");
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert!(err.diagnostic.is_none());
    }

    #[test]
    fn unavailable_keeps_only_top_level_cause() {
        let cause = anyhow::anyhow!("disk I/O error").context("query failed");
        let err = ApiError::from_store(StoreError::StoreUnavailable(cause), "Failed to fetch projects");

        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Failed to fetch projects");
        assert_eq!(err.diagnostic.as_deref(), Some("query failed"));
    }

    #[test]
    fn error_response_status() {
        let response = ApiError::not_found("Project not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
