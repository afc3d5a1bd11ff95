//! API error types and JSON error response formatting.
//!
//! Screening errors are mapped onto HTTP status codes here. Backend failure
//! details are logged but never echoed to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use moodcheck_screening::ScreeningError;
use serde::{Deserialize, Serialize};

/// Client-facing text for text-generation outages.
const BACKEND_UNAVAILABLE: &str =
    "The assistant is temporarily unavailable. Please try again in a moment.";

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error code (e.g., "bad_request", "not_found").
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug)]
pub enum ApiError {
    /// 400 - empty or oversized input.
    BadRequest(String),
    /// 404 - unknown session.
    NotFound(String),
    /// 500
    Internal(String),
    /// 503 - text-generation backend failed or timed out.
    ServiceUnavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg)
            }
        };

        let body = ErrorBody {
            error: error_code.to_string(),
            message,
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ScreeningError> for ApiError {
    fn from(err: ScreeningError) -> Self {
        match err {
            ScreeningError::EmptyMessage | ScreeningError::MessageTooLong(_) => {
                ApiError::BadRequest(err.to_string())
            }
            ScreeningError::SessionNotFound(_) => ApiError::NotFound(err.to_string()),
            ScreeningError::Backend(_) | ScreeningError::Timeout(_) => {
                tracing::error!(error = %err, "Text generation backend failure");
                ApiError::ServiceUnavailable(BACKEND_UNAVAILABLE.to_string())
            }
            ScreeningError::StorageError(_) => ApiError::Internal(err.to_string()),
        }
    }
}
