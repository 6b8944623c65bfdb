use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::ToSchema;

use prenatal_watch_domain::TriageError;

/// Error response format for API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code - machine-readable identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            details: None,
        }
    }

    /// Create a not found error response
    pub fn not_found(resource: &str) -> Self {
        Self::new("not_found", format!("The requested {} could not be found", resource))
    }

    /// Create a validation error response
    pub fn validation_error(message: &str) -> Self {
        Self::new("validation_error", message)
    }

    /// Create a bad request error response
    pub fn bad_request(message: &str) -> Self {
        Self::new("bad_request", message)
    }

    /// Create a forbidden error response for role violations
    pub fn forbidden(message: &str) -> Self {
        Self::new("forbidden", message)
    }

    /// Create a conflict error response for stale writes
    pub fn conflict(message: &str) -> Self {
        Self::new("conflict", message)
    }

    /// Create a service unavailable error response
    pub fn unavailable(message: &str) -> Self {
        Self::new("unavailable", message)
    }

    /// Create an internal error response
    pub fn internal_error() -> Self {
        Self::new("internal_error", "An unexpected error occurred")
    }

    pub fn status(&self) -> StatusCode {
        match self.error.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "validation_error" | "bad_request" => StatusCode::BAD_REQUEST,
            "forbidden" => StatusCode::FORBIDDEN,
            "conflict" => StatusCode::CONFLICT,
            "unavailable" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TriageError> for ErrorResponse {
    fn from(err: TriageError) -> Self {
        match err {
            TriageError::Validation(msg) => {
                warn!("Rejected invalid input: {}", msg);
                ErrorResponse::validation_error(&msg)
            }
            TriageError::NotFound(what) => ErrorResponse::not_found(&what),
            TriageError::Forbidden(msg) => {
                warn!("Rejected by role: {}", msg);
                ErrorResponse::forbidden(&msg)
            }
            TriageError::VersionConflict(msg) => ErrorResponse::conflict(&msg),
            TriageError::Unavailable(msg) => {
                error!("Dependency unavailable: {}", msg);
                ErrorResponse::unavailable(&msg)
            }
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}
