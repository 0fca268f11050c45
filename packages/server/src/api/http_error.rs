//! HTTP error handling for the API server
//!
//! One wire shape for every failed request: a JSON body carrying a
//! user-facing message, a machine-readable code, and optional detail. The
//! status line is derived from the code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

use bhajanmala_core::ServiceError;

/// HTTP error response body
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpError {
    /// User-facing error message
    pub message: String,
    /// Machine-readable error code
    pub code: String,
    /// Optional detailed error information for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl HttpError {
    /// Create a new HTTP error
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: None,
        }
    }

    /// Create a new HTTP error with details
    pub fn with_details(
        message: impl Into<String>,
        code: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: Some(details.into()),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = match self.code.as_str() {
            "PART_NOT_FOUND" | "BHAJAN_NOT_FOUND" => StatusCode::NOT_FOUND,
            "INVALID_INSTRUCTION" | "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            "MOVE_CONFLICT" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

impl From<ServiceError> for HttpError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInstruction { .. } => {
                HttpError::new(err.to_string(), "INVALID_INSTRUCTION")
            }
            ServiceError::ValidationFailed(_) => HttpError::new(err.to_string(), "VALIDATION_ERROR"),
            ServiceError::PartNotFound { .. } => HttpError::new(err.to_string(), "PART_NOT_FOUND"),
            ServiceError::BhajanNotFound { .. } => {
                HttpError::new(err.to_string(), "BHAJAN_NOT_FOUND")
            }
            ServiceError::MoveContention { ref part_id, attempts } => HttpError::with_details(
                "The board changed while applying the move, please retry",
                "MOVE_CONFLICT",
                format!("part_id: {part_id}, attempts: {attempts}"),
            ),
            ServiceError::Storage(ref source) => {
                tracing::error!("❌ Storage failure behind API request: {:?}", source);
                HttpError::new(err.to_string(), "STORAGE_ERROR")
            }
        }
    }
}
