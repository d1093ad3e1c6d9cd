//! API error type.
//!
//! Maps service errors to HTTP status codes with a JSON body of the form
//! `{"error": {"code": "...", "message": "..."}}`. Messages of server-side
//! failures are logged and replaced by a generic text.

use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use certnft::ServiceError;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable code, e.g. `NOT_FOUND`.
    pub code: String,
    pub message: String,
}

/// Application-level error returned by every handler.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("{0}")]
    NotFound(String),

    /// Input failed validation (422).
    #[error("{0}")]
    Validation(String),

    /// Request body could not be read (422).
    #[error("{0}")]
    BadRequest(String),

    /// Request body exceeds the configured limit (413).
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Ledger or chain failure (502). Message is logged, not returned.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Internal server error (500). Message is logged, not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::UNPROCESSABLE_ENTITY, "BAD_REQUEST"),
            Self::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            Self::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Upstream(_) => {
                tracing::error!(error = %self, "upstream failure");
                "The ledger could not complete the operation".to_string()
            }
            Self::Internal(_) => {
                tracing::error!(error = %self, "internal server error");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(e) => Self::Validation(e.to_string()),
            ServiceError::NotFound(id) => {
                Self::NotFound(format!("certificate with id {id} not found"))
            }
            ServiceError::Upstream(msg) => Self::Upstream(msg),
            other @ (ServiceError::Storage(_)
            | ServiceError::Core(_)
            | ServiceError::Settings(_)) => Self::Internal(other.to_string()),
        }
    }
}

impl AppError {
    /// A body-reading failure, keeping the size-limit status.
    fn unreadable_body(status: StatusCode, text: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge(text)
        } else {
            Self::BadRequest(text)
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        Self::unreadable_body(err.status(), err.body_text())
    }
}

/// Unwrap a JSON body, mapping rejections to [`AppError::BadRequest`] or,
/// past the body limit, [`AppError::PayloadTooLarge`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::unreadable_body(err.status(), err.body_text()))
}
