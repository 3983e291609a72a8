//! API error envelope
//!
//! Every failure is recovered at the request boundary and rendered as
//! `{"error": <kind>, "detail": <message>}`. The frontend displays
//! `detail` verbatim, so inference failures carry a generic message
//! while the real cause goes to the log.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use glance_application::{InferenceError, StoreError};
use glance_infrastructure::DecodeError;
use serde::Serialize;
use tracing::warn;

/// Structured error returned to clients
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: &'static str,
    detail: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    detail: &'a str,
}

impl ApiError {
    fn new(status: StatusCode, kind: &'static str, detail: impl Into<String>) -> Self {
        Self {
            status,
            kind,
            detail: detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_input", detail)
    }

    pub fn unavailable(e: InferenceError) -> Self {
        warn!("Health probe failed: {}", e);
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "model_unavailable",
            "Model inference service is not reachable",
        )
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::SessionNotFound(id) => Self::new(
                StatusCode::NOT_FOUND,
                "session_not_found",
                format!("Unknown or expired session: {id}"),
            ),
            StoreError::InvalidQuestion => {
                Self::new(StatusCode::BAD_REQUEST, "invalid_input", e.to_string())
            }
            StoreError::Inference(cause) => {
                warn!("Inference failure: {}", cause);
                Self::new(
                    StatusCode::BAD_GATEWAY,
                    "inference_failure",
                    "Model inference failed; please retry",
                )
            }
            StoreError::Internal(detail) => {
                warn!("Internal store error: {}", detail);
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal error",
                )
            }
        }
    }
}

impl From<DecodeError> for ApiError {
    fn from(e: DecodeError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "decode_error", e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.kind,
            detail: &self.detail,
        });
        (self.status, body).into_response()
    }
}
