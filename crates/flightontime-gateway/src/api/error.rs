//! Error responses for the gateway REST surface.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use flightontime_services::ModelServiceError;
use serde_json::json;

/// An HTTP error carrying a `detail` message, e.g.
/// `{"detail": "Model service call failed: Request timed out: ..."}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl From<ModelServiceError> for ApiError {
    fn from(err: ModelServiceError) -> Self {
        Self::internal(err.to_string())
    }
}

/// Malformed or mistyped request bodies keep axum's status (400/415/422)
/// but use the same `detail` envelope as every other error.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}
