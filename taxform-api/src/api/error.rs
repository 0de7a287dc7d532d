//! Error-to-response mapping
//!
//! Client-class failures (validation, duplicate, storage constraint) map to
//! 400 with detail; everything else maps to a generic 500 with no detail
//! leaked to the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use taxform_common::Error;
use tracing::error;

/// Newtype so service errors can flow out of handlers with `?`
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            Error::Validation(issues) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "errors": issues })),
            )
                .into_response(),
            Error::Model(messages) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "errors": messages.join(", ") })),
            )
                .into_response(),
            Error::Duplicate => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "errors": Error::Duplicate.to_string() })),
            )
                .into_response(),
            Error::StorageConstraint { code, message } => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("{} {}", code, message).trim().to_string() })),
            )
                .into_response(),
            other => {
                error!("Internal error serving request: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
