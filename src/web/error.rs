// Error types for the API server

use crate::layout::{ErrorKind, LayoutError};
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

/// API server error types
#[derive(Debug)]
pub enum ApiError {
    // Malformed request (unparseable JSON, unknown values, bad Base64)
    BadRequest(String),
    PayloadTooLarge(String),
    // Configuration rejected by the layout engine
    ValidationFailed(String),
    // Input bytes are not a decodable image
    UnprocessableEntity(String),
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, error_message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            Self::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg),
            Self::ValidationFailed(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            Self::UnprocessableEntity(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "DECODE_ERROR", msg)
            }
            Self::InternalServerError(msg) => {
                error!("Internal error while handling request: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg)
            }
        };

        let body = Json(json!({
            "error": {
                "status": status.as_u16(),
                "code": error_code,
                "message": error_message,
            }
        }));

        (status, body).into_response()
    }
}

impl From<LayoutError> for ApiError {
    fn from(error: LayoutError) -> Self {
        let message = error.to_string();
        match error.kind() {
            ErrorKind::Validation => Self::ValidationFailed(message),
            ErrorKind::Decode => Self::UnprocessableEntity(message),
            ErrorKind::Internal => Self::InternalServerError(message),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge(message)
        } else {
            Self::BadRequest(message)
        }
    }
}
