//! Error types for gridbook-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gridbook_core::CoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Internal server error")]
    InternalError,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::RecordNotFound { uid } => ApiError::NotFound { resource: uid },
            CoreError::DuplicateUid { .. } | CoreError::InvalidPayload { .. } => {
                ApiError::BadRequest {
                    message: err.to_string(),
                }
            }
            CoreError::NotEditing { .. } => ApiError::BadRequest {
                message: err.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({ "message": self.to_string() }));
        (status, body).into_response()
    }
}
