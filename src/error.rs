//! Typed errors and HTTP mapping.

use crate::response::{self, FieldError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation failed: {} field error(s)", .0.len())]
    Validation(Vec<FieldError>),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
    #[error("not implemented: {0}")]
    NotImplemented(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("internal: {0}")]
    Internal(String),
}

impl AppError {
    /// Single field error, for checks that happen outside the request validator.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation(vec![FieldError::new(field, message)])
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            AppError::Db(e) if is_unique_violation(e) => StatusCode::CONFLICT,
            AppError::Db(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// SQLSTATE 23505: the insert lost a race against a concurrent duplicate.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => response::validation_failed(errors).into_response(),
            AppError::BadRequest(message) => response::bad_request(message).into_response(),
            AppError::Unauthorized(message) => response::unauthorized(message).into_response(),
            AppError::Forbidden(message) => response::forbidden(message).into_response(),
            AppError::NotFound(message) => response::not_found(message).into_response(),
            AppError::Conflict(message) => response::conflict(message).into_response(),
            AppError::PayloadTooLarge(message) => {
                response::failure(StatusCode::PAYLOAD_TOO_LARGE, message).into_response()
            }
            AppError::UnsupportedMediaType(message) => {
                response::failure(StatusCode::UNSUPPORTED_MEDIA_TYPE, message).into_response()
            }
            AppError::NotImplemented(message) => {
                response::failure(StatusCode::NOT_IMPLEMENTED, message).into_response()
            }
            AppError::Db(e) if is_unique_violation(&e) => {
                tracing::debug!(error = %e, "unique constraint rejected insert");
                response::conflict("Resource already exists".to_string()).into_response()
            }
            AppError::Db(e) => {
                tracing::error!(error = %e, "database error");
                response::internal_error().into_response()
            }
            AppError::Internal(message) => {
                tracing::error!(error = %message, "internal error");
                response::internal_error().into_response()
            }
        }
    }
}
