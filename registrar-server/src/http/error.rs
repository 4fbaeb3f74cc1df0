//! API error types with IntoResponse
//!
//! Every error body is `{"error": "..."}`. Conflicts map to 400 rather
//! than 409, matching the client contract for duplicate enrollments.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::repos::DbError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Malformed request body (400)
    BadRequest { message: &'static str },

    /// Resource not found (404)
    NotFound { message: String },

    /// Unique-key conflict (400)
    Conflict { message: String },

    /// Database error (500, logged)
    Database(DbError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            Self::BadRequest { message } => (StatusCode::BAD_REQUEST, message.to_owned()),
            Self::NotFound { message } => (StatusCode::NOT_FOUND, message),
            Self::Conflict { message } => (StatusCode::BAD_REQUEST, message),
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "an internal error occurred".to_owned(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound(message) => Self::NotFound { message },
            DbError::Conflict(message) => Self::Conflict { message },
            _ => Self::Database(e),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        Self::Database(DbError::Sqlx(e))
    }
}
