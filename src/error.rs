//! # Error Handling
//!
//! This module provides unified error handling for the NTP Core API. Every
//! route handler returns [`ApiError`] on failure, which converts into the
//! JSON error body documented for that endpoint class; no database error is
//! allowed to reach the framework's default handler.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

/// Duplicate key server error code (unique index violation).
const DUPLICATE_KEY_CODE: i32 = 11000;

fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    match *error.kind {
        ErrorKind::Write(WriteFailure::WriteError(ref write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        ErrorKind::Command(ref command_error) => command_error.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

/// Errors surfaced by the repository layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("duplicate value for unique field")]
    DuplicateKey,
    #[error("database error: {0}")]
    Database(mongodb::error::Error),
}

impl RepositoryError {
    /// Wraps a driver error, classifying unique index violations so they can
    /// be mapped to a conflict response instead of a generic failure.
    pub fn database_error(error: mongodb::error::Error) -> Self {
        if is_duplicate_key(&error) {
            tracing::debug!(?error, "duplicate key violation detected");
            return Self::DuplicateKey;
        }

        Self::Database(error)
    }
}

/// Request-boundary error taxonomy with predefined status codes and bodies.
///
/// Most variants render as `{"error": message}`; [`ApiError::Dependency`]
/// renders as `{"status": "error", "message": message}`, the shape used by
/// the aggregate read endpoints.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error("Internal server error")]
    Internal,
    #[error("{0}")]
    Dependency(String),
}

impl ApiError {
    /// Get the appropriate HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal | ApiError::Dependency(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts a repository failure into the `{status, message}` error body
    /// used by the list and aggregation endpoints.
    pub fn dependency(error: RepositoryError, message: &str) -> Self {
        tracing::error!(?error, "data retrieval failed");
        Self::Dependency(message.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            ApiError::Dependency(message) => json!({
                "status": "error",
                "message": message,
            }),
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::DuplicateKey => ApiError::Conflict("email already exists"),
            RepositoryError::Database(db_error) => {
                tracing::error!(?db_error, "database operation failed");
                ApiError::Internal
            }
        }
    }
}
