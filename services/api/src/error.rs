//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service, and how each
//! variant is rendered as an HTTP response.

use crate::config::ConfigError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use selections_core::{PortError, ValidationErrors};
use serde_json::json;
use tracing::error;

pub const NOT_AUTHENTICATED: &str = "Authentication credentials were not provided.";
pub const SELECTION_NOT_FOUND: &str = "No Selection matches the given query.";

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// One or more request fields failed validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// The request could not be understood at all (e.g. malformed JSON).
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not authenticated")]
    Unauthorized,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Not found")]
    NotFound,

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration Error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

fn detail(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "detail": message.into() }))).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(errors.to_json())).into_response()
            }
            ApiError::BadRequest(message) => detail(StatusCode::BAD_REQUEST, message),
            ApiError::Unauthorized | ApiError::Port(PortError::Unauthorized) => {
                detail(StatusCode::UNAUTHORIZED, NOT_AUTHENTICATED)
            }
            ApiError::InvalidCredentials => {
                detail(StatusCode::UNAUTHORIZED, "Invalid email or password")
            }
            ApiError::NotFound | ApiError::Port(PortError::NotFound(_)) => {
                detail(StatusCode::NOT_FOUND, SELECTION_NOT_FOUND)
            }
            ApiError::Port(PortError::Conflict(message)) => detail(StatusCode::CONFLICT, message),
            other => {
                error!("Request failed: {:?}", other);
                detail(StatusCode::INTERNAL_SERVER_ERROR, "A server error occurred.")
            }
        }
    }
}
