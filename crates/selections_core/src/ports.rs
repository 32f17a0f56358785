//! crates/selections_core/src/ports.rs
//!
//! Defines the storage contracts (traits) for the application's core logic.
//! The web layer only talks to these traits, so the record store behind them
//! can be PostgreSQL, an in-memory map, or anything else durable.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{NewSelection, Selection, SelectionChanges, User, UserCredentials};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The record store for selections. Every method is a single atomic operation.
#[async_trait]
pub trait SelectionStore: Send + Sync {
    async fn get(&self, id: i64) -> PortResult<Selection>;

    /// Returns every selection, oldest id first.
    async fn list(&self) -> PortResult<Vec<Selection>>;

    /// Stores a new selection, assigning its id and creation time.
    async fn create(&self, owner: Uuid, new: NewSelection) -> PortResult<Selection>;

    async fn update(&self, id: i64, changes: SelectionChanges) -> PortResult<Selection>;

    async fn delete(&self, id: i64) -> PortResult<()>;
}

/// User accounts and the login sessions that authenticate them.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn create_user_with_email(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    /// Removes the user together with their selections and auth sessions.
    async fn delete_user(&self, user_id: Uuid) -> PortResult<()>;

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    /// Resolves a live (unexpired) session to its user.
    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;
}
