//! Error types for the session service.

use specpilot_models::SessionId;
use specpilot_persistence::PersistenceError;
use thiserror::Error;

/// Errors surfaced by [`SessionService`](crate::SessionService).
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No session is stored under this id.
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    /// Input rejected before any state was touched.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The repository failed.
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
