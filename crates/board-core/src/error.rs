//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Item-source errors - failures of the backing store boundary.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Backend request failed: {0}")]
    Backend(String),

    #[error("Item not found")]
    NotFound,

    #[error("Submission rejected: {0}")]
    Rejected(String),
}
