//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent business logic violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("parent not found: {0}")]
    ParentNotFound(String),

    #[error("duplicate node id: {0}")]
    DuplicateId(String),

    #[error("node id must not be empty")]
    EmptyId,
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
