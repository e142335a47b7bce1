//! Errors raised by request validation and local storage.

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Request rejected before it reaches the service
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Storage could not be read or written
    #[error("Internal error: {0}")]
    Internal(String),
}
