//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown plan step: {0}")]
    UnknownStep(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Batch of {size} requests exceeds the limit of {limit}")]
    BatchTooLarge { size: usize, limit: usize },

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}
