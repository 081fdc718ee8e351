//! Errors an agent call can produce.

use std::time::Duration;
use thiserror::Error;

/// Retry-eligible infrastructure failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransientError {
    #[error("operation timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("connection failure: {0}")]
    Connection(String),
}

/// Outcome of a failed agent call, tagged by retry eligibility
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    /// Retried up to the attempt limit
    #[error(transparent)]
    Transient(#[from] TransientError),

    /// Rejected by policy; never retried and never counted against the agent's breaker
    #[error("policy violation: {0}")]
    PolicyViolation(String),

    /// Any other failure; aborts immediately
    #[error("{0}")]
    Fatal(String),
}

impl CallError {
    pub fn connection(message: impl Into<String>) -> Self {
        CallError::Transient(TransientError::Connection(message.into()))
    }

    pub fn timeout(after: Duration) -> Self {
        CallError::Transient(TransientError::Timeout(after))
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        CallError::Fatal(message.into())
    }

    pub fn policy(message: impl Into<String>) -> Self {
        CallError::PolicyViolation(message.into())
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, CallError::Transient(_))
    }
}
