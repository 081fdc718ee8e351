//! Ports for customer data held outside the core.
//!
//! - [`CustomerDirectory`]: profile and recent-activity lookup
//! - [`OtpQuota`]: per-customer one-time-passcode rate limit
//!
//! Both are narrow request/response interfaces; how the data is stored is
//! the adapter's concern.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use triage_domain::{CallError, CustomerProfile, Transaction};

/// Errors reported by an external customer store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("customer store unavailable: {0}")]
    Unavailable(String),

    #[error("customer store timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("customer store returned invalid data: {0}")]
    Corrupt(String),
}

impl From<DirectoryError> for CallError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::Unavailable(msg) => CallError::connection(msg),
            DirectoryError::Timeout(after) => CallError::timeout(after),
            corrupt @ DirectoryError::Corrupt(_) => CallError::fatal(corrupt.to_string()),
        }
    }
}

/// Read access to customer profiles and their recent transactions
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// Profile for `customer_id`, `None` if the customer is unknown
    async fn profile(&self, customer_id: &str) -> Result<Option<CustomerProfile>, DirectoryError>;

    /// Transactions within `window` of the customer's latest activity
    async fn recent_transactions(
        &self,
        customer_id: &str,
        window: Duration,
    ) -> Result<Vec<Transaction>, DirectoryError>;
}

/// Per-customer OTP rate limit
#[async_trait]
pub trait OtpQuota: Send + Sync {
    /// Consume one OTP request; `Ok(false)` when the limit is exhausted
    async fn try_acquire(&self, customer_id: &str) -> Result<bool, DirectoryError>;
}

/// Directory with no customers; every lookup is empty
pub struct EmptyDirectory;

#[async_trait]
impl CustomerDirectory for EmptyDirectory {
    async fn profile(&self, _customer_id: &str) -> Result<Option<CustomerProfile>, DirectoryError> {
        Ok(None)
    }

    async fn recent_transactions(
        &self,
        _customer_id: &str,
        _window: Duration,
    ) -> Result<Vec<Transaction>, DirectoryError> {
        Ok(Vec::new())
    }
}

/// Quota that never runs out
pub struct UnlimitedOtpQuota;

#[async_trait]
impl OtpQuota for UnlimitedOtpQuota {
    async fn try_acquire(&self, _customer_id: &str) -> Result<bool, DirectoryError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_error_classification() {
        assert!(CallError::from(DirectoryError::Unavailable("down".into())).is_transient());
        assert!(CallError::from(DirectoryError::Timeout(Duration::from_millis(5))).is_transient());

        let fatal = CallError::from(DirectoryError::Corrupt("bad row".into()));
        assert!(!fatal.is_transient());
        assert!(fatal.to_string().contains("bad row"));
    }
}
