//! Retry policy and the call error taxonomy.
//!
//! Retry eligibility is decided by the error type: only
//! [`CallError::Transient`] is retried, everything else aborts the step.

pub mod error;
pub mod policy;

pub use error::{CallError, TransientError};
pub use policy::RetryPolicy;
