//! Bounded retry executor.
//!
//! Runs one call under a per-attempt timeout and retries only
//! [`CallError::Transient`] failures, sleeping a jittered exponential
//! backoff between attempts. The executor never touches a breaker; the
//! caller records the final outcome exactly once.

use rand::Rng;
use std::future::Future;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use triage_domain::{CallError, RetryPolicy};

/// Why an execution did not produce a value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    /// Every attempt failed with a transient error; `last` is the final one
    #[error("{last} (after {attempts} attempts)")]
    Exhausted { attempts: u32, last: CallError },

    /// A non-transient error stopped execution on the first occurrence
    #[error(transparent)]
    Aborted(CallError),

    /// The caller cancelled while an attempt or backoff was pending
    #[error("execution cancelled")]
    Cancelled,
}

impl ExecutionError {
    /// The call error that ended execution, if it was not cancelled
    pub fn call_error(&self) -> Option<&CallError> {
        match self {
            ExecutionError::Exhausted { last, .. } => Some(last),
            ExecutionError::Aborted(e) => Some(e),
            ExecutionError::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ExecutionError::Cancelled)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Execute without external cancellation
    pub async fn execute<T, F, Fut>(&self, call: F) -> Result<T, ExecutionError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, CallError>>,
    {
        self.execute_with_cancel(call, &CancellationToken::new()).await
    }

    /// Execute, abandoning the in-flight attempt or backoff on cancellation
    pub async fn execute_with_cancel<T, F, Fut>(
        &self,
        mut call: F,
        cancel: &CancellationToken,
    ) -> Result<T, ExecutionError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, CallError>>,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let timeout = self.policy.attempt_timeout;
        let mut attempt = 0;

        loop {
            attempt += 1;

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ExecutionError::Cancelled),
                result = tokio::time::timeout(timeout, call()) => result,
            };

            let error = match result {
                Ok(Ok(value)) => {
                    if attempt > 1 {
                        debug!("Call succeeded on attempt {}/{}", attempt, max_attempts);
                    }
                    return Ok(value);
                }
                Ok(Err(e)) if !e.is_transient() => {
                    debug!("Non-retryable error on attempt {}: {}", attempt, e);
                    return Err(ExecutionError::Aborted(e));
                }
                Ok(Err(e)) => e,
                Err(_elapsed) => CallError::timeout(timeout),
            };

            if attempt >= max_attempts {
                warn!("All {} attempts failed: {}", max_attempts, error);
                return Err(ExecutionError::Exhausted {
                    attempts: attempt,
                    last: error,
                });
            }

            let unit: f64 = rand::thread_rng().r#gen();
            let delay = self.policy.jittered_delay(attempt, unit);
            warn!(
                "Attempt {}/{} failed: {}; retrying in {}ms",
                attempt,
                max_attempts,
                error,
                delay.as_millis()
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ExecutionError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}
