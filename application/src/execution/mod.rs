//! Guarded call execution.
//!
//! - [`RetryExecutor`]: per-attempt timeout and bounded jittered backoff
//! - [`GuardedAgent`]: breaker, guardrail and retry around one agent

pub mod guarded_agent;
pub mod retry_executor;

pub use guarded_agent::GuardedAgent;
pub use retry_executor::{ExecutionError, RetryExecutor};
