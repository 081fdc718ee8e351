//! Application-level configuration.
//!
//! [`OrchestratorConfig`] carries the breaker, retry and guardrail policies
//! plus the run and batch limits.

pub mod orchestrator_config;

pub use orchestrator_config::{
    DEFAULT_ACTIVITY_WINDOW, DEFAULT_BATCH_CONCURRENCY, DEFAULT_MAX_BATCH_SIZE, OrchestratorConfig,
};
