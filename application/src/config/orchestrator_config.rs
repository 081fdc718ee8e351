//! Orchestrator configuration: resilience policies and run limits.
//!
//! [`OrchestratorConfig`] groups everything the composition root needs to
//! build an [`Orchestrator`](crate::use_cases::orchestrate::Orchestrator)
//! and the batch use case. File and environment loading live in the
//! infrastructure layer; this type only carries validated values.

use std::time::Duration;
use triage_domain::{BreakerPolicy, GuardrailPolicy, RetryPolicy};

/// Default bounded concurrency for batch assessment.
pub const DEFAULT_BATCH_CONCURRENCY: usize = 8;

/// Default maximum number of requests in one batch.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 100;

/// Default look-back for "recent" customer activity.
pub const DEFAULT_ACTIVITY_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Policy for every breaker, the orchestrator's own included
    pub breaker: BreakerPolicy,
    /// Per-call retry policy shared by all agents
    pub retry: RetryPolicy,
    /// Guardrail tunables
    pub guardrail: GuardrailPolicy,
    /// Optional wall-clock budget for a whole plan; `None` disables it
    pub plan_deadline: Option<Duration>,
    /// Maximum concurrent runs inside one batch
    pub batch_concurrency: usize,
    /// Largest accepted batch
    pub max_batch_size: usize,
    /// Window passed to the customer directory for recent activity
    pub activity_window: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            breaker: BreakerPolicy::default(),
            retry: RetryPolicy::default(),
            guardrail: GuardrailPolicy::default(),
            plan_deadline: None,
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            activity_window: DEFAULT_ACTIVITY_WINDOW,
        }
    }
}

impl OrchestratorConfig {
    // ==================== Builder Methods ====================

    pub fn with_breaker(mut self, policy: BreakerPolicy) -> Self {
        self.breaker = policy;
        self
    }

    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    pub fn with_guardrail(mut self, policy: GuardrailPolicy) -> Self {
        self.guardrail = policy;
        self
    }

    pub fn with_plan_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.plan_deadline = deadline;
        self
    }

    pub fn with_batch_concurrency(mut self, concurrency: usize) -> Self {
        self.batch_concurrency = concurrency.max(1);
        self
    }

    pub fn with_max_batch_size(mut self, size: usize) -> Self {
        self.max_batch_size = size;
        self
    }

    pub fn with_activity_window(mut self, window: Duration) -> Self {
        self.activity_window = window;
        self
    }
}
