//! Orchestrator limits from TOML (`[orchestrator]` section)

use super::out_of_range;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use triage_application::config::{DEFAULT_BATCH_CONCURRENCY, DEFAULT_MAX_BATCH_SIZE};
use triage_domain::ConfigIssue;

/// Raw orchestrator configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestratorConfig {
    /// Wall-clock budget for a whole run; unset means no deadline
    pub plan_deadline_ms: Option<u64>,
    pub batch_concurrency: usize,
    pub max_batch_size: usize,
}

impl Default for FileOrchestratorConfig {
    fn default() -> Self {
        Self {
            plan_deadline_ms: None,
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }
}

impl FileOrchestratorConfig {
    pub fn plan_deadline(&self) -> (Option<Duration>, Vec<ConfigIssue>) {
        match self.plan_deadline_ms {
            Some(0) => (
                None,
                vec![out_of_range("orchestrator.plan_deadline_ms", 0, "none")],
            ),
            ms => (ms.map(Duration::from_millis), vec![]),
        }
    }

    pub fn batch_concurrency(&self) -> (usize, Vec<ConfigIssue>) {
        if self.batch_concurrency == 0 {
            let issue = out_of_range(
                "orchestrator.batch_concurrency",
                0,
                DEFAULT_BATCH_CONCURRENCY,
            );
            (DEFAULT_BATCH_CONCURRENCY, vec![issue])
        } else {
            (self.batch_concurrency, vec![])
        }
    }

    pub fn max_batch_size(&self) -> (usize, Vec<ConfigIssue>) {
        if self.max_batch_size == 0 {
            let issue = out_of_range("orchestrator.max_batch_size", 0, DEFAULT_MAX_BATCH_SIZE);
            (DEFAULT_MAX_BATCH_SIZE, vec![issue])
        } else {
            (self.max_batch_size, vec![])
        }
    }
}
