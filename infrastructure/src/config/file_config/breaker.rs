//! Circuit breaker configuration from TOML (`[breaker]` section)

use super::out_of_range;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use triage_domain::{BreakerPolicy, ConfigIssue};

/// Raw breaker configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBreakerConfig {
    /// Consecutive failures before a breaker opens
    pub failure_threshold: u32,
    /// Seconds an open breaker waits before admitting a probe
    pub recovery_timeout_secs: u64,
}

impl Default for FileBreakerConfig {
    fn default() -> Self {
        let policy = BreakerPolicy::default();
        Self {
            failure_threshold: policy.failure_threshold,
            recovery_timeout_secs: policy.recovery_timeout.as_secs(),
        }
    }
}

impl FileBreakerConfig {
    /// Convert to a [`BreakerPolicy`], replacing zero values with defaults
    pub fn to_policy(&self) -> (BreakerPolicy, Vec<ConfigIssue>) {
        let defaults = BreakerPolicy::default();
        let mut issues = Vec::new();

        let failure_threshold = if self.failure_threshold == 0 {
            issues.push(out_of_range(
                "breaker.failure_threshold",
                self.failure_threshold,
                defaults.failure_threshold,
            ));
            defaults.failure_threshold
        } else {
            self.failure_threshold
        };

        let recovery_timeout = if self.recovery_timeout_secs == 0 {
            issues.push(out_of_range(
                "breaker.recovery_timeout_secs",
                self.recovery_timeout_secs,
                defaults.recovery_timeout.as_secs(),
            ));
            defaults.recovery_timeout
        } else {
            Duration::from_secs(self.recovery_timeout_secs)
        };

        (BreakerPolicy::new(failure_threshold, recovery_timeout), issues)
    }
}
