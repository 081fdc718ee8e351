//! Retry configuration from TOML (`[retry]` section)

use super::out_of_range;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use triage_domain::{ConfigIssue, ConfigIssueCode, RetryPolicy};

/// Raw retry configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetryConfig {
    /// Total attempts per call, including the first
    pub max_attempts: u32,
    pub attempt_timeout_ms: u64,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Fraction of each delay added as jitter, 0.0 to 1.0
    pub jitter_ratio: f64,
}

impl Default for FileRetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            attempt_timeout_ms: policy.attempt_timeout.as_millis() as u64,
            base_delay_ms: policy.base_delay.as_millis() as u64,
            max_delay_ms: policy.max_delay.as_millis() as u64,
            jitter_ratio: policy.jitter_ratio,
        }
    }
}

impl FileRetryConfig {
    /// Convert to a [`RetryPolicy`]; out-of-range values fall back to defaults
    pub fn to_policy(&self) -> (RetryPolicy, Vec<ConfigIssue>) {
        let defaults = RetryPolicy::default();
        let mut policy = defaults.clone();
        let mut issues = Vec::new();

        if self.max_attempts == 0 {
            issues.push(out_of_range(
                "retry.max_attempts",
                self.max_attempts,
                defaults.max_attempts,
            ));
        } else {
            policy.max_attempts = self.max_attempts;
        }

        if self.attempt_timeout_ms == 0 {
            issues.push(out_of_range(
                "retry.attempt_timeout_ms",
                self.attempt_timeout_ms,
                defaults.attempt_timeout.as_millis(),
            ));
        } else {
            policy.attempt_timeout = Duration::from_millis(self.attempt_timeout_ms);
        }

        if self.base_delay_ms > self.max_delay_ms {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "retry.base_delay_ms".to_string(),
                    value: self.base_delay_ms.to_string(),
                },
                format!(
                    "retry.base_delay_ms ({}) exceeds retry.max_delay_ms ({}), using default delays",
                    self.base_delay_ms, self.max_delay_ms
                ),
            ));
        } else {
            policy.base_delay = Duration::from_millis(self.base_delay_ms);
            policy.max_delay = Duration::from_millis(self.max_delay_ms);
        }

        if (0.0..=1.0).contains(&self.jitter_ratio) {
            policy.jitter_ratio = self.jitter_ratio;
        } else {
            issues.push(out_of_range(
                "retry.jitter_ratio",
                self.jitter_ratio,
                defaults.jitter_ratio,
            ));
        }

        (policy, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_domain() {
        let (policy, issues) = FileRetryConfig::default().to_policy();
        assert_eq!(policy, RetryPolicy::default());
        assert!(issues.is_empty());
    }

    #[test]
    fn test_inverted_delays_fall_back() {
        let config = FileRetryConfig {
            base_delay_ms: 900,
            max_delay_ms: 100,
            ..Default::default()
        };
        let (policy, issues) = config.to_policy();
        assert_eq!(policy.base_delay, Duration::from_millis(150));
        assert_eq!(policy.max_delay, Duration::from_millis(400));
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_jitter_out_of_range() {
        let config = FileRetryConfig {
            jitter_ratio: 1.5,
            max_attempts: 4,
            ..Default::default()
        };
        let (policy, issues) = config.to_policy();
        assert_eq!(policy.jitter_ratio, 0.1);
        assert_eq!(policy.max_attempts, 4);
        assert!(issues[0].message.contains("retry.jitter_ratio"));
    }
}
