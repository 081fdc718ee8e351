//! Bounded exponential backoff policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-attempt timeout and backoff bounds for one agent call.
///
/// `delay(n) = min(base_delay * 2^(n-1) + jitter, max_delay)` where jitter
/// is at most `jitter_ratio` of the un-jittered delay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Upper bound on a single attempt
    pub attempt_timeout: Duration,
    /// Total attempts including the first one
    pub max_attempts: u32,
    /// Delay after the first failed attempt
    pub base_delay: Duration,
    /// Ceiling for any delay
    pub max_delay: Duration,
    /// Fraction of the delay added as random jitter (0.0 - 1.0)
    pub jitter_ratio: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_secs(1),
            max_attempts: 2,
            base_delay: Duration::from_millis(150),
            max_delay: Duration::from_millis(400),
            jitter_ratio: 0.1,
        }
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = max;
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn with_delays(mut self, base: Duration, max: Duration) -> Self {
        self.base_delay = base;
        self.max_delay = max;
        self
    }

    pub fn with_jitter_ratio(mut self, ratio: f64) -> Self {
        self.jitter_ratio = ratio;
        self
    }

    /// Un-jittered delay after the `attempt`-th failure (1-based)
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        let raw = self.base_delay.saturating_mul(1u32 << exponent);
        raw.min(self.max_delay)
    }

    /// Delay with jitter applied; `unit` is a sample from `[0, 1)`
    pub fn jittered_delay(&self, attempt: u32, unit: f64) -> Duration {
        let delay = self.backoff_delay(attempt);
        let ratio = self.jitter_ratio.clamp(0.0, 1.0) * unit.clamp(0.0, 1.0);
        let jitter = delay.mul_f64(ratio);
        (delay + jitter).min(self.max_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 2);
        assert_eq!(policy.attempt_timeout, Duration::from_secs(1));
        assert_eq!(policy.base_delay, Duration::from_millis(150));
        assert_eq!(policy.max_delay, Duration::from_millis(400));
    }

    #[test]
    fn test_backoff_is_exponential_and_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_delay(1), Duration::from_millis(150));
        assert_eq!(policy.backoff_delay(2), Duration::from_millis(300));
        assert_eq!(policy.backoff_delay(3), Duration::from_millis(400));
        assert_eq!(policy.backoff_delay(40), Duration::from_millis(400));
    }

    #[test]
    fn test_jitter_stays_within_bounds() {
        let policy = RetryPolicy::default();
        for attempt in 1..5 {
            for unit in [0.0, 0.25, 0.5, 0.999] {
                let d = policy.jittered_delay(attempt, unit);
                assert!(d >= policy.base_delay, "{:?} below floor", d);
                assert!(d <= policy.max_delay, "{:?} above ceiling", d);
            }
        }
        assert_eq!(policy.jittered_delay(1, 0.0), Duration::from_millis(150));
        let half = policy.jittered_delay(1, 0.5);
        assert!(half > Duration::from_millis(157) && half < Duration::from_millis(158));
    }
}
