//! Circuit breaker value types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default number of failures that opens a breaker.
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 3;

/// Default time an open breaker waits before admitting a probe.
pub const DEFAULT_RECOVERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Circuit breaker state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CircuitState {
    /// Requests flow normally
    #[default]
    Closed,
    /// Requests are rejected until the recovery timeout elapses
    Open,
    /// One probe request is in flight; its outcome decides the next state
    HalfOpen,
}

impl CircuitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitState::Closed => "closed",
            CircuitState::Open => "open",
            CircuitState::HalfOpen => "half-open",
        }
    }
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Breaker tunables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakerPolicy {
    /// Consecutive failures that open the breaker
    pub failure_threshold: u32,
    /// How long an open breaker rejects before admitting a probe
    pub recovery_timeout: Duration,
}

impl Default for BreakerPolicy {
    fn default() -> Self {
        Self {
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            recovery_timeout: DEFAULT_RECOVERY_TIMEOUT,
        }
    }
}

impl BreakerPolicy {
    pub fn new(failure_threshold: u32, recovery_timeout: Duration) -> Self {
        Self {
            failure_threshold,
            recovery_timeout,
        }
    }
}

/// A state change, reported so callers can publish it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateTransition {
    pub breaker: String,
    pub from: CircuitState,
    pub to: CircuitState,
}

/// Result of an admission check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Breaker closed; the call may proceed
    Allowed,
    /// The single half-open probe; `transition` is set when this admission
    /// moved the breaker out of `Open`
    Probe { transition: Option<StateTransition> },
    /// Breaker open (or probe already in flight); the call must not run
    Rejected,
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, Admission::Rejected)
    }
}

/// Read-only snapshot for health reporting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakerStatus {
    pub name: String,
    pub state: CircuitState,
    pub failure_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_failure: Option<DateTime<Utc>>,
}
