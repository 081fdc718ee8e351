//! Per-agent circuit breaker.
//!
//! State lives behind a mutex scoped to the breaker instance, so concurrent
//! runs sharing an agent see consistent `failure_count`/`state` updates.
//! A half-open breaker admits exactly one probe; if the probe never reports
//! back (cancelled, or rejected by a guardrail before the call), a new probe
//! is admitted once another recovery timeout has passed.

use super::state::{Admission, BreakerPolicy, BreakerStatus, CircuitState, StateTransition};
use chrono::{DateTime, Utc};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

#[derive(Debug, Default)]
struct BreakerInner {
    state: CircuitState,
    failure_count: u32,
    last_failure: Option<Instant>,
    last_failure_at: Option<DateTime<Utc>>,
    probe_started: Option<Instant>,
}

/// Failure-tracking admission gate for one agent
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    policy: BreakerPolicy,
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, policy: BreakerPolicy) -> Self {
        Self {
            name: name.into(),
            policy,
            inner: Mutex::new(BreakerInner::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> &BreakerPolicy {
        &self.policy
    }

    fn lock(&self) -> MutexGuard<'_, BreakerInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Decide whether a call may proceed.
    pub fn allow(&self) -> Admission {
        let mut inner = self.lock();
        let timeout = self.policy.recovery_timeout;

        match inner.state {
            CircuitState::Closed => Admission::Allowed,
            CircuitState::Open => {
                let recovered = inner
                    .last_failure
                    .is_some_and(|at| at.elapsed() > timeout);
                if !recovered {
                    return Admission::Rejected;
                }
                inner.state = CircuitState::HalfOpen;
                inner.probe_started = Some(Instant::now());
                Admission::Probe {
                    transition: Some(self.transition(CircuitState::Open, CircuitState::HalfOpen)),
                }
            }
            CircuitState::HalfOpen => {
                let abandoned = inner
                    .probe_started
                    .is_none_or(|at| at.elapsed() > timeout);
                if !abandoned {
                    return Admission::Rejected;
                }
                inner.probe_started = Some(Instant::now());
                Admission::Probe { transition: None }
            }
        }
    }

    /// Record a successful call. Always resets to `Closed`; also used for
    /// manual operator reset.
    pub fn on_success(&self) -> Option<StateTransition> {
        let mut inner = self.lock();
        let from = inner.state;

        inner.state = CircuitState::Closed;
        inner.failure_count = 0;
        inner.last_failure = None;
        inner.last_failure_at = None;
        inner.probe_started = None;

        (from != CircuitState::Closed).then(|| self.transition(from, CircuitState::Closed))
    }

    /// Record a failed call: increments the counter and opens the breaker
    /// once the threshold is reached (immediately when half-open).
    pub fn on_failure(&self) -> Option<StateTransition> {
        let mut inner = self.lock();
        let from = inner.state;

        inner.failure_count = inner.failure_count.saturating_add(1);
        inner.last_failure = Some(Instant::now());
        inner.last_failure_at = Some(Utc::now());

        let should_open = from == CircuitState::HalfOpen
            || inner.failure_count >= self.policy.failure_threshold;
        if should_open {
            inner.state = CircuitState::Open;
            inner.probe_started = None;
        }

        (inner.state != from).then(|| self.transition(from, inner.state))
    }

    /// Current state without triggering any transition
    pub fn state(&self) -> CircuitState {
        self.lock().state
    }

    /// Read-only snapshot
    pub fn status(&self) -> BreakerStatus {
        let inner = self.lock();
        BreakerStatus {
            name: self.name.clone(),
            state: inner.state,
            failure_count: inner.failure_count,
            last_failure: inner.last_failure_at,
        }
    }

    fn transition(&self, from: CircuitState, to: CircuitState) -> StateTransition {
        StateTransition {
            breaker: self.name.clone(),
            from,
            to,
        }
    }
}
