//! Breaker registry owned by the composition root.
//!
//! One breaker per agent name, created once and handed to the agent that
//! owns it. The registry is the only place that enumerates breakers, which
//! is what status reporting and the administrative reset need.

use super::circuit::CircuitBreaker;
use super::state::{BreakerPolicy, BreakerStatus, CircuitState, StateTransition};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct BreakerRegistry {
    policy: BreakerPolicy,
    breakers: BTreeMap<String, Arc<CircuitBreaker>>,
}

impl BreakerRegistry {
    pub fn new(policy: BreakerPolicy) -> Self {
        Self {
            policy,
            breakers: BTreeMap::new(),
        }
    }

    /// Return the breaker for `name`, creating it with the registry policy
    /// on first use.
    pub fn register(&mut self, name: &str) -> Arc<CircuitBreaker> {
        let policy = self.policy;
        Arc::clone(
            self.breakers
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(CircuitBreaker::new(name, policy))),
        )
    }

    pub fn get(&self, name: &str) -> Option<&Arc<CircuitBreaker>> {
        self.breakers.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.breakers.keys().map(String::as_str)
    }

    /// Snapshot of every breaker, keyed by name
    pub fn statuses(&self) -> BTreeMap<String, BreakerStatus> {
        self.breakers
            .iter()
            .map(|(name, cb)| (name.clone(), cb.status()))
            .collect()
    }

    pub fn any_open(&self) -> bool {
        self.breakers
            .values()
            .any(|cb| cb.state() == CircuitState::Open)
    }

    /// Close every breaker, returning the transitions that actually happened
    pub fn reset_all(&self) -> Vec<StateTransition> {
        self.breakers
            .values()
            .filter_map(|cb| cb.on_success())
            .collect()
    }
}
