//! Circuit breakers.
//!
//! - [`CircuitBreaker`]: Closed / Open / Half-Open admission gate
//! - [`BreakerRegistry`]: one breaker per agent name, owned by the orchestrator

pub mod circuit;
pub mod registry;
pub mod state;

pub use circuit::CircuitBreaker;
pub use registry::BreakerRegistry;
pub use state::{
    Admission, BreakerPolicy, BreakerStatus, CircuitState, StateTransition,
    DEFAULT_FAILURE_THRESHOLD, DEFAULT_RECOVERY_TIMEOUT,
};
