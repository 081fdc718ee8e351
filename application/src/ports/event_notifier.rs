//! Port for publishing orchestration events.
//!
//! Defines the [`EventNotifier`] trait the orchestrator calls after each
//! step, at run completion, and whenever a breaker changes state.
//!
//! Publication is best-effort: a failing notifier must never fail a run.
//! Callers go through [`publish_best_effort`], which logs and discards
//! errors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::warn;
use triage_domain::{FailureKind, PlanOutcome, StateTransition};

/// Event type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    StepCompleted,
    StepFailed,
    RunCompleted,
    CircuitStateChanged,
    SystemReset,
    BatchCompleted,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::StepCompleted => "step_completed",
            EventType::StepFailed => "step_failed",
            EventType::RunCompleted => "run_completed",
            EventType::CircuitStateChanged => "circuit_state_changed",
            EventType::SystemReset => "system_reset",
            EventType::BatchCompleted => "batch_completed",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured orchestration event.
///
/// Each event has a type, a UTC timestamp taken at construction, and a JSON
/// payload with event-specific fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrchestrationEvent {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub timestamp: DateTime<Utc>,
    pub payload: Value,
}

impl OrchestrationEvent {
    pub fn new(event_type: EventType, payload: Value) -> Self {
        Self {
            event_type,
            timestamp: Utc::now(),
            payload,
        }
    }

    pub fn step_completed(run_id: &str, step: &str, index: usize, total: usize) -> Self {
        Self::new(
            EventType::StepCompleted,
            json!({ "run_id": run_id, "step": step, "index": index, "total": total }),
        )
    }

    pub fn step_failed(run_id: &str, step: &str, kind: Option<FailureKind>, error: &str) -> Self {
        Self::new(
            EventType::StepFailed,
            json!({
                "run_id": run_id,
                "step": step,
                "failure": kind.map(|k| k.as_str()),
                "error": error,
            }),
        )
    }

    pub fn run_completed(outcome: &PlanOutcome) -> Self {
        Self::new(
            EventType::RunCompleted,
            json!({
                "run_id": outcome.run_id,
                "success": outcome.success,
                "plan": outcome.plan,
                "steps_completed": outcome.results.len(),
                "failed_step": outcome.failed_step,
                "error": outcome.error,
            }),
        )
    }

    pub fn circuit_state_changed(transition: &StateTransition) -> Self {
        Self::new(
            EventType::CircuitStateChanged,
            json!({
                "breaker": transition.breaker,
                "from": transition.from.as_str(),
                "to": transition.to.as_str(),
            }),
        )
    }

    pub fn system_reset(transitions: &[StateTransition]) -> Self {
        let closed: Vec<&str> = transitions.iter().map(|t| t.breaker.as_str()).collect();
        Self::new(EventType::SystemReset, json!({ "closed": closed }))
    }

    pub fn batch_completed(processed: usize, successful: usize, failed: usize) -> Self {
        Self::new(
            EventType::BatchCompleted,
            json!({ "processed": processed, "successful": successful, "failed": failed }),
        )
    }

    /// `run_id` carried by the payload, if any
    pub fn run_id(&self) -> Option<&str> {
        self.payload.get("run_id").and_then(Value::as_str)
    }
}

/// Errors a notifier adapter can report
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("event sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("event serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// One or more sinks rejected the event
    #[error("event sink unavailable: {0}")]
    Unavailable(String),
}

/// Port for publishing orchestration events
#[async_trait]
pub trait EventNotifier: Send + Sync {
    async fn publish(&self, event: &OrchestrationEvent) -> Result<(), NotifyError>;
}

/// No-op implementation for tests and when no sink is configured
pub struct NoEventNotifier;

#[async_trait]
impl EventNotifier for NoEventNotifier {
    async fn publish(&self, _event: &OrchestrationEvent) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Publish and swallow failures (logged at `warn`).
pub async fn publish_best_effort(notifier: &dyn EventNotifier, event: OrchestrationEvent) {
    if let Err(e) = notifier.publish(&event).await {
        warn!("Failed to publish {} event: {}", event.event_type, e);
    }
}
