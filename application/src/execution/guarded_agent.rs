//! Guarded execution of one agent call.
//!
//! Composes, in order: breaker admission, guardrail screening of the
//! agent's arguments, bounded retry of the call, and recording the final
//! outcome on the breaker. Breaker transitions are published as
//! `circuit_state_changed` events.
//!
//! Outcome accounting:
//!
//! | Outcome                        | Breaker        |
//! |--------------------------------|----------------|
//! | success                        | `on_success`   |
//! | retries exhausted / fatal      | `on_failure`   |
//! | guardrail or policy rejection  | untouched      |
//! | cancelled                      | untouched      |

use super::retry_executor::{ExecutionError, RetryExecutor};
use crate::agents::{Agent, StepInput};
use crate::ports::event_notifier::{EventNotifier, OrchestrationEvent, publish_best_effort};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use triage_domain::{
    Admission, AgentResponse, CallError, CircuitBreaker, FailureKind, GuardrailFilter,
    StateTransition,
};

pub struct GuardedAgent {
    agent: Arc<dyn Agent>,
    breaker: Arc<CircuitBreaker>,
    guardrail: Arc<GuardrailFilter>,
    executor: RetryExecutor,
    notifier: Arc<dyn EventNotifier>,
}

impl GuardedAgent {
    pub fn new(
        agent: Arc<dyn Agent>,
        breaker: Arc<CircuitBreaker>,
        guardrail: Arc<GuardrailFilter>,
        executor: RetryExecutor,
        notifier: Arc<dyn EventNotifier>,
    ) -> Self {
        Self {
            agent,
            breaker,
            guardrail,
            executor,
            notifier,
        }
    }

    pub fn name(&self) -> &str {
        self.agent.name()
    }

    pub fn breaker(&self) -> &Arc<CircuitBreaker> {
        &self.breaker
    }

    async fn publish_transition(&self, transition: Option<StateTransition>) {
        if let Some(t) = transition {
            debug!("Breaker {} moved {} -> {}", t.breaker, t.from, t.to);
            publish_best_effort(
                self.notifier.as_ref(),
                OrchestrationEvent::circuit_state_changed(&t),
            )
            .await;
        }
    }

    /// Run the agent behind the full guard stack
    pub async fn execute(&self, input: &StepInput<'_>, cancel: &CancellationToken) -> AgentResponse {
        let name = self.agent.name();

        match self.breaker.allow() {
            Admission::Allowed => {}
            Admission::Probe { transition } => {
                debug!("Admitting half-open probe for {}", name);
                self.publish_transition(transition).await;
            }
            Admission::Rejected => {
                warn!("Circuit breaker open for {}", name);
                return AgentResponse::failure(
                    FailureKind::CircuitOpen,
                    format!("circuit breaker open for {}", name),
                );
            }
        }

        let sanitized = match self.guardrail.check(self.agent.arguments(input)) {
            Ok(sanitized) => sanitized,
            Err(e) => {
                warn!("Guardrail rejected input for {}: {:?}", name, e);
                return AgentResponse::failure(FailureKind::PolicyViolation, e.to_string());
            }
        };

        let result = self
            .executor
            .execute_with_cancel(|| self.agent.call(&sanitized), cancel)
            .await;

        match result {
            Ok(data) => {
                let transition = self.breaker.on_success();
                self.publish_transition(transition).await;
                AgentResponse::success(data).with_metadata("agent", name)
            }
            Err(ExecutionError::Cancelled) => {
                debug!("Call to {} cancelled", name);
                AgentResponse::failure(FailureKind::Cancelled, "execution cancelled")
            }
            Err(ExecutionError::Aborted(CallError::PolicyViolation(msg))) => {
                warn!("{} refused by policy: {}", name, msg);
                AgentResponse::failure(FailureKind::PolicyViolation, msg)
            }
            Err(e) => {
                let kind = match e {
                    ExecutionError::Exhausted { .. } => FailureKind::Transient,
                    _ => FailureKind::Fatal,
                };
                warn!("Agent {} execution failed: {}", name, e);
                let transition = self.breaker.on_failure();
                self.publish_transition(transition).await;
                AgentResponse::failure(kind, e.to_string())
            }
        }
    }
}
