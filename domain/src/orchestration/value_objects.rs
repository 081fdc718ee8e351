//! Orchestration value objects - inputs and terminal results of a run.
//!
//! - [`PlanRequest`] - what a caller asks the orchestrator to do
//! - [`ExecutionPlan`] - the ordered step list derived from a request
//! - [`StepResults`] - successful step outputs in execution order
//! - [`PlanOutcome`] - terminal value of one run
//! - [`BatchReport`] - aggregate over many independent runs
//! - [`SystemStatus`] - breaker snapshot for the health surface

use crate::agent::FailureKind;
use crate::breaker::{BreakerStatus, CircuitState};
use crate::core::error::DomainError;
use crate::fraud::Transaction;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// A request to triage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub query: String,
    #[serde(alias = "customerId")]
    pub customer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<Transaction>,
    /// Caller-supplied plan; bypasses keyword planning when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<Vec<String>>,
}

impl PlanRequest {
    pub fn new(query: impl Into<String>, customer_id: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            customer_id: customer_id.into(),
            transaction: None,
            plan: None,
        }
    }

    pub fn with_transaction(mut self, transaction: Transaction) -> Self {
        self.transaction = Some(transaction);
        self
    }

    pub fn with_plan<I, S>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.plan = Some(steps.into_iter().map(Into::into).collect());
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.customer_id.trim().is_empty() {
            return Err(DomainError::InvalidRequest(
                "customer_id must not be empty".to_string(),
            ));
        }
        match &self.transaction {
            Some(txn) if txn.customer_id != self.customer_id => {
                Err(DomainError::InvalidRequest(format!(
                    "transaction {} belongs to customer {}, not {}",
                    txn.id, txn.customer_id, self.customer_id
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Ordered, immutable list of step identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionPlan(Vec<String>);

impl ExecutionPlan {
    /// Build a plan, keeping the first occurrence of each step
    pub fn new<I, S>(steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for step in steps {
            let step = step.into();
            if !out.contains(&step) {
                out.push(step);
            }
        }
        Self(out)
    }

    pub fn steps(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, step: &str) -> bool {
        self.0.iter().any(|s| s == step)
    }
}

impl std::fmt::Display for ExecutionPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(empty)");
        }
        write!(f, "{}", self.0.join(" -> "))
    }
}

/// Step outputs keyed by step identifier, in execution order.
///
/// Serialized as a JSON object whose key order is the execution order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepResults(Vec<(String, Value)>);

impl StepResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a step output; a repeated step replaces its earlier value in place
    pub fn insert(&mut self, step: impl Into<String>, data: Value) {
        let step = step.into();
        match self.0.iter_mut().find(|(s, _)| *s == step) {
            Some(entry) => entry.1 = data,
            None => self.0.push((step, data)),
        }
    }

    pub fn get(&self, step: &str) -> Option<&Value> {
        self.0.iter().find(|(s, _)| s == step).map(|(_, v)| v)
    }

    pub fn contains(&self, step: &str) -> bool {
        self.get(step).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(s, _)| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(s, v)| (s.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Apply `f` to every value (used for redaction before rendering)
    pub fn map_values(self, mut f: impl FnMut(Value) -> Value) -> Self {
        Self(self.0.into_iter().map(|(s, v)| (s, f(v))).collect())
    }
}

impl Serialize for StepResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (step, data) in &self.0 {
            map.serialize_entry(step, data)?;
        }
        map.end()
    }
}

/// Terminal value returned to the caller of a run.
///
/// A failed run still carries every result recorded before the failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanOutcome {
    pub run_id: String,
    pub success: bool,
    pub plan: ExecutionPlan,
    pub results: StepResults,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_step: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
}

impl PlanOutcome {
    /// Run refused before planning (orchestrator breaker open, invalid request)
    pub fn rejected(run_id: impl Into<String>, kind: FailureKind, error: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            success: false,
            plan: ExecutionPlan::default(),
            results: StepResults::new(),
            error: Some(error.into()),
            failed_step: None,
            failure: Some(kind),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn result(&self, step: &str) -> Option<&Value> {
        self.results.get(step)
    }
}

/// Aggregate report over a batch of independent runs, in input order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub processed: usize,
    pub successful: usize,
    pub failed: usize,
    pub outcomes: Vec<PlanOutcome>,
}

impl BatchReport {
    pub fn from_outcomes(outcomes: Vec<PlanOutcome>) -> Self {
        let successful = outcomes.iter().filter(|o| o.success).count();
        Self {
            processed: outcomes.len(),
            successful,
            failed: outcomes.len() - successful,
            outcomes,
        }
    }
}

/// Operational health snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemStatus {
    pub breakers: BTreeMap<String, BreakerStatus>,
    /// False when any breaker is open
    pub operational: bool,
}

impl SystemStatus {
    pub fn from_breakers(breakers: BTreeMap<String, BreakerStatus>) -> Self {
        let operational = breakers.values().all(|b| b.state != CircuitState::Open);
        Self {
            breakers,
            operational,
        }
    }

    pub fn label(&self) -> &'static str {
        if self.operational {
            "operational"
        } else {
            "degraded"
        }
    }
}
