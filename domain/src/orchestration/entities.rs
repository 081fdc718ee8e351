//! Orchestration domain entities

use super::value_objects::{ExecutionPlan, PlanOutcome, PlanRequest, StepResults};
use crate::agent::FailureKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Planning,
    Executing,
    Succeeded,
    Failed,
}

impl RunPhase {
    pub fn as_str(&self) -> &str {
        match self {
            RunPhase::Planning => "planning",
            RunPhase::Executing => "executing",
            RunPhase::Succeeded => "succeeded",
            RunPhase::Failed => "failed",
        }
    }
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-invocation state of one run (Entity)
///
/// Owned exclusively by the run that created it and consumed into a
/// [`PlanOutcome`] at the end.
#[derive(Debug, Clone)]
pub struct RunContext {
    run_id: String,
    request: PlanRequest,
    plan: ExecutionPlan,
    results: StepResults,
    phase: RunPhase,
}

impl RunContext {
    pub fn new(run_id: impl Into<String>, request: PlanRequest) -> Self {
        Self {
            run_id: run_id.into(),
            request,
            plan: ExecutionPlan::default(),
            results: StepResults::new(),
            phase: RunPhase::Planning,
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn request(&self) -> &PlanRequest {
        &self.request
    }

    pub fn plan(&self) -> &ExecutionPlan {
        &self.plan
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn results(&self) -> &StepResults {
        &self.results
    }

    /// Planning -> Executing
    pub fn begin(&mut self, plan: ExecutionPlan) {
        self.plan = plan;
        self.phase = RunPhase::Executing;
    }

    /// Record a successful step's data
    pub fn record(&mut self, step: &str, data: Value) {
        self.results.insert(step, data);
    }

    /// Executing -> Succeeded
    pub fn succeed(self) -> PlanOutcome {
        PlanOutcome {
            run_id: self.run_id,
            success: true,
            plan: self.plan,
            results: self.results,
            error: None,
            failed_step: None,
            failure: None,
        }
    }

    /// Executing -> Failed, keeping the partial results
    pub fn fail(self, step: Option<&str>, kind: FailureKind, error: impl Into<String>) -> PlanOutcome {
        PlanOutcome {
            run_id: self.run_id,
            success: false,
            plan: self.plan,
            results: self.results,
            error: Some(error.into()),
            failed_step: step.map(str::to_string),
            failure: Some(kind),
        }
    }
}
