//! Orchestration domain
//!
//! A run moves `Planning -> Executing -> {Succeeded, Failed}`. The planner
//! turns a [`PlanRequest`] into an [`ExecutionPlan`]; a [`RunContext`]
//! collects step results and is consumed into a [`PlanOutcome`].

pub mod entities;
pub mod planner;
pub mod value_objects;

pub use entities::{RunContext, RunPhase};
pub use planner::{
    PlanRule, Planner, STEP_COMPLIANCE, STEP_FRAUD, STEP_INSIGHTS, STEP_KB, STEP_SUMMARY,
};
pub use value_objects::{
    BatchReport, ExecutionPlan, PlanOutcome, PlanRequest, StepResults, SystemStatus,
};
