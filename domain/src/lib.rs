//! Domain layer for triage
//!
//! This crate contains the core rules, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns and
//! no async runtime.
//!
//! # Core Concepts
//!
//! ## Resilience
//!
//! - **Guardrail**: sanitizes call arguments and rejects instruction-override attempts
//! - **Circuit breaker**: per-agent Closed / Open / Half-Open admission gate
//! - **Retry policy**: bounded attempts with jittered exponential backoff,
//!   eligibility decided by [`CallError`]
//!
//! ## Orchestration
//!
//! A [`PlanRequest`] is turned into an [`ExecutionPlan`] by the [`Planner`];
//! each step's [`AgentResponse`] lands in a [`RunContext`], which ends as a
//! [`PlanOutcome`].

pub mod agent;
pub mod breaker;
pub mod config;
pub mod core;
pub mod fraud;
pub mod guardrail;
pub mod orchestration;
pub mod redact;
pub mod retry;

// Re-export commonly used types
pub use agent::{AgentResponse, FailureKind};
pub use breaker::{
    Admission, BreakerPolicy, BreakerRegistry, BreakerStatus, CircuitBreaker, CircuitState,
    StateTransition,
};
pub use config::OutputFormat;
pub use core::{
    error::DomainError,
    validation::{ConfigIssue, ConfigIssueCode, Severity},
};
pub use fraud::{
    ActionKind, ActionProposal, CaseSummary, ComplianceVerdict, CustomerProfile, Decision, FraudAssessment,
    HeuristicRiskModel, KbLookup, KbQuery, KbRule, KnowledgeBase, RiskDecision, RiskModel,
    RiskSignals, SpendCategory, SpendSummary, Transaction,
};
pub use guardrail::{GuardrailError, GuardrailFilter, GuardrailPolicy, SanitizedInputs};
pub use orchestration::{
    BatchReport, ExecutionPlan, PlanOutcome, PlanRequest, PlanRule, Planner, RunContext, RunPhase,
    STEP_COMPLIANCE, STEP_FRAUD, STEP_INSIGHTS, STEP_KB, STEP_SUMMARY, StepResults, SystemStatus,
};
pub use redact::Redactor;
pub use retry::{CallError, RetryPolicy, TransientError};
