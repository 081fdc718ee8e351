//! Agents: pluggable units of work the orchestrator runs as plan steps.
//!
//! An agent declares the arguments it needs from the request and earlier
//! step results; those arguments are sanitized and screened before
//! [`Agent::call`] sees them, so `call` only ever works from
//! [`SanitizedInputs`].

pub mod compliance;
pub mod fraud;
pub mod insights;
pub mod kb;
pub mod summary;

pub use compliance::ComplianceAgent;
pub use fraud::FraudAgent;
pub use insights::InsightsAgent;
pub use kb::KbAgent;
pub use summary::SummaryAgent;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use triage_domain::{CallError, PlanRequest, SanitizedInputs, StepResults};

/// What a step can see when building its arguments
#[derive(Debug, Clone, Copy)]
pub struct StepInput<'a> {
    pub request: &'a PlanRequest,
    /// Results of the steps that already ran in this run
    pub results: &'a StepResults,
}

#[async_trait]
pub trait Agent: Send + Sync {
    /// Step identifier this agent is bound to
    fn name(&self) -> &str;

    /// Arguments passed through the guardrail to [`Agent::call`]
    fn arguments(&self, input: &StepInput<'_>) -> Vec<Value>;

    async fn call(&self, args: &SanitizedInputs) -> Result<Value, CallError>;
}

// ==================== Argument helpers ====================

/// Required string argument at `index`
pub(crate) fn arg_str<'a>(args: &'a SanitizedInputs, index: usize, what: &str) -> Result<&'a str, CallError> {
    args.get(index)
        .and_then(Value::as_str)
        .ok_or_else(|| CallError::fatal(format!("missing {} argument", what)))
}

/// Optional typed argument at `index`; `null` or absent yields `None`
pub(crate) fn arg_opt<T: DeserializeOwned>(
    args: &SanitizedInputs,
    index: usize,
    what: &str,
) -> Result<Option<T>, CallError> {
    match args.get(index) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => serde_json::from_value(v.clone())
            .map(Some)
            .map_err(|e| CallError::fatal(format!("invalid {} argument: {}", what, e))),
    }
}

pub(crate) fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, CallError> {
    serde_json::to_value(value).map_err(|e| CallError::fatal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use triage_domain::GuardrailFilter;

    #[test]
    fn test_arg_helpers() {
        let args = GuardrailFilter::standard()
            .check(vec![json!("cust_1"), Value::Null, json!({"n": 1})])
            .unwrap();

        assert_eq!(arg_str(&args, 0, "customer").unwrap(), "cust_1");
        assert!(arg_str(&args, 1, "customer").is_err());
        assert_eq!(arg_opt::<Value>(&args, 1, "x").unwrap(), None);
        assert_eq!(arg_opt::<Value>(&args, 5, "x").unwrap(), None);
        assert!(arg_opt::<String>(&args, 2, "x").is_err());
    }
}
