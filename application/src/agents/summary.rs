//! Case summary agent: customer message and analyst notes.

use super::{Agent, StepInput, arg_opt, arg_str, to_value};
use async_trait::async_trait;
use serde_json::{Value, json};
use triage_domain::{
    CallError, CaseSummary, FraudAssessment, STEP_FRAUD, STEP_SUMMARY, SanitizedInputs,
};

/// Summarizes the fraud step's assessment when one was recorded earlier in
/// the run; otherwise the case is summarized as unscored.
#[derive(Debug, Default)]
pub struct SummaryAgent;

impl SummaryAgent {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Agent for SummaryAgent {
    fn name(&self) -> &str {
        STEP_SUMMARY
    }

    fn arguments(&self, input: &StepInput<'_>) -> Vec<Value> {
        let assessment = input
            .results
            .get(STEP_FRAUD)
            .and_then(|fraud| fraud.get("assessment"))
            .cloned()
            .unwrap_or(Value::Null);
        vec![json!(input.request.customer_id), assessment]
    }

    async fn call(&self, args: &SanitizedInputs) -> Result<Value, CallError> {
        let customer_id = arg_str(args, 0, "customer")?;
        let assessment = arg_opt::<FraudAssessment>(args, 1, "assessment")?;
        to_value(&CaseSummary::new(customer_id, assessment.as_ref()))
    }
}
