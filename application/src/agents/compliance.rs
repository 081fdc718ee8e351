//! Compliance agent: validates the fraud step's proposed action.

use super::{Agent, StepInput, arg_opt, arg_str, to_value};
use crate::ports::customer_directory::OtpQuota;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;
use triage_domain::{
    ActionKind, ActionProposal, CallError, STEP_COMPLIANCE, STEP_FRAUD, SanitizedInputs,
    fraud::review,
};

pub struct ComplianceAgent {
    quota: Arc<dyn OtpQuota>,
}

impl ComplianceAgent {
    pub fn new(quota: Arc<dyn OtpQuota>) -> Self {
        Self { quota }
    }
}

#[async_trait]
impl Agent for ComplianceAgent {
    fn name(&self) -> &str {
        STEP_COMPLIANCE
    }

    fn arguments(&self, input: &StepInput<'_>) -> Vec<Value> {
        let proposal = input
            .results
            .get(STEP_FRAUD)
            .and_then(|v| v.get("proposal"))
            .cloned()
            .unwrap_or(Value::Null);
        vec![json!(input.request.customer_id), proposal]
    }

    async fn call(&self, args: &SanitizedInputs) -> Result<Value, CallError> {
        let customer_id = arg_str(args, 0, "customer")?;
        let proposal = arg_opt::<ActionProposal>(args, 1, "proposal")?;

        let otp_available = match &proposal {
            Some(p) if p.action == ActionKind::RequestOtp => {
                let owner = p.customer_id.as_deref().unwrap_or(customer_id);
                self.quota.try_acquire(owner).await?
            }
            _ => true,
        };

        let verdict = review(proposal.as_ref(), otp_available);
        if !verdict.compliant {
            info!(
                "Compliance adjusted action to {}: {}",
                verdict.action.action, verdict.action.message
            );
        }
        to_value(&verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::customer_directory::{DirectoryError, UnlimitedOtpQuota};
    use std::sync::atomic::{AtomicU32, Ordering};
    use triage_domain::{Decision, GuardrailFilter, PlanRequest, StepResults};

    struct CountingQuota {
        limit: u32,
        used: AtomicU32,
    }

    #[async_trait]
    impl OtpQuota for CountingQuota {
        async fn try_acquire(&self, _customer_id: &str) -> Result<bool, DirectoryError> {
            Ok(self.used.fetch_add(1, Ordering::SeqCst) < self.limit)
        }
    }

    async fn call(agent: &ComplianceAgent, results: &StepResults) -> Value {
        let request = PlanRequest::new("compliance", "cust_1");
        let input = StepInput { request: &request, results };
        let args = GuardrailFilter::standard().check(agent.arguments(&input)).unwrap();
        agent.call(&args).await.unwrap()
    }

    fn fraud_result(decision: Decision) -> StepResults {
        let mut results = StepResults::new();
        results.insert(
            STEP_FRAUD,
            json!({ "proposal": ActionProposal::for_decision(decision, None) }),
        );
        results
    }

    #[tokio::test]
    async fn test_no_fraud_step_fails_closed() {
        let agent = ComplianceAgent::new(Arc::new(UnlimitedOtpQuota));
        let out = call(&agent, &StepResults::new()).await;
        assert_eq!(out["compliant"], false);
        assert_eq!(out["action"]["action"], "block_transaction");
    }

    #[tokio::test]
    async fn test_block_with_reason_passes() {
        let agent = ComplianceAgent::new(Arc::new(UnlimitedOtpQuota));
        let out = call(&agent, &fraud_result(Decision::Block)).await;
        assert_eq!(out["compliant"], true);
        assert_eq!(out["action"]["action"], "block_transaction");
    }

    #[tokio::test]
    async fn test_otp_limit() {
        let agent = ComplianceAgent::new(Arc::new(CountingQuota {
            limit: 1,
            used: AtomicU32::new(0),
        }));
        let results = fraud_result(Decision::Verify);

        let first = call(&agent, &results).await;
        assert_eq!(first["action"]["action"], "request_otp");

        let second = call(&agent, &results).await;
        assert_eq!(second["action"]["action"], "flag_for_review");
        assert_eq!(second["adjusted_from"], "request_otp");
    }
}
