//! Risk assessment agent.

use super::{Agent, StepInput, arg_opt, arg_str, to_value};
use crate::ports::customer_directory::CustomerDirectory;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use triage_domain::{
    ActionProposal, CallError, Decision, RiskDecision, RiskModel, SanitizedInputs, STEP_FRAUD,
    Transaction,
};

/// Scores the request's transaction and proposes an action.
///
/// Output: `{ assessment, decision, proposal }`.
pub struct FraudAgent {
    directory: Arc<dyn CustomerDirectory>,
    model: Arc<dyn RiskModel>,
    window: Duration,
}

impl FraudAgent {
    pub fn new(
        directory: Arc<dyn CustomerDirectory>,
        model: Arc<dyn RiskModel>,
        window: Duration,
    ) -> Self {
        Self {
            directory,
            model,
            window,
        }
    }
}

#[async_trait]
impl Agent for FraudAgent {
    fn name(&self) -> &str {
        STEP_FRAUD
    }

    fn arguments(&self, input: &StepInput<'_>) -> Vec<Value> {
        vec![
            json!(input.request.customer_id),
            json!(input.request.transaction),
        ]
    }

    async fn call(&self, args: &SanitizedInputs) -> Result<Value, CallError> {
        let customer_id = arg_str(args, 0, "customer")?;
        let Some(transaction) = arg_opt::<Transaction>(args, 1, "transaction")? else {
            return Err(CallError::policy("fraud assessment requires a transaction"));
        };

        let (profile, recent) = tokio::try_join!(
            self.directory.profile(customer_id),
            self.directory.recent_transactions(customer_id, self.window),
        )?;
        let recent: Vec<Transaction> = recent
            .into_iter()
            .filter(|t| t.id != transaction.id)
            .collect();

        let assessment = self.model.assess(&transaction, profile.as_ref(), &recent);
        let decision = RiskDecision {
            decision: Decision::from_score(assessment.risk_score),
            confidence: assessment.risk_score,
            rules_applied: Vec::new(),
        };
        let proposal = ActionProposal::for_decision(decision.decision, Some(&transaction));
        debug!(
            "Transaction {} scored {:.2} -> {}",
            transaction.id, assessment.risk_score, proposal.action
        );

        Ok(json!({
            "assessment": to_value(&assessment)?,
            "decision": to_value(&decision)?,
            "proposal": to_value(&proposal)?,
        }))
    }
}
