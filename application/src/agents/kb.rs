//! Knowledge-base lookup agent.

use super::{Agent, StepInput, arg_opt, to_value};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use triage_domain::{
    CallError, KbQuery, KnowledgeBase, STEP_FRAUD, STEP_KB, SanitizedInputs, Transaction,
};

/// Looks up rules relevant to the query, the transaction and, when the
/// fraud step already ran, its risk score.
pub struct KbAgent {
    kb: Arc<KnowledgeBase>,
}

impl KbAgent {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }
}

/// Risk score recorded by the fraud step, 0 when absent
fn prior_risk(input: &StepInput<'_>) -> f64 {
    input
        .results
        .get(STEP_FRAUD)
        .and_then(|v| v.pointer("/assessment/risk_score"))
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
}

#[async_trait]
impl Agent for KbAgent {
    fn name(&self) -> &str {
        STEP_KB
    }

    fn arguments(&self, input: &StepInput<'_>) -> Vec<Value> {
        vec![
            json!(input.request.query),
            json!(input.request.transaction),
            json!(prior_risk(input)),
        ]
    }

    async fn call(&self, args: &SanitizedInputs) -> Result<Value, CallError> {
        let text = args.get(0).and_then(Value::as_str).unwrap_or_default();
        let transaction = arg_opt::<Transaction>(args, 1, "transaction")?;
        let risk_score = args.get(2).and_then(Value::as_f64).unwrap_or(0.0);

        let lookup = self.kb.lookup(&KbQuery {
            text,
            transaction: transaction.as_ref(),
            risk_score,
        });
        to_value(&lookup)
    }
}
