//! Customer insight agent: profile, recent spend and categorisation.

use super::{Agent, StepInput, arg_opt, arg_str, to_value};
use crate::ports::customer_directory::CustomerDirectory;
use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use std::time::Duration;
use triage_domain::fraud::{categorize, summarize};
use triage_domain::{CallError, STEP_INSIGHTS, SanitizedInputs, Transaction};

pub struct InsightsAgent {
    directory: Arc<dyn CustomerDirectory>,
    window: Duration,
}

impl InsightsAgent {
    pub fn new(directory: Arc<dyn CustomerDirectory>, window: Duration) -> Self {
        Self { directory, window }
    }
}

#[async_trait]
impl Agent for InsightsAgent {
    fn name(&self) -> &str {
        STEP_INSIGHTS
    }

    fn arguments(&self, input: &StepInput<'_>) -> Vec<Value> {
        vec![
            json!(input.request.customer_id),
            json!(input.request.transaction),
        ]
    }

    async fn call(&self, args: &SanitizedInputs) -> Result<Value, CallError> {
        let customer_id = arg_str(args, 0, "customer")?;
        let transaction = arg_opt::<Transaction>(args, 1, "transaction")?;

        let (profile, recent) = tokio::try_join!(
            self.directory.profile(customer_id),
            self.directory.recent_transactions(customer_id, self.window),
        )?;

        let mut categories = Map::new();
        for t in &recent {
            let key = categorize(t).as_str().to_string();
            let count = categories.get(&key).and_then(Value::as_u64).unwrap_or(0);
            categories.insert(key, json!(count + 1));
        }

        let category = transaction.as_ref().map(|t| categorize(t).as_str());

        Ok(json!({
            "profile": to_value(&profile)?,
            "summary": to_value(&summarize(&recent))?,
            "categories": categories,
            "transaction_category": category,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::customer_directory::{DirectoryError, EmptyDirectory};
    use triage_domain::{CustomerProfile, GuardrailFilter, PlanRequest, StepResults};

    struct TwoTxnDirectory;

    #[async_trait]
    impl CustomerDirectory for TwoTxnDirectory {
        async fn profile(&self, id: &str) -> Result<Option<CustomerProfile>, DirectoryError> {
            Ok(Some(CustomerProfile {
                customer_id: id.to_string(),
                risk_level: "medium".to_string(),
                total_transactions: 45,
                chargeback_count: 2,
                devices: vec!["dev_45".to_string()],
                avg_transaction_amount: 2500.0,
            }))
        }

        async fn recent_transactions(
            &self,
            id: &str,
            _window: Duration,
        ) -> Result<Vec<Transaction>, DirectoryError> {
            let t = |txn_id: &str, amount: f64, merchant: &str| Transaction {
                id: txn_id.to_string(),
                customer_id: id.to_string(),
                amount,
                merchant: merchant.to_string(),
                mcc: String::new(),
                device_id: None,
                timestamp: None,
            };
            Ok(vec![
                t("txn_00999", -1500.0, "Restaurant"),
                t("txn_00998", -3000.0, "Supermarket"),
            ])
        }
    }

    async fn call(agent: &InsightsAgent, request: &PlanRequest) -> Value {
        let results = StepResults::new();
        let input = StepInput { request, results: &results };
        let args = GuardrailFilter::standard().check(agent.arguments(&input)).unwrap();
        agent.call(&args).await.unwrap()
    }

    #[tokio::test]
    async fn test_summary_and_categories() {
        let agent = InsightsAgent::new(Arc::new(TwoTxnDirectory), Duration::from_secs(86_400));
        let out = call(&agent, &PlanRequest::new("spend insight", "cust_1")).await;

        assert_eq!(out["profile"]["risk_level"], "medium");
        assert_eq!(out["summary"]["count"], 2);
        assert_eq!(out["summary"]["total"], 4500.0);
        assert_eq!(out["categories"]["dining"], 1);
        assert_eq!(out["categories"]["other"], 1);
        assert!(out["transaction_category"].is_null());
    }

    #[tokio::test]
    async fn test_unknown_customer() {
        let agent = InsightsAgent::new(Arc::new(EmptyDirectory), Duration::from_secs(86_400));
        let out = call(&agent, &PlanRequest::new("spend", "nobody")).await;
        assert!(out["profile"].is_null());
        assert_eq!(out["summary"]["count"], 0);
    }
}
