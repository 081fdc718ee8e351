//! Keyword planning.
//!
//! Each rule maps a set of trigger words to one step. Rules are evaluated
//! in declaration order over the lower-cased query, so the resulting plan
//! order is fixed regardless of where the words appear in the query.

use super::value_objects::{ExecutionPlan, PlanRequest};

pub const STEP_FRAUD: &str = "fraud";
pub const STEP_INSIGHTS: &str = "insights";
pub const STEP_COMPLIANCE: &str = "compliance";
pub const STEP_KB: &str = "kb";
pub const STEP_SUMMARY: &str = "summary";

/// Trigger words for one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRule {
    pub step: String,
    pub keywords: Vec<String>,
}

impl PlanRule {
    pub fn new(step: &str, keywords: &[&str]) -> Self {
        Self {
            step: step.to_string(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    fn matches(&self, query: &str) -> bool {
        self.keywords.iter().any(|k| query.contains(k.as_str()))
    }
}

/// Deterministic request -> plan mapping
#[derive(Debug, Clone)]
pub struct Planner {
    rules: Vec<PlanRule>,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(vec![
            PlanRule::new(STEP_FRAUD, &["fraud", "charge"]),
            PlanRule::new(STEP_INSIGHTS, &["insight", "spend"]),
            PlanRule::new(STEP_COMPLIANCE, &["compliance", "kyc"]),
            PlanRule::new(STEP_KB, &["how", "what"]),
            PlanRule::new(STEP_SUMMARY, &["summar", "note"]),
        ])
    }
}

impl Planner {
    pub fn new(rules: Vec<PlanRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[PlanRule] {
        &self.rules
    }

    /// Plan for a free-text query
    pub fn plan_query(&self, query: &str) -> ExecutionPlan {
        let query = query.to_lowercase();
        ExecutionPlan::new(
            self.rules
                .iter()
                .filter(|r| r.matches(&query))
                .map(|r| r.step.clone()),
        )
    }

    /// Plan for a request; an explicit plan on the request wins
    pub fn plan(&self, request: &PlanRequest) -> ExecutionPlan {
        match &request.plan {
            Some(steps) => ExecutionPlan::new(steps.iter().cloned()),
            None => self.plan_query(&request.query),
        }
    }
}
