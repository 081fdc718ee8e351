//! Fraud triage entities exchanged between agents.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A card transaction under assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(alias = "customer_id")]
    pub customer_id: String,
    pub amount: f64,
    #[serde(default)]
    pub merchant: String,
    #[serde(default)]
    pub mcc: String,
    #[serde(default, alias = "device_id", skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Customer profile as provided by the customer directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub customer_id: String,
    pub risk_level: String,
    pub total_transactions: u32,
    pub chargeback_count: u32,
    pub devices: Vec<String>,
    pub avg_transaction_amount: f64,
}

/// Individual risk signals, each in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskSignals {
    pub velocity_risk: f64,
    pub device_risk: f64,
    pub mcc_risk: f64,
    pub chargeback_risk: f64,
}

impl RiskSignals {
    /// Composite score: unweighted mean of the four signals
    pub fn composite(&self) -> f64 {
        (self.velocity_risk + self.device_risk + self.mcc_risk + self.chargeback_risk) / 4.0
    }

    /// Human-readable reasons for every signal above its alert level
    pub fn reasons(&self) -> Vec<String> {
        let mut reasons = Vec::new();
        if self.velocity_risk > 0.7 {
            reasons.push("High transaction velocity detected".to_string());
        }
        if self.device_risk > 0.6 {
            reasons.push("Suspicious device change".to_string());
        }
        if self.mcc_risk > 0.5 {
            reasons.push("Unusual merchant category".to_string());
        }
        if self.chargeback_risk > 0.8 {
            reasons.push("Previous chargeback history".to_string());
        }
        reasons
    }

    pub fn as_map(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("velocity_risk".to_string(), self.velocity_risk),
            ("device_risk".to_string(), self.device_risk),
            ("mcc_risk".to_string(), self.mcc_risk),
            ("chargeback_risk".to_string(), self.chargeback_risk),
        ])
    }
}

/// Scored assessment of one transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudAssessment {
    pub risk_score: f64,
    pub reasons: Vec<String>,
    pub signals: RiskSignals,
}

impl FraudAssessment {
    pub fn from_signals(signals: RiskSignals) -> Self {
        Self {
            risk_score: signals.composite(),
            reasons: signals.reasons(),
            signals,
        }
    }
}

/// Decision band derived from the risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    Verify,
    Review,
    Block,
}

impl Decision {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            Decision::Block
        } else if score >= 0.6 {
            Decision::Review
        } else if score >= 0.4 {
            Decision::Verify
        } else {
            Decision::Approve
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskDecision {
    pub decision: Decision,
    pub confidence: f64,
    pub rules_applied: Vec<String>,
}

/// Concrete action proposed to an operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Approve,
    RequestOtp,
    FlagForReview,
    BlockTransaction,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Approve => "approve",
            ActionKind::RequestOtp => "request_otp",
            ActionKind::FlagForReview => "flag_for_review",
            ActionKind::BlockTransaction => "block_transaction",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Decision> for ActionKind {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Block => ActionKind::BlockTransaction,
            Decision::Review => ActionKind::FlagForReview,
            Decision::Verify => ActionKind::RequestOtp,
            Decision::Approve => ActionKind::Approve,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionProposal {
    pub action: ActionKind,
    /// Justification shown to the operator
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
}

impl ActionProposal {
    /// Standard proposal for a decision
    pub fn for_decision(decision: Decision, transaction: Option<&Transaction>) -> Self {
        let message = match decision {
            Decision::Block => "Transaction blocked due to high fraud risk",
            Decision::Review => "Transaction requires manual review",
            Decision::Verify => "OTP verification required",
            Decision::Approve => "Transaction approved",
        };
        Self {
            action: decision.into(),
            message: message.to_string(),
            transaction_id: transaction.map(|t| t.id.clone()),
            customer_id: transaction.map(|t| t.customer_id.clone()),
        }
    }
}
