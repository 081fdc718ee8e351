//! Case notes written from a fraud assessment.
//!
//! Two audiences: the customer gets one templated sentence picked by risk
//! band, analysts get the score, the triggered reasons and every signal.

use super::knowledge::RiskBand;
use super::models::FraudAssessment;
use serde::Serialize;
use std::collections::BTreeMap;

/// Customer message and analyst notes for one case
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseSummary {
    pub customer_message: String,
    pub risk_level: RiskBand,
    pub internal_notes: String,
    /// True when any risk reason fired
    pub action_required: bool,
}

impl CaseSummary {
    /// Notes for `customer_id`; with no assessment the case reads as unscored
    /// (score 0, no reasons, no signals).
    pub fn new(customer_id: &str, assessment: Option<&FraudAssessment>) -> Self {
        let (score, reasons, signals) = match assessment {
            Some(a) => (a.risk_score, a.reasons.as_slice(), a.signals.as_map()),
            None => (0.0, &[][..], BTreeMap::new()),
        };

        let risk_level = notes_band(score);
        Self {
            customer_message: customer_message(risk_level).to_string(),
            risk_level,
            internal_notes: internal_notes(customer_id, score, reasons, &signals),
            action_required: !reasons.is_empty(),
        }
    }
}

/// Bands for customer messaging sit higher than the rule-lookup ones
fn notes_band(score: f64) -> RiskBand {
    if score > 0.7 {
        RiskBand::High
    } else if score > 0.4 {
        RiskBand::Medium
    } else {
        RiskBand::Low
    }
}

fn customer_message(band: RiskBand) -> &'static str {
    match band {
        RiskBand::High => {
            "Your transaction was flagged for review due to suspicious activity patterns. Our team will contact you shortly."
        }
        RiskBand::Medium => {
            "For your security, we need additional verification. Please check your registered mobile for OTP."
        }
        RiskBand::Low => "Transaction processed successfully. Thank you for your business.",
    }
}

fn internal_notes(
    customer_id: &str,
    score: f64,
    reasons: &[String],
    signals: &BTreeMap<String, f64>,
) -> String {
    let mut lines = vec![
        format!("Customer: {}", customer_id),
        format!("Risk Score: {:.2}", score),
        "Risk Factors:".to_string(),
    ];
    lines.extend(reasons.iter().map(|r| format!("  - {}", r)));
    lines.push("Signal Scores:".to_string());
    lines.extend(
        signals
            .iter()
            .map(|(name, value)| format!("  - {}: {:.2}", name, value)),
    );
    lines.join("\n")
}
