//! Risk scoring.
//!
//! [`RiskModel`] is the pluggable seam: the fraud agent only needs four
//! signals in `[0, 1]`. [`HeuristicRiskModel`] is the built-in model working
//! from the customer profile and the last day of activity.

use super::models::{CustomerProfile, FraudAssessment, RiskSignals, Transaction};

/// Merchant category codes treated as inherently risky (ATM, money transfer)
pub const HIGH_RISK_MCCS: &[&str] = &["6011", "4829"];

/// Computes risk signals for one transaction
pub trait RiskModel: Send + Sync {
    fn signals(
        &self,
        transaction: &Transaction,
        profile: Option<&CustomerProfile>,
        recent: &[Transaction],
    ) -> RiskSignals;

    fn assess(
        &self,
        transaction: &Transaction,
        profile: Option<&CustomerProfile>,
        recent: &[Transaction],
    ) -> FraudAssessment {
        FraudAssessment::from_signals(self.signals(transaction, profile, recent))
    }
}

/// Rule-of-thumb scoring
#[derive(Debug, Clone, Copy)]
pub struct HeuristicRiskModel {
    /// Transactions per day considered fully suspicious
    pub velocity_ceiling: usize,
    /// Chargebacks considered fully suspicious
    pub chargeback_ceiling: u32,
}

impl Default for HeuristicRiskModel {
    fn default() -> Self {
        Self {
            velocity_ceiling: 10,
            chargeback_ceiling: 3,
        }
    }
}

impl HeuristicRiskModel {
    fn velocity(&self, recent: &[Transaction]) -> f64 {
        ratio(recent.len() as f64, self.velocity_ceiling as f64)
    }

    fn device(&self, transaction: &Transaction, profile: Option<&CustomerProfile>) -> f64 {
        match (&transaction.device_id, profile) {
            (None, _) | (_, None) => 0.2,
            (Some(device), Some(profile)) if profile.devices.contains(device) => 0.1,
            (Some(_), Some(_)) => 0.8,
        }
    }

    fn mcc_rarity(&self, transaction: &Transaction, recent: &[Transaction]) -> f64 {
        let seen = recent
            .iter()
            .any(|t| !t.mcc.is_empty() && t.mcc == transaction.mcc);
        let risky = HIGH_RISK_MCCS.contains(&transaction.mcc.as_str());
        match (seen, risky) {
            (true, false) => 0.1,
            (true, true) => 0.4,
            (false, false) => 0.4,
            (false, true) => 0.7,
        }
    }

    fn chargeback(&self, profile: Option<&CustomerProfile>) -> f64 {
        profile.map_or(0.1, |p| {
            ratio(p.chargeback_count as f64, self.chargeback_ceiling as f64)
        })
    }
}

impl RiskModel for HeuristicRiskModel {
    fn signals(
        &self,
        transaction: &Transaction,
        profile: Option<&CustomerProfile>,
        recent: &[Transaction],
    ) -> RiskSignals {
        RiskSignals {
            velocity_risk: self.velocity(recent),
            device_risk: self.device(transaction, profile),
            mcc_risk: self.mcc_rarity(transaction, recent),
            chargeback_risk: self.chargeback(profile),
        }
    }
}

fn ratio(value: f64, ceiling: f64) -> f64 {
    if ceiling <= 0.0 {
        return 1.0;
    }
    (value / ceiling).clamp(0.0, 1.0)
}
