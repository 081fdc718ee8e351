//! Fraud triage rules.
//!
//! Pure decision logic the agents wrap: risk scoring, the rule corpus,
//! compliance review, spend insights and case notes.

pub mod compliance;
pub mod insights;
pub mod knowledge;
pub mod models;
pub mod risk;
pub mod summary;

pub use compliance::{ComplianceVerdict, is_block_justified, review};
pub use insights::{SpendCategory, SpendSummary, categorize, summarize};
pub use knowledge::{KbLookup, KbQuery, KbRule, KnowledgeBase, RiskBand};
pub use models::{
    ActionKind, ActionProposal, CustomerProfile, Decision, FraudAssessment, RiskDecision,
    RiskSignals, Transaction,
};
pub use risk::{HeuristicRiskModel, RiskModel};
pub use summary::CaseSummary;
