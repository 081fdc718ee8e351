//! Static rule corpus and keyword lookup.

use super::models::Transaction;
use super::risk::HIGH_RISK_MCCS;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Maximum number of rules returned by a lookup
pub const MAX_RULES: usize = 5;

/// One knowledge-base entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KbRule {
    pub title: String,
    pub anchor: String,
    #[serde(default)]
    pub chunks: Vec<String>,
}

impl KbRule {
    fn matches_any(&self, keywords: &[&str]) -> bool {
        let title = self.title.to_lowercase();
        let content = self.chunks.join(" ").to_lowercase();
        keywords.iter().any(|k| {
            let k = k.to_lowercase();
            title.contains(&k) || content.contains(&k)
        })
    }

    fn matches_text(&self, words: &[String]) -> bool {
        let haystack = format!(
            "{} {} {}",
            self.title.to_lowercase(),
            self.anchor.to_lowercase(),
            self.chunks.join(" ").to_lowercase()
        );
        words.iter().any(|w| haystack.contains(w.as_str()))
    }
}

/// Risk band used to pick a fallback template or a customer message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    pub fn from_score(score: f64) -> Self {
        if score > 0.6 {
            RiskBand::High
        } else if score > 0.3 {
            RiskBand::Medium
        } else {
            RiskBand::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskBand::Low => "low",
            RiskBand::Medium => "medium",
            RiskBand::High => "high",
        }
    }

    pub fn fallback(&self) -> KbRule {
        let (title, anchor, chunks): (&str, &str, [&str; 2]) = match self {
            RiskBand::High => (
                "High Risk Transaction Protocol",
                "fallback_high_risk",
                ["Review transaction manually", "Request additional verification"],
            ),
            RiskBand::Medium => (
                "Standard Verification Protocol",
                "fallback_medium_risk",
                ["Proceed with OTP verification", "Monitor for similar patterns"],
            ),
            RiskBand::Low => (
                "Low Risk Approval Protocol",
                "fallback_low_risk",
                ["Approve transaction", "Continue normal monitoring"],
            ),
        };
        KbRule {
            title: title.to_string(),
            anchor: anchor.to_string(),
            chunks: chunks.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// What a lookup is keyed on
#[derive(Debug, Clone, Default)]
pub struct KbQuery<'a> {
    pub text: &'a str,
    pub transaction: Option<&'a Transaction>,
    pub risk_score: f64,
}

/// Result of a lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KbLookup {
    pub rules: Vec<KbRule>,
    /// True when nothing matched and a template was substituted
    pub fallback: bool,
}

/// In-memory rule corpus
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    rules: Vec<KbRule>,
}

impl KnowledgeBase {
    pub fn new(rules: Vec<KbRule>) -> Self {
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> &[KbRule] {
        &self.rules
    }

    fn by_keywords<'a>(&'a self, keywords: &'a [&'a str]) -> impl Iterator<Item = &'a KbRule> {
        self.rules.iter().filter(move |r| r.matches_any(keywords))
    }

    /// Rules relevant to a transaction and query, deduplicated by title
    pub fn lookup(&self, query: &KbQuery<'_>) -> KbLookup {
        let mut matched: Vec<&KbRule> = Vec::new();

        if let Some(txn) = query.transaction {
            if txn.amount.abs() > 5000.0 && query.risk_score > 0.3 {
                matched.extend(self.by_keywords(&["amount", "large"]));
            }
            if HIGH_RISK_MCCS.contains(&txn.mcc.as_str()) {
                matched.extend(self.by_keywords(&["ATM", "withdrawal"]));
            }
        }
        if query.risk_score > 0.6 {
            matched.extend(self.by_keywords(&["device", "suspicious"]));
        }

        let words: Vec<String> = query
            .text
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
            .filter(|w| w.len() > 3)
            .collect();
        if !words.is_empty() {
            matched.extend(self.rules.iter().filter(|r| r.matches_text(&words)));
        }

        let mut seen = HashSet::new();
        let rules: Vec<KbRule> = matched
            .into_iter()
            .filter(|r| seen.insert(r.title.as_str()))
            .take(MAX_RULES)
            .cloned()
            .collect();

        if rules.is_empty() {
            KbLookup {
                rules: vec![RiskBand::from_score(query.risk_score).fallback()],
                fallback: true,
            }
        } else {
            KbLookup {
                rules,
                fallback: false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(title: &str, chunk: &str) -> KbRule {
        KbRule {
            title: title.to_string(),
            anchor: title.to_lowercase().replace(' ', "_"),
            chunks: vec![chunk.to_string()],
        }
    }

    fn corpus() -> KnowledgeBase {
        KnowledgeBase::new(vec![
            rule("Large Amount Review", "Transactions with a large amount need review"),
            rule("ATM Withdrawal Limits", "Cash withdrawal above limit"),
            rule("Suspicious Device Policy", "New device logins are suspicious"),
            rule("Dispute Handling", "Chargeback disputes are resolved in 45 days"),
        ])
    }

    fn txn(amount: f64, mcc: &str) -> Transaction {
        Transaction {
            id: "t".to_string(),
            customer_id: "c".to_string(),
            amount,
            merchant: String::new(),
            mcc: mcc.to_string(),
            device_id: None,
            timestamp: None,
        }
    }

    #[test]
    fn test_large_amount_requires_some_risk() {
        let kb = corpus();
        let t = txn(-7500.0, "5411");
        let low = kb.lookup(&KbQuery {
            transaction: Some(&t),
            risk_score: 0.2,
            ..Default::default()
        });
        assert!(low.fallback);

        let medium = kb.lookup(&KbQuery {
            transaction: Some(&t),
            risk_score: 0.4,
            ..Default::default()
        });
        assert!(!medium.fallback);
        assert_eq!(medium.rules[0].title, "Large Amount Review");
    }

    #[test]
    fn test_atm_and_high_risk_deduplicated() {
        let kb = corpus();
        let t = txn(9000.0, "6011");
        let found = kb.lookup(&KbQuery {
            transaction: Some(&t),
            risk_score: 0.9,
            ..Default::default()
        });
        let titles: Vec<_> = found.rules.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Large Amount Review", "ATM Withdrawal Limits", "Suspicious Device Policy"]
        );
    }

    #[test]
    fn test_free_text_match() {
        let kb = corpus();
        let found = kb.lookup(&KbQuery {
            text: "how do chargeback disputes work?",
            ..Default::default()
        });
        assert_eq!(found.rules.len(), 1);
        assert_eq!(found.rules[0].title, "Dispute Handling");
    }

    #[test]
    fn test_fallback_by_band() {
        let kb = KnowledgeBase::default();
        let high = kb.lookup(&KbQuery {
            risk_score: 0.7,
            ..Default::default()
        });
        assert!(high.fallback);
        assert_eq!(high.rules[0].anchor, "fallback_high_risk");
        assert_eq!(RiskBand::from_score(0.31), RiskBand::Medium);
        assert_eq!(RiskBand::from_score(0.3), RiskBand::Low);
    }

    #[test]
    fn test_result_capped() {
        let rules = (0..10)
            .map(|i| rule(&format!("Suspicious pattern {}", i), "x"))
            .collect();
        let kb = KnowledgeBase::new(rules);
        let found = kb.lookup(&KbQuery {
            risk_score: 0.9,
            ..Default::default()
        });
        assert_eq!(found.rules.len(), MAX_RULES);
    }
}
