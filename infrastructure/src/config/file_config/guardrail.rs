//! Guardrail configuration from TOML (`[guardrail]` section)

use super::out_of_range;
use regex::Regex;
use serde::{Deserialize, Serialize};
use triage_domain::{ConfigIssue, ConfigIssueCode, GuardrailPolicy};

/// Raw guardrail configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGuardrailConfig {
    /// Character cap applied to every string argument
    pub max_input_length: usize,
    /// Extra case-insensitive injection signatures (regular expressions)
    pub extra_patterns: Vec<String>,
}

impl Default for FileGuardrailConfig {
    fn default() -> Self {
        let policy = GuardrailPolicy::default();
        Self {
            max_input_length: policy.max_input_length,
            extra_patterns: policy.extra_patterns,
        }
    }
}

impl FileGuardrailConfig {
    /// Convert to a [`GuardrailPolicy`]. A pattern that does not compile
    /// is an `Error` issue.
    pub fn to_policy(&self) -> (GuardrailPolicy, Vec<ConfigIssue>) {
        let defaults = GuardrailPolicy::default();
        let mut issues = Vec::new();

        let max_input_length = if self.max_input_length == 0 {
            issues.push(out_of_range(
                "guardrail.max_input_length",
                self.max_input_length,
                defaults.max_input_length,
            ));
            defaults.max_input_length
        } else {
            self.max_input_length
        };

        for pattern in &self.extra_patterns {
            if let Err(e) = Regex::new(pattern) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::InvalidPattern {
                        field: "guardrail.extra_patterns".to_string(),
                        pattern: pattern.clone(),
                    },
                    format!("guardrail.extra_patterns: '{}' is not a valid pattern: {}", pattern, e),
                ));
            }
        }

        let policy = GuardrailPolicy {
            max_input_length,
            extra_patterns: self.extra_patterns.clone(),
        };
        (policy, issues)
    }
}
