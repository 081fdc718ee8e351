//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to domain policies, with
//! every problem reported as a [`ConfigIssue`].

mod breaker;
mod data;
mod guardrail;
mod logging;
mod orchestrator;
mod output;
mod retry;

pub use breaker::FileBreakerConfig;
pub use data::FileDataConfig;
pub use guardrail::FileGuardrailConfig;
pub use logging::FileLoggingConfig;
pub use orchestrator::FileOrchestratorConfig;
pub use output::FileOutputConfig;
pub use retry::FileRetryConfig;

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use triage_application::OrchestratorConfig;
use triage_domain::{ConfigIssue, ConfigIssueCode};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Circuit breaker settings shared by every agent
    pub breaker: FileBreakerConfig,
    /// Per-call retry settings
    pub retry: FileRetryConfig,
    /// Input screening settings
    pub guardrail: FileGuardrailConfig,
    /// Run and batch limits
    pub orchestrator: FileOrchestratorConfig,
    /// Rule corpus, customer fixtures and OTP quota
    pub data: FileDataConfig,
    /// Event log and tracing file
    pub logging: FileLoggingConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// This is the single entry point for config validation. Warnings mean a
    /// default was substituted; any `Error` makes the configuration unusable.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.breaker.to_policy().1);
        issues.extend(self.retry.to_policy().1);
        issues.extend(self.guardrail.to_policy().1);
        issues.extend(self.orchestrator.plan_deadline().1);
        issues.extend(self.orchestrator.batch_concurrency().1);
        issues.extend(self.orchestrator.max_batch_size().1);
        issues.extend(self.data.otp_window().1);
        issues.extend(self.data.missing_files());

        issues
    }

    /// Build the application config, substituting defaults for bad values
    pub fn to_orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig::default()
            .with_breaker(self.breaker.to_policy().0)
            .with_retry(self.retry.to_policy().0)
            .with_guardrail(self.guardrail.to_policy().0)
            .with_plan_deadline(self.orchestrator.plan_deadline().0)
            .with_batch_concurrency(self.orchestrator.batch_concurrency().0)
            .with_max_batch_size(self.orchestrator.max_batch_size().0)
    }
}

pub(super) fn out_of_range(field: &str, value: impl Display, fallback: impl Display) -> ConfigIssue {
    ConfigIssue::warning(
        ConfigIssueCode::OutOfRange {
            field: field.to_string(),
            value: value.to_string(),
        },
        format!(
            "{}: value '{}' is out of range, falling back to '{}'",
            field, value, fallback
        ),
    )
}
