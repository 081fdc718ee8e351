//! Data source configuration from TOML (`[data]` section)

use super::out_of_range;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use triage_domain::{ConfigIssue, ConfigIssueCode};

/// Raw data source configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDataConfig {
    /// JSON rule corpus for the kb agent; the built-in corpus when unset
    pub knowledge_base: Option<PathBuf>,
    /// JSON customer fixtures (profiles and transactions)
    pub customers: Option<PathBuf>,
    /// OTP requests allowed per customer per window
    pub otp_max_requests: u32,
    pub otp_window_secs: u64,
}

impl Default for FileDataConfig {
    fn default() -> Self {
        Self {
            knowledge_base: None,
            customers: None,
            otp_max_requests: 3,
            otp_window_secs: 3600,
        }
    }
}

impl FileDataConfig {
    pub fn otp_window(&self) -> (Duration, Vec<ConfigIssue>) {
        if self.otp_window_secs == 0 {
            let default = Self::default().otp_window_secs;
            let issue = out_of_range("data.otp_window_secs", 0, default);
            (Duration::from_secs(default), vec![issue])
        } else {
            (Duration::from_secs(self.otp_window_secs), vec![])
        }
    }

    /// Configured paths that do not exist
    pub fn missing_files(&self) -> Vec<ConfigIssue> {
        [
            ("data.knowledge_base", &self.knowledge_base),
            ("data.customers", &self.customers),
        ]
        .into_iter()
        .filter_map(|(field, path)| path.as_ref().map(|p| (field, p)))
        .filter(|(_, path)| !path.exists())
        .map(|(field, path)| {
            ConfigIssue::error(
                ConfigIssueCode::MissingFile {
                    field: field.to_string(),
                    path: path.display().to_string(),
                },
                format!("{}: file not found: {}", field, path.display()),
            )
        })
        .collect()
    }
}
