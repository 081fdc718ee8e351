//! Output configuration from TOML (`[output]` section)

use serde::{Deserialize, Serialize};
use triage_domain::OutputFormat;

/// Raw output configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// `text` or `json`; the CLI flag wins when both are given
    pub format: Option<OutputFormat>,
    /// Enable colored terminal output
    pub color: bool,
    /// Mask card numbers and e-mail addresses before rendering
    pub redact: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
            redact: true,
        }
    }
}
