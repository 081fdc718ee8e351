//! Configuration file loading for triage
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `TRIAGE_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./triage.toml` or `./.triage.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/triage/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileBreakerConfig, FileConfig, FileDataConfig, FileGuardrailConfig, FileLoggingConfig,
    FileOrchestratorConfig, FileOutputConfig, FileRetryConfig,
};
pub use loader::{ConfigError, ConfigLoader, ConfigSource};
