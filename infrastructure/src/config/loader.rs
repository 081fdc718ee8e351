//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use thiserror::Error;

const PROJECT_FILES: [&str; 2] = ["triage.toml", ".triage.toml"];
const ENV_PREFIX: &str = "TRIAGE_";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("config file not found: {0}")]
    NotFound(PathBuf),
}

/// One place configuration may come from, for `--show-config`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub label: &'static str,
    pub location: String,
    pub found: bool,
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `TRIAGE_*` environment variables (`__` separates nested keys)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./triage.toml` or `./.triage.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/triage/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, ConfigError> {
        if let Some(path) = config_path
            && !path.exists()
        {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Self::figment(config_path)
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// The merged provider chain, before extraction
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(project_path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(project_path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/triage/config.toml if set,
    /// otherwise falls back to ~/.config/triage/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("triage").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Config file locations in priority order
    pub fn sources(config_path: Option<&Path>) -> Vec<ConfigSource> {
        let mut sources = vec![ConfigSource {
            label: "Env",
            location: format!("{}* variables", ENV_PREFIX),
            found: std::env::vars().any(|(k, _)| k.starts_with(ENV_PREFIX)),
        }];

        if let Some(path) = config_path {
            sources.push(ConfigSource {
                label: "Explicit",
                location: path.display().to_string(),
                found: path.exists(),
            });
        }

        sources.push(match Self::project_config_path() {
            Some(path) => ConfigSource {
                label: "Project",
                location: path.display().to_string(),
                found: true,
            },
            None => ConfigSource {
                label: "Project",
                location: "./triage.toml or ./.triage.toml".to_string(),
                found: false,
            },
        });

        if let Some(path) = Self::global_config_path() {
            sources.push(ConfigSource {
                label: "Global",
                found: path.exists(),
                location: path.display().to_string(),
            });
        }

        sources.push(ConfigSource {
            label: "Default",
            location: "built-in defaults".to_string(),
            found: true,
        });
        sources
    }
}
