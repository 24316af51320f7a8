use std::path::Path;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Default settings file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = ".pr-to-task/config.yaml";

/// Prefix of environment overrides, e.g. `PR_TO_TASK_GITHUB_TOKEN`.
pub const ENV_PREFIX: &str = "PR_TO_TASK_";

/// Longest accepted request timeout, in seconds.
const MAX_TIMEOUT_SECS: u64 = 600;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Task file path cannot be empty")]
    EmptyTaskFilePath,

    #[error("Invalid api_base_url: {0}. Must start with http:// or https://")]
    InvalidApiBaseUrl(String),

    #[error("Invalid timeout_secs: {0}. Must be between 1 and 600")]
    InvalidTimeout(u64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    #[error("Unknown setting: {0}")]
    UnknownKey(String),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the default settings file
    pub fn load() -> Result<Config> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. The settings file at `path` (optional)
    /// 3. Environment variables (`PR_TO_TASK_*`, nested keys split on `__`)
    pub fn load_from(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load only defaults and the settings file, without environment overrides.
    ///
    /// Used when the result is written back, so that values coming from the
    /// environment are never persisted.
    pub fn load_file_only(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.task_file_path.trim().is_empty() {
            return Err(ConfigError::EmptyTaskFilePath);
        }

        if !(config.api_base_url.starts_with("http://")
            || config.api_base_url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidApiBaseUrl(config.api_base_url.clone()));
        }

        if config.timeout_secs == 0 || config.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::InvalidTimeout(config.timeout_secs));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        Ok(())
    }
}
