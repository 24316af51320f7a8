//! Persisting settings changes.
//!
//! Every `config set` goes through [`ConfigStore::set`], which validates
//! the changed settings and writes the file straight away.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::debug;

use super::loader::{ConfigError, ConfigLoader};
use crate::domain::models::config::{Config, HeaderPolicy};

/// Keys accepted by [`ConfigStore::apply_setting`].
pub const SETTING_KEYS: &[&str] = &[
    "github_token",
    "pr_filter",
    "task_file_path",
    "api_base_url",
    "timeout_secs",
    "header_policy",
    "logging.level",
    "logging.format",
    "logging.log_dir",
    "logging.rotation",
];

/// Map the camelCase names used by older settings files to their keys.
pub fn canonical_key(key: &str) -> &str {
    match key {
        "githubToken" => "github_token",
        "prFilter" => "pr_filter",
        "taskFilePath" => "task_file_path",
        other => other,
    }
}

pub struct ConfigStore;

impl ConfigStore {
    /// Update one setting in memory.
    ///
    /// An empty value for `logging.log_dir` turns file logging off.
    pub fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<(), ConfigError> {
        match canonical_key(key) {
            "github_token" => config.github_token = value.trim().to_string(),
            "pr_filter" => config.pr_filter = value.to_string(),
            "task_file_path" => config.task_file_path = value.to_string(),
            "api_base_url" => config.api_base_url = value.trim().to_string(),
            "timeout_secs" => {
                config.timeout_secs =
                    value
                        .trim()
                        .parse()
                        .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                            key: key.to_string(),
                            reason: e.to_string(),
                        })?;
            }
            "header_policy" => {
                config.header_policy =
                    value
                        .parse::<HeaderPolicy>()
                        .map_err(|reason| ConfigError::InvalidValue {
                            key: key.to_string(),
                            reason,
                        })?;
            }
            "logging.level" => config.logging.level = value.trim().to_lowercase(),
            "logging.format" => config.logging.format = value.trim().to_lowercase(),
            "logging.log_dir" => {
                config.logging.log_dir = if value.trim().is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value.trim()))
                };
            }
            "logging.rotation" => config.logging.rotation = value.trim().to_lowercase(),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// Write `config` to `path` as YAML, creating parent directories.
    pub async fn save(path: impl AsRef<Path>, config: &Config) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let yaml = serde_yaml::to_string(config).context("Failed to serialize config")?;
        fs::write(path, yaml)
            .await
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        debug!(path = %path.display(), "saved settings");
        Ok(())
    }

    /// Load the file, change one key, validate and save.
    pub async fn set(path: impl AsRef<Path>, key: &str, value: &str) -> Result<Config> {
        let path = path.as_ref();
        let mut config = ConfigLoader::load_file_only(path)?;
        Self::apply_setting(&mut config, key, value)?;
        ConfigLoader::validate(&config)?;
        Self::save(path, &config).await?;
        Ok(config)
    }
}
