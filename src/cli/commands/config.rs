//! Implementation of the `pr-to-task config` commands.
//!
//! These take the place of a settings panel: each `set` is saved
//! immediately.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{redact_token, Config};
use crate::infrastructure::config::{canonical_key, ConfigLoader, ConfigStore, SETTING_KEYS};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective settings, with the token redacted
    Show,

    /// Change one setting and save it
    Set {
        /// Setting name, e.g. pr_filter or logging.level
        key: String,

        /// New value; an empty string clears text settings
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Print the settings file location
    Path,

    /// Write a settings file with default values
    Init {
        /// Overwrite an existing settings file
        #[arg(short, long)]
        force: bool,
    },
}

/// Display value of one setting.
fn setting_value(config: &Config, key: &str) -> String {
    match key {
        "github_token" if config.github_token.is_empty() => "(not set)".to_string(),
        "github_token" => redact_token(&config.github_token),
        "pr_filter" => config.pr_filter.clone(),
        "task_file_path" => config.task_file_path.clone(),
        "api_base_url" => config.api_base_url.clone(),
        "timeout_secs" => config.timeout_secs.to_string(),
        "header_policy" => config.header_policy.to_string(),
        "logging.level" => config.logging.level.clone(),
        "logging.format" => config.logging.format.clone(),
        "logging.log_dir" => config
            .logging
            .log_dir
            .as_ref()
            .map_or_else(|| "(stderr only)".to_string(), |p| p.display().to_string()),
        "logging.rotation" => config.logging.rotation.clone(),
        _ => String::new(),
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ConfigShowOutput {
    pub path: PathBuf,
    pub file_exists: bool,
    pub settings: Config,
}

impl CommandOutput for ConfigShowOutput {
    fn to_human(&self) -> String {
        let width = SETTING_KEYS.iter().map(|k| k.len()).max().unwrap_or(0);
        let mut lines = vec![format!(
            "Settings file: {}{}",
            self.path.display(),
            if self.file_exists { "" } else { " (not created yet)" }
        )];
        for key in SETTING_KEYS {
            lines.push(format!(
                "  {key:<width$}  {}",
                setting_value(&self.settings, key)
            ));
        }
        lines.join("\n")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ConfigSetOutput {
    pub success: bool,
    pub path: PathBuf,
    pub key: String,
    pub value: String,
}

impl CommandOutput for ConfigSetOutput {
    fn to_human(&self) -> String {
        format!("Set {} = {} in {}", self.key, self.value, self.path.display())
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ConfigPathOutput {
    pub path: PathBuf,
    pub exists: bool,
}

impl CommandOutput for ConfigPathOutput {
    fn to_human(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ConfigInitOutput {
    pub success: bool,
    pub message: String,
    pub path: PathBuf,
}

impl CommandOutput for ConfigInitOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }
}

pub async fn execute(args: ConfigArgs, config_path: &Path, json_mode: bool) -> Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = ConfigLoader::load_from(config_path)?;
            output(
                &ConfigShowOutput {
                    path: config_path.to_path_buf(),
                    file_exists: config_path.is_file(),
                    settings: config.redacted(),
                },
                json_mode,
            );
        }
        ConfigCommand::Set { key, value } => {
            let config = ConfigStore::set(config_path, &key, &value).await?;
            output(
                &ConfigSetOutput {
                    success: true,
                    path: config_path.to_path_buf(),
                    value: setting_value(&config, canonical_key(&key)),
                    key: canonical_key(&key).to_string(),
                },
                json_mode,
            );
        }
        ConfigCommand::Path => {
            output(
                &ConfigPathOutput {
                    path: config_path.to_path_buf(),
                    exists: config_path.is_file(),
                },
                json_mode,
            );
        }
        ConfigCommand::Init { force } => {
            let out = if config_path.exists() && !force {
                ConfigInitOutput {
                    success: false,
                    message: format!(
                        "{} already exists. Use --force to overwrite.",
                        config_path.display()
                    ),
                    path: config_path.to_path_buf(),
                }
            } else {
                ConfigStore::save(config_path, &Config::default()).await?;
                ConfigInitOutput {
                    success: true,
                    message: format!("Wrote default settings to {}", config_path.display()),
                    path: config_path.to_path_buf(),
                }
            };
            output(&out, json_mode);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_setting_value_redacts_token() {
        let config = Config {
            github_token: "ghp_0123456789".to_string(),
            ..Default::default()
        };
        assert_eq!(setting_value(&config, "github_token"), "****6789");
        assert_eq!(setting_value(&Config::default(), "github_token"), "(not set)");
    }

    #[test]
    fn test_show_lists_every_key() {
        let out = ConfigShowOutput {
            path: PathBuf::from(".pr-to-task/config.yaml"),
            file_exists: false,
            settings: Config::default(),
        };
        let text = out.to_human();
        assert!(text.contains("(not created yet)"));
        for key in SETTING_KEYS {
            assert!(text.contains(key), "missing {key}");
        }
        assert!(text.contains("is:open is:pr author:@me"));
    }

    #[tokio::test]
    async fn test_init_then_set() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.yaml");

        execute(
            ConfigArgs {
                command: ConfigCommand::Init { force: false },
            },
            &path,
            true,
        )
        .await
        .unwrap();
        assert!(path.is_file());

        execute(
            ConfigArgs {
                command: ConfigCommand::Set {
                    key: "pr_filter".to_string(),
                    value: "-label:wip is:pr".to_string(),
                },
            },
            &path,
            true,
        )
        .await
        .unwrap();

        let config = ConfigLoader::load_file_only(&path).unwrap();
        assert_eq!(config.pr_filter, "-label:wip is:pr");
    }

    #[tokio::test]
    async fn test_set_unknown_key_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.yaml");

        let result = execute(
            ConfigArgs {
                command: ConfigCommand::Set {
                    key: "pr_filters".to_string(),
                    value: "x".to_string(),
                },
            },
            &path,
            true,
        )
        .await;
        assert!(result.is_err());
        assert!(!path.exists());
    }
}
