use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Main configuration structure for pr-to-task
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// GitHub token sent as `Authorization: token <value>`. Empty means anonymous.
    #[serde(default)]
    pub github_token: String,

    /// Search fragment appended to `is:pull-request`
    #[serde(default = "default_pr_filter")]
    pub pr_filter: String,

    /// Destination markdown file
    #[serde(default = "default_task_file_path")]
    pub task_file_path: String,

    /// Base URL of the GitHub REST API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Timeout for the search request, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// What happens to the seed header on each write
    #[serde(default)]
    pub header_policy: HeaderPolicy,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_pr_filter() -> String {
    "is:open is:pr author:@me".to_string()
}

fn default_task_file_path() -> String {
    "Tasks.md".to_string()
}

fn default_api_base_url() -> String {
    "https://api.github.com".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: String::new(),
            pr_filter: default_pr_filter(),
            task_file_path: default_task_file_path(),
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout_secs(),
            header_policy: HeaderPolicy::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    pub fn has_token(&self) -> bool {
        !self.github_token.is_empty()
    }

    /// Copy of this config with the token masked, safe to print.
    pub fn redacted(&self) -> Self {
        Self {
            github_token: redact_token(&self.github_token),
            ..self.clone()
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("github_token", &redact_token(&self.github_token))
            .field("pr_filter", &self.pr_filter)
            .field("task_file_path", &self.task_file_path)
            .field("api_base_url", &self.api_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("header_policy", &self.header_policy)
            .field("logging", &self.logging)
            .finish()
    }
}

/// Mask a token, keeping only its last four characters.
pub fn redact_token(token: &str) -> String {
    let count = token.chars().count();
    if count == 0 {
        String::new()
    } else if count <= 8 {
        "****".to_string()
    } else {
        let tail: String = token.chars().skip(count - 4).collect();
        format!("****{tail}")
    }
}

/// Handling of the `# GitHub Pull Requests` seed header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderPolicy {
    /// Each write replaces the whole file; the header only survives until the first write.
    #[default]
    Discard,
    /// Each write starts with the header.
    Keep,
}

impl FromStr for HeaderPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "discard" => Ok(Self::Discard),
            "keep" => Ok(Self::Keep),
            other => Err(format!("unknown header policy '{other}' (expected discard or keep)")),
        }
    }
}

impl fmt::Display for HeaderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discard => f.write_str("discard"),
            Self::Keep => f.write_str("keep"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for JSON log files; stderr only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// File rotation: daily, hourly, never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.github_token, "");
        assert_eq!(config.pr_filter, "is:open is:pr author:@me");
        assert_eq!(config.task_file_path, "Tasks.md");
        assert_eq!(config.api_base_url, "https://api.github.com");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.header_policy, HeaderPolicy::Discard);
        assert!(!config.has_token());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: Config = serde_yaml::from_str("task_file_path: Work/PRs.md\n").unwrap();
        assert_eq!(config.task_file_path, "Work/PRs.md");
        assert_eq!(config.pr_filter, "is:open is:pr author:@me");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = Config {
            github_token: "ghp_abcdefghijklmnop1234".to_string(),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("ghp_abcdefghijklmnop1234"));
        assert!(debug.contains("****1234"));
    }

    #[test]
    fn test_redact_token() {
        assert_eq!(redact_token(""), "");
        assert_eq!(redact_token("short"), "****");
        assert_eq!(redact_token("ghp_0123456789"), "****6789");
    }

    #[test]
    fn test_redacted_copy_keeps_other_fields() {
        let config = Config {
            github_token: "ghp_0123456789".to_string(),
            pr_filter: "is:pr repo:org/app".to_string(),
            ..Default::default()
        };
        let redacted = config.redacted();
        assert_eq!(redacted.github_token, "****6789");
        assert_eq!(redacted.pr_filter, "is:pr repo:org/app");
    }

    #[test]
    fn test_header_policy_parse() {
        assert_eq!("keep".parse::<HeaderPolicy>(), Ok(HeaderPolicy::Keep));
        assert_eq!("DISCARD".parse::<HeaderPolicy>(), Ok(HeaderPolicy::Discard));
        assert!("sometimes".parse::<HeaderPolicy>().is_err());
        assert_eq!(HeaderPolicy::Keep.to_string(), "keep");
    }
}
