//! Configuration management infrastructure
//!
//! Hierarchical configuration using figment:
//! - YAML settings file
//! - Environment variable overrides
//! - Validation
//! - Save-on-change for the `config set` command

pub mod loader;
pub mod store;

pub use loader::{ConfigError, ConfigLoader, DEFAULT_CONFIG_PATH, ENV_PREFIX};
pub use store::{canonical_key, ConfigStore, SETTING_KEYS};
