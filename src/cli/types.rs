//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::commands::config::ConfigArgs;
use super::commands::sync::SyncArgs;
use crate::infrastructure::config::DEFAULT_CONFIG_PATH;

#[derive(Parser, Debug)]
#[command(name = "pr-to-task")]
#[command(about = "Sync GitHub pull requests into a markdown task list", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Settings file
    #[arg(long, global = true, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Get PRs: fetch pull requests and rewrite the task file
    #[command(visible_alias = "get-prs")]
    Sync(SyncArgs),

    /// Show or change persisted settings
    Config(ConfigArgs),
}
