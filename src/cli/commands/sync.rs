//! Implementation of the `pr-to-task sync` command.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use console::Term;

use crate::adapters::github::GitHubClient;
use crate::cli::output::{output, plural, CommandOutput};
use crate::cli::progress::{create_spinner_with_message, hidden_spinner};
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::notify::ConsoleNotifier;
use crate::infrastructure::storage::FsFileStore;
use crate::services::{PrTaskSync, SyncReport, SyncSettings};

#[derive(Args, Debug, Default)]
pub struct SyncArgs {
    /// GitHub token, overriding the saved setting
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Search filter appended to `is:pull-request`
    #[arg(long, short, allow_hyphen_values = true)]
    pub filter: Option<String>,

    /// Task file path, overriding the saved setting
    #[arg(long = "file", value_name = "PATH")]
    pub task_file: Option<String>,

    /// Directory that a relative task file path resolves against
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,
}

impl SyncArgs {
    /// Layer command-line overrides on top of the loaded settings.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(token) = &self.token {
            config.github_token = token.trim().to_string();
        }
        if let Some(filter) = &self.filter {
            config.pr_filter = filter.clone();
        }
        if let Some(task_file) = &self.task_file {
            config.task_file_path = task_file.clone();
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct SyncOutput {
    pub success: bool,
    #[serde(flatten)]
    pub report: SyncReport,
}

impl CommandOutput for SyncOutput {
    fn to_human(&self) -> String {
        let report = &self.report;
        let mut lines = vec![format!(
            "Wrote {} to {} ({} open, {} closed)",
            plural(report.tasks_written, "task", "tasks"),
            report.path.display(),
            report.open,
            report.closed
        )];
        if report.created {
            lines.push(format!("Created {}", report.path.display()));
        }
        if !report.changed {
            lines.push("No changes since the last sync".to_string());
        }
        if report.malformed_payload {
            lines.push("GitHub response was unreadable; the task list is now empty".to_string());
        }
        lines.join("\n")
    }
}

pub async fn execute(args: SyncArgs, config_path: &Path, json_mode: bool) -> Result<()> {
    let mut config = ConfigLoader::load_from(config_path)?;
    args.apply_to(&mut config);
    ConfigLoader::validate(&config)?;

    let interactive = !json_mode && Term::stderr().is_term();
    let spinner = if interactive {
        create_spinner_with_message("Fetching pull requests")
    } else {
        hidden_spinner()
    };
    let notifier = if json_mode {
        ConsoleNotifier::quiet()
    } else {
        ConsoleNotifier::new().with_progress(spinner.clone())
    };

    let client = GitHubClient::from_config(&config)?;
    let sync = PrTaskSync::new(
        Arc::new(client),
        Arc::new(FsFileStore::new(&args.root)),
        Arc::new(notifier),
        SyncSettings::from_config(&config),
    );

    let result = sync.run().await;
    spinner.finish_and_clear();

    let report = result?;
    output(
        &SyncOutput {
            success: true,
            report,
        },
        json_mode,
    );
    Ok(())
}
