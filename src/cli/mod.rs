//! Command-line interface.

pub mod commands;
pub mod output;
pub mod progress;
pub mod types;

pub use types::{Cli, Commands};

use crate::domain::errors::SyncError;

/// Report a command failure and exit with status 1.
///
/// A [`SyncError`] has already been shown by the notifier, so in human
/// mode only other errors are printed.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    let sync_error = err.downcast_ref::<SyncError>();

    if json_mode {
        let body = serde_json::json!({
            "success": false,
            "error": format!("{err:#}"),
            "kind": sync_error.map(SyncError::kind),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&body).unwrap_or_default()
        );
    } else if sync_error.is_none() {
        eprintln!("{} {err:#}", console::style("Error:").red().bold());
    }

    std::process::exit(1);
}
