//! pr-to-task CLI entry point.

use clap::Parser;

use pr_to_task::cli::{Cli, Commands};
use pr_to_task::infrastructure::config::ConfigLoader;
use pr_to_task::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logging settings come from the same file the command reads; a broken
    // file falls back to defaults here and is reported by the command.
    let log_config = ConfigLoader::load_from(&cli.config)
        .ok()
        .and_then(|config| LogConfig::from_settings(&config.logging).ok())
        .unwrap_or_default();
    let logger = match LoggerImpl::init(&log_config) {
        Ok(logger) => Some(logger),
        Err(err) => {
            eprintln!("Failed to initialize logging: {err:#}");
            None
        }
    };

    let result = match cli.command {
        Commands::Sync(args) => {
            pr_to_task::cli::commands::sync::execute(args, &cli.config, cli.json).await
        }
        Commands::Config(args) => {
            pr_to_task::cli::commands::config::execute(args, &cli.config, cli.json).await
        }
    };

    if let Err(err) = result {
        // Flush buffered file logs before the process exits.
        drop(logger);
        pr_to_task::cli::handle_error(err, cli.json);
    }
}
