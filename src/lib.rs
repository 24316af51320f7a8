//! pr-to-task - GitHub pull requests as a markdown task list
//!
//! Runs a GitHub issue search for pull requests and rewrites a markdown
//! file with one checklist line per result. Closed pull requests are
//! checked, open ones are not, and every line carries the `#github-pr`
//! tag.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): records, settings, errors and the ports
//!   a sync depends on
//! - **Adapters** (`adapters`): the GitHub search client
//! - **Infrastructure Layer** (`infrastructure`): settings files, logging,
//!   notices and file storage
//! - **Service Layer** (`services`): rendering, writing and the sync run
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use pr_to_task::{ConfigLoader, FsFileStore, GitHubClient, PrTaskSync, SyncSettings};
//! use pr_to_task::infrastructure::notify::ConsoleNotifier;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let sync = PrTaskSync::new(
//!         Arc::new(GitHubClient::from_config(&config)?),
//!         Arc::new(FsFileStore::new(".")),
//!         Arc::new(ConsoleNotifier::new()),
//!         SyncSettings::from_config(&config),
//!     );
//!     sync.run().await?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::github::{GitHubClient, GitHubClientConfig};
pub use domain::models::{Config, HeaderPolicy, LoggingConfig, PullRequestRecord, PullRequestState};
pub use domain::ports::{EntryKind, FileStore, Notice, NoticeLevel, Notifier, PullRequestSource};
pub use domain::{SyncError, SyncResult};
pub use infrastructure::config::{ConfigError, ConfigLoader, ConfigStore};
pub use infrastructure::storage::FsFileStore;
pub use services::{PrTaskSync, SyncReport, SyncSettings};
