//! Domain models.

pub mod config;
pub mod pull_request;

pub use config::{redact_token, Config, HeaderPolicy, LoggingConfig};
pub use pull_request::{PullRequestRecord, PullRequestState};
