//! Port traits for the three capabilities a sync run depends on.
//!
//! The services only talk to GitHub, the filesystem and the user through
//! these traits, so tests can swap in mock servers, in-memory stores and
//! recording notifiers.

pub mod file_store;
pub mod notifier;
pub mod pull_request_source;

pub use file_store::{EntryKind, FileStore};
pub use notifier::{Notice, NoticeLevel, Notifier};
pub use pull_request_source::PullRequestSource;
