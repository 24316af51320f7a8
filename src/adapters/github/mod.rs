//! GitHub pull-request search adapter.
//!
//! Implements [`PullRequestSource`](crate::domain::ports::PullRequestSource)
//! on top of the `search/issues` endpoint.

pub mod client;
pub mod models;

pub use client::{GitHubClient, GitHubClientConfig, GITHUB_API_BASE, SEARCH_QUALIFIER};
pub use models::{parse_search_body, SearchItem, SearchPage};
