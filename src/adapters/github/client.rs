//! GitHub HTTP client for the pull-request search.
//!
//! Wraps `GET /search/issues` of the GitHub REST API v3. One call per
//! sync, no retries and no pagination: only the first page of matches
//! is returned.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use tracing::{debug, info, instrument, warn};

use crate::domain::errors::{SyncError, SyncResult};
use crate::domain::models::{Config, PullRequestRecord};
use crate::domain::ports::PullRequestSource;

use super::models::{parse_search_body, SearchPage};

/// Base URL for the GitHub REST API v3.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Qualifier every search starts with.
pub const SEARCH_QUALIFIER: &str = "is:pull-request";

const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("pr-to-task/", env!("CARGO_PKG_VERSION"));

/// Longest error body kept in a [`SyncError::Fetch`] message.
const MAX_ERROR_BODY: usize = 512;

/// Configuration for the GitHub client
#[derive(Clone)]
pub struct GitHubClientConfig {
    /// Personal access token; empty sends no `Authorization` header
    pub token: String,
    /// API root, e.g. `https://api.github.com` or a GitHub Enterprise URL
    pub base_url: String,
    /// Timeout for the whole request, body included
    pub timeout: Duration,
}

impl Default for GitHubClientConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            base_url: GITHUB_API_BASE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl From<&Config> for GitHubClientConfig {
    fn from(config: &Config) -> Self {
        Self {
            token: config.github_token.clone(),
            base_url: config.api_base_url.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

impl std::fmt::Debug for GitHubClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClientConfig")
            .field("token", &crate::domain::models::redact_token(&self.token))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// HTTP client for the GitHub search endpoint.
///
/// Transport errors and non-success statuses map to [`SyncError::Fetch`],
/// timeouts to [`SyncError::Timeout`], and unreadable bodies to
/// [`SyncError::Parse`].
#[derive(Clone)]
pub struct GitHubClient {
    http: Client,
    token: String,
    base_url: String,
    timeout: Duration,
}

impl GitHubClient {
    /// Create a client against `api.github.com` with the given token.
    pub fn new(token: String) -> SyncResult<Self> {
        Self::with_config(GitHubClientConfig {
            token,
            ..Default::default()
        })
    }

    pub fn with_config(config: GitHubClientConfig) -> SyncResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SyncError::Fetch {
                status: None,
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            token: config.token,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
        })
    }

    pub fn from_config(config: &Config) -> SyncResult<Self> {
        Self::with_config(GitHubClientConfig::from(config))
    }

    /// Full search query for a filter fragment.
    ///
    /// The fragment is concatenated as-is; URL encoding happens when the
    /// request is built.
    pub fn search_query(filter: &str) -> String {
        format!("{SEARCH_QUALIFIER} {filter}")
    }

    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    fn authorized_request(&self, url: &str) -> RequestBuilder {
        let request = self.http.get(url).header("Accept", ACCEPT_HEADER);
        if self.token.is_empty() {
            request
        } else {
            request.header("Authorization", format!("token {}", self.token))
        }
    }

    fn transport_error(&self, err: &reqwest::Error) -> SyncError {
        if err.is_timeout() {
            SyncError::Timeout(self.timeout)
        } else {
            SyncError::Fetch {
                status: err.status().map(|s| s.as_u16()),
                message: err.to_string(),
            }
        }
    }

    /// Search pull requests and return the first page.
    #[instrument(skip(self), fields(authenticated = self.is_authenticated()))]
    pub async fn search_pull_requests(&self, filter: &str) -> SyncResult<SearchPage> {
        let url = format!("{}/search/issues", self.base_url);
        let query = Self::search_query(filter);
        debug!(%url, %query, "searching pull requests");

        let resp = self
            .authorized_request(&url)
            .query(&[("q", query.as_str())])
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(%status, "GitHub search returned an error status");
            return Err(status_error(status, &body));
        }

        let body = resp.text().await.map_err(|e| self.transport_error(&e))?;
        let page = parse_search_body(&body)?;

        if page.skipped > 0 {
            debug!(skipped = page.skipped, "dropped search items without title or url");
        }
        if page.incomplete_results {
            warn!("GitHub reported incomplete search results");
        }
        if page.is_truncated() {
            info!(
                total = page.total_count,
                returned = page.records.len(),
                "more matches than the first page; only the first page is synced"
            );
        }

        Ok(page)
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.is_authenticated())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PullRequestSource for GitHubClient {
    async fn fetch(&self, filter: &str) -> SyncResult<Vec<PullRequestRecord>> {
        Ok(self.search_pull_requests(filter).await?.records)
    }
}

/// Build a fetch error from a non-success response.
fn status_error(status: StatusCode, body: &str) -> SyncError {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| truncate(body.trim(), MAX_ERROR_BODY));

    let message = if detail.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string()
    } else {
        detail
    };

    SyncError::Fetch {
        status: Some(status.as_u16()),
        message,
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars).collect();
        format!("{head}...")
    }
}
