//! Pull-request records as consumed by the task renderer.

use serde::{Deserialize, Serialize};

/// Open/closed state of a pull request.
///
/// The search API reports `"open"` or `"closed"`. Anything else, including
/// a missing value, is treated as open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestState {
    #[default]
    Open,
    Closed,
}

impl PullRequestState {
    /// Coerce a raw API state string.
    pub fn from_api(state: Option<&str>) -> Self {
        match state {
            Some("closed") => Self::Closed,
            _ => Self::Open,
        }
    }

    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Character placed between the checklist brackets.
    pub const fn task_mark(self) -> char {
        match self {
            Self::Closed => 'x',
            Self::Open => ' ',
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

/// One pull request from a search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRecord {
    /// Display title. Untrusted and unescaped.
    pub title: String,
    /// Link to the pull request in the GitHub UI.
    pub url: String,
    pub state: PullRequestState,
}

impl PullRequestRecord {
    pub fn new(title: impl Into<String>, url: impl Into<String>, state: PullRequestState) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            state,
        }
    }

    pub fn open(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(title, url, PullRequestState::Open)
    }

    pub fn closed(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(title, url, PullRequestState::Closed)
    }
}
