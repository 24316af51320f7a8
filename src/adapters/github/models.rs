//! GitHub search API response models.
//!
//! The search payload is decoded into a [`serde_json::Value`] first and
//! then coerced item by item, so one odd item does not sink the whole
//! page. A body that is not JSON, or has no `items` array, is a
//! [`SyncError::Parse`].

use serde::Serialize;
use serde_json::Value;

use crate::domain::errors::{SyncError, SyncResult};
use crate::domain::models::{PullRequestRecord, PullRequestState};

/// One item of `GET /search/issues`, reduced to the fields the sync uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchItem {
    pub title: String,
    pub html_url: String,
    /// Raw state string; `None` when absent or not a string.
    pub state: Option<String>,
}

impl SearchItem {
    /// Coerce a raw item. Returns `None` when `title` or `html_url` is
    /// missing or not a string.
    pub fn from_value(value: &Value) -> Option<Self> {
        let title = value.get("title")?.as_str()?;
        let html_url = value.get("html_url")?.as_str()?;
        let state = value.get("state").and_then(Value::as_str);
        Some(Self {
            title: title.to_string(),
            html_url: html_url.to_string(),
            state: state.map(str::to_string),
        })
    }
}

impl From<SearchItem> for PullRequestRecord {
    fn from(item: SearchItem) -> Self {
        let state = PullRequestState::from_api(item.state.as_deref());
        Self::new(item.title, item.html_url, state)
    }
}

/// First page of a search, after coercion.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    /// Total matches reported by GitHub, across all pages.
    pub total_count: Option<u64>,
    /// Set by GitHub when the search timed out server-side.
    pub incomplete_results: bool,
    pub records: Vec<PullRequestRecord>,
    /// Items dropped because they lacked a title or URL.
    pub skipped: usize,
}

impl SearchPage {
    /// Whether GitHub reported more matches than this page carries.
    pub fn is_truncated(&self) -> bool {
        self.total_count
            .is_some_and(|total| total > (self.records.len() + self.skipped) as u64)
    }
}

/// Parse a search response body.
pub fn parse_search_body(body: &str) -> SyncResult<SearchPage> {
    let value: Value = serde_json::from_str(body)?;

    let items = value
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| SyncError::Parse("response has no `items` array".to_string()))?;

    let mut page = SearchPage {
        total_count: value.get("total_count").and_then(Value::as_u64),
        incomplete_results: value
            .get("incomplete_results")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        records: Vec::with_capacity(items.len()),
        skipped: 0,
    };

    for item in items {
        match SearchItem::from_value(item) {
            Some(item) => page.records.push(item.into()),
            None => page.skipped += 1,
        }
    }

    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_search_response() {
        let body = r#"{
            "total_count": 2,
            "incomplete_results": false,
            "items": [
                {
                    "id": 1,
                    "number": 12,
                    "title": "Fix bug",
                    "html_url": "https://github.com/org/repo/pull/12",
                    "state": "open",
                    "pull_request": { "url": "https://api.github.com/repos/org/repo/pulls/12" }
                },
                {
                    "id": 2,
                    "number": 13,
                    "title": "Add docs",
                    "html_url": "https://github.com/org/repo/pull/13",
                    "state": "closed"
                }
            ]
        }"#;
        let page = parse_search_body(body).unwrap();
        assert_eq!(page.total_count, Some(2));
        assert!(!page.incomplete_results);
        assert_eq!(page.skipped, 0);
        assert!(!page.is_truncated());
        assert_eq!(
            page.records,
            vec![
                PullRequestRecord::open("Fix bug", "https://github.com/org/repo/pull/12"),
                PullRequestRecord::closed("Add docs", "https://github.com/org/repo/pull/13"),
            ]
        );
    }

    #[test]
    fn test_missing_and_unknown_state_is_open() {
        let body = r#"{"items": [
            {"title": "A", "html_url": "https://x/1"},
            {"title": "B", "html_url": "https://x/2", "state": "merged"},
            {"title": "C", "html_url": "https://x/3", "state": 7}
        ]}"#;
        let page = parse_search_body(body).unwrap();
        assert_eq!(page.records.len(), 3);
        assert!(page
            .records
            .iter()
            .all(|r| r.state == PullRequestState::Open));
    }

    #[test]
    fn test_items_without_title_or_url_are_skipped() {
        let body = r#"{"total_count": 3, "items": [
            {"html_url": "https://x/1", "state": "open"},
            {"title": "Keep me", "html_url": "https://x/2", "state": "closed"},
            {"title": null, "html_url": "https://x/3"}
        ]}"#;
        let page = parse_search_body(body).unwrap();
        assert_eq!(page.skipped, 2);
        assert_eq!(
            page.records,
            vec![PullRequestRecord::closed("Keep me", "https://x/2")]
        );
        assert!(!page.is_truncated());
    }

    #[test]
    fn test_truncated_when_total_exceeds_page() {
        let body = r#"{"total_count": 120, "items": [
            {"title": "A", "html_url": "https://x/1", "state": "open"}
        ]}"#;
        let page = parse_search_body(body).unwrap();
        assert!(page.is_truncated());
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = parse_search_body("<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, SyncError::Parse(_)));
    }

    #[test]
    fn test_items_not_an_array_is_parse_error() {
        let err = parse_search_body(r#"{"items": {"title": "x"}}"#).unwrap_err();
        assert!(matches!(err, SyncError::Parse(_)));

        let err = parse_search_body(r#"{"message": "Validation Failed"}"#).unwrap_err();
        assert!(matches!(err, SyncError::Parse(_)));
    }

    #[test]
    fn test_empty_items() {
        let page = parse_search_body(r#"{"total_count": 0, "items": []}"#).unwrap();
        assert!(page.records.is_empty());
        assert!(!page.is_truncated());
    }
}
