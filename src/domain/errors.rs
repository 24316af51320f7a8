//! Domain errors for the pull-request sync.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Render an optional HTTP status as a message suffix.
fn format_status(status: &Option<u16>) -> String {
    status.map_or_else(String::new, |code| format!(" (HTTP {code})"))
}

/// Errors that can end a single sync invocation.
///
/// Every variant is scoped to one run: the caller reports it and the user
/// re-triggers the command manually. Nothing here is retried.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Transport failure or non-success status from the search endpoint.
    #[error("GitHub request failed{}: {message}", format_status(.status))]
    Fetch { status: Option<u16>, message: String },

    /// The search request did not complete within the configured timeout.
    #[error("GitHub request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The response body was not JSON or did not carry an `items` array.
    #[error("Unexpected GitHub response: {0}")]
    Parse(String),

    /// The task file path exists but is not a writable regular file.
    #[error("Task file path exists but is not a writable file: {}", .0.display())]
    FileConflict(PathBuf),

    /// The file store rejected a create or write.
    #[error("Failed to write task file {}: {message}", .path.display())]
    Write { path: PathBuf, message: String },

    /// The file store could not inspect or read a path.
    #[error("Failed to access {}: {message}", .path.display())]
    Storage { path: PathBuf, message: String },
}

impl SyncError {
    /// Short machine-readable name of the error kind.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Fetch { .. } => "fetch",
            Self::Timeout(_) => "timeout",
            Self::Parse(_) => "parse",
            Self::FileConflict(_) => "file_conflict",
            Self::Write { .. } => "write",
            Self::Storage { .. } => "storage",
        }
    }

    /// HTTP status carried by a fetch failure, if any.
    pub const fn http_status(&self) -> Option<u16> {
        match self {
            Self::Fetch { status, .. } => *status,
            _ => None,
        }
    }
}

pub type SyncResult<T> = Result<T, SyncError>;

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_message_includes_status() {
        let err = SyncError::Fetch {
            status: Some(401),
            message: "Bad credentials".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "GitHub request failed (HTTP 401): Bad credentials"
        );
        assert_eq!(err.http_status(), Some(401));
        assert_eq!(err.kind(), "fetch");
    }

    #[test]
    fn test_fetch_error_without_status() {
        let err = SyncError::Fetch {
            status: None,
            message: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "GitHub request failed: connection refused");
        assert_eq!(err.http_status(), None);
    }

    #[test]
    fn test_timeout_is_distinct_kind() {
        let err = SyncError::Timeout(Duration::from_secs(30));
        assert_eq!(err.kind(), "timeout");
        assert!(err.to_string().contains("30s"));
    }

    #[test]
    fn test_serde_error_maps_to_parse() {
        let err: SyncError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, SyncError::Parse(_)));
    }

    #[test]
    fn test_file_conflict_names_path() {
        let err = SyncError::FileConflict(PathBuf::from("notes/Tasks.md"));
        assert!(err.to_string().contains("notes/Tasks.md"));
    }
}
