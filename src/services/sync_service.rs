//! The "Get PRs" operation: fetch, write, notify.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::domain::errors::{SyncError, SyncResult};
use crate::domain::models::{Config, HeaderPolicy, PullRequestRecord};
use crate::domain::ports::{FileStore, Notifier, PullRequestSource};

use super::task_writer;

pub const NOTICE_STARTED: &str = "Getting PRs...";
pub const NOTICE_DONE: &str = "PR tasks added to your task file";

/// The settings a sync run reads.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub filter: String,
    pub task_file_path: PathBuf,
    pub header_policy: HeaderPolicy,
    /// Only used for logging; the token itself lives in the source.
    pub authenticated: bool,
}

impl SyncSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            filter: config.pr_filter.clone(),
            task_file_path: PathBuf::from(&config.task_file_path),
            header_policy: config.header_policy,
            authenticated: config.has_token(),
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub path: PathBuf,
    pub tasks_written: usize,
    pub open: usize,
    pub closed: usize,
    pub created: bool,
    pub changed: bool,
    /// The search payload was unreadable and zero records were written.
    pub malformed_payload: bool,
    pub completed_at: DateTime<Utc>,
}

/// Runs the pull-request to task-file sync.
///
/// Holds the three capabilities the run depends on. Concurrent calls to
/// [`run`](Self::run) on the same instance are serialized.
pub struct PrTaskSync {
    source: Arc<dyn PullRequestSource>,
    store: Arc<dyn FileStore>,
    notifier: Arc<dyn Notifier>,
    settings: SyncSettings,
    run_lock: Mutex<()>,
}

impl PrTaskSync {
    pub fn new(
        source: Arc<dyn PullRequestSource>,
        store: Arc<dyn FileStore>,
        notifier: Arc<dyn Notifier>,
        settings: SyncSettings,
    ) -> Self {
        Self {
            source,
            store,
            notifier,
            settings,
            run_lock: Mutex::new(()),
        }
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Fetch pull requests and rewrite the task file.
    ///
    /// Every failure is reported through the notifier before it is
    /// returned. A malformed payload is the one exception that does not
    /// stop the run: it is reported as a warning and zero records are
    /// written.
    #[instrument(skip_all, fields(path = %self.settings.task_file_path.display()))]
    pub async fn run(&self) -> SyncResult<SyncReport> {
        let _running = self.run_lock.lock().await;

        self.notifier.info(NOTICE_STARTED);
        info!(
            token = if self.settings.authenticated { "Token exists" } else { "No token" },
            filter = %self.settings.filter,
            "getting pull requests"
        );

        let (records, malformed_payload) = match self.source.fetch(&self.settings.filter).await {
            Ok(records) => (records, false),
            Err(SyncError::Parse(reason)) => {
                warn!(%reason, "unreadable search response, writing zero records");
                self.notifier.warn(&format!(
                    "GitHub returned an unexpected response ({reason}); no pull requests were read"
                ));
                (Vec::new(), true)
            }
            Err(err) => return Err(self.report_failure(err)),
        };
        info!(count = records.len(), "received pull requests");

        let outcome = match task_writer::apply(
            &records,
            &self.settings.task_file_path,
            self.store.as_ref(),
            self.settings.header_policy,
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(err) => return Err(self.report_failure(err)),
        };

        self.notifier.success(NOTICE_DONE);

        let closed = count_closed(&records);
        Ok(SyncReport {
            path: outcome.path,
            tasks_written: outcome.tasks_written,
            open: records.len() - closed,
            closed,
            created: outcome.created,
            changed: outcome.changed,
            malformed_payload,
            completed_at: Utc::now(),
        })
    }

    fn report_failure(&self, err: SyncError) -> SyncError {
        warn!(kind = err.kind(), error = %err, "sync failed");
        self.notifier.error(&err.to_string());
        err
    }
}

fn count_closed(records: &[PullRequestRecord]) -> usize {
    records.iter().filter(|r| r.state.is_closed()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::NoticeLevel;
    use crate::infrastructure::notify::RecordingNotifier;
    use crate::infrastructure::storage::{InMemoryFileStore, StoreOp};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct StaticSource(fn() -> SyncResult<Vec<PullRequestRecord>>);

    #[async_trait]
    impl PullRequestSource for StaticSource {
        async fn fetch(&self, _filter: &str) -> SyncResult<Vec<PullRequestRecord>> {
            (self.0)()
        }
    }

    fn two_prs() -> SyncResult<Vec<PullRequestRecord>> {
        Ok(vec![
            PullRequestRecord::open("Fix bug", "https://x/1"),
            PullRequestRecord::closed("Add docs", "https://x/2"),
        ])
    }

    fn settings() -> SyncSettings {
        SyncSettings::from_config(&Config::default())
    }

    fn build(
        source: impl PullRequestSource + 'static,
        store: Arc<InMemoryFileStore>,
        notifier: Arc<RecordingNotifier>,
    ) -> PrTaskSync {
        PrTaskSync::new(Arc::new(source), store, notifier, settings())
    }

    #[tokio::test]
    async fn test_successful_run() {
        let store = Arc::new(InMemoryFileStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let sync = build(StaticSource(two_prs), store.clone(), notifier.clone());

        let report = sync.run().await.unwrap();

        assert_eq!(report.tasks_written, 2);
        assert_eq!(report.open, 1);
        assert_eq!(report.closed, 1);
        assert!(report.created);
        assert!(!report.malformed_payload);
        assert_eq!(
            store.contents("Tasks.md").as_deref(),
            Some("- [ ] [Fix bug](https://x/1) #github-pr\n- [x] [Add docs](https://x/2) #github-pr\n")
        );
        assert_eq!(notifier.messages_at(NoticeLevel::Info), vec![NOTICE_STARTED]);
        assert_eq!(notifier.messages_at(NoticeLevel::Success), vec![NOTICE_DONE]);
        assert!(notifier.messages_at(NoticeLevel::Error).is_empty());
    }

    #[tokio::test]
    async fn test_fetch_error_notifies_and_skips_write() {
        let store = Arc::new(InMemoryFileStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let sync = build(
            StaticSource(|| {
                Err(SyncError::Fetch {
                    status: Some(401),
                    message: "Bad credentials".to_string(),
                })
            }),
            store.clone(),
            notifier.clone(),
        );

        let err = sync.run().await.unwrap_err();

        assert_eq!(err.http_status(), Some(401));
        assert!(store.operations().is_empty());
        let errors = notifier.messages_at(NoticeLevel::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("401"));
        assert!(notifier.messages_at(NoticeLevel::Success).is_empty());
    }

    #[tokio::test]
    async fn test_timeout_notifies_and_skips_write() {
        let store = Arc::new(InMemoryFileStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let sync = build(
            StaticSource(|| Err(SyncError::Timeout(Duration::from_secs(30)))),
            store.clone(),
            notifier.clone(),
        );

        let err = sync.run().await.unwrap_err();

        assert!(matches!(err, SyncError::Timeout(_)));
        assert!(store.operations().is_empty());
        assert_eq!(notifier.messages_at(NoticeLevel::Error).len(), 1);
    }

    #[tokio::test]
    async fn test_parse_error_warns_and_writes_zero_records() {
        let store = Arc::new(InMemoryFileStore::new().with_file("Tasks.md", "- [ ] old\n"));
        let notifier = Arc::new(RecordingNotifier::new());
        let sync = build(
            StaticSource(|| Err(SyncError::Parse("response has no `items` array".to_string()))),
            store.clone(),
            notifier.clone(),
        );

        let report = sync.run().await.unwrap();

        assert!(report.malformed_payload);
        assert_eq!(report.tasks_written, 0);
        assert_eq!(store.contents("Tasks.md").as_deref(), Some(""));
        assert_eq!(notifier.messages_at(NoticeLevel::Warning).len(), 1);
        assert_eq!(notifier.messages_at(NoticeLevel::Success), vec![NOTICE_DONE]);
    }

    #[tokio::test]
    async fn test_directory_conflict_notifies() {
        let store = Arc::new(InMemoryFileStore::new().with_directory("Tasks.md"));
        let notifier = Arc::new(RecordingNotifier::new());
        let sync = build(StaticSource(two_prs), store.clone(), notifier.clone());

        let err = sync.run().await.unwrap_err();

        assert!(matches!(err, SyncError::FileConflict(_)));
        assert!(!store
            .operations()
            .iter()
            .any(|op| matches!(op, StoreOp::Write(_) | StoreOp::Create(_))));
        let errors = notifier.messages_at(NoticeLevel::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("not a writable file"));
    }

    #[tokio::test]
    async fn test_write_error_notifies() {
        let store = Arc::new(InMemoryFileStore::new().with_file("Tasks.md", "keep\n"));
        store.fail_writes(true);
        let notifier = Arc::new(RecordingNotifier::new());
        let sync = build(StaticSource(two_prs), store.clone(), notifier.clone());

        let err = sync.run().await.unwrap_err();

        assert!(matches!(err, SyncError::Write { .. }));
        assert_eq!(store.contents("Tasks.md").as_deref(), Some("keep\n"));
        assert_eq!(notifier.messages_at(NoticeLevel::Error).len(), 1);
    }

    struct SlowSource {
        active: AtomicUsize,
        max_active: AtomicUsize,
    }

    #[async_trait]
    impl PullRequestSource for SlowSource {
        async fn fetch(&self, _filter: &str) -> SyncResult<Vec<PullRequestRecord>> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            two_prs()
        }
    }

    #[tokio::test]
    async fn test_overlapping_runs_are_serialized() {
        let source = Arc::new(SlowSource {
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
        });
        let store = Arc::new(InMemoryFileStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let sync = PrTaskSync::new(source.clone(), store.clone(), notifier, settings());

        let (a, b) = tokio::join!(sync.run(), sync.run());
        assert!(a.is_ok());
        assert!(b.is_ok());

        assert_eq!(source.max_active.load(Ordering::SeqCst), 1);
        let creates = store
            .operations()
            .iter()
            .filter(|op| matches!(op, StoreOp::Create(_)))
            .count();
        assert_eq!(creates, 1);
    }
}
