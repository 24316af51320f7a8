//! Applies rendered tasks to the task file.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::domain::errors::{SyncError, SyncResult};
use crate::domain::models::{HeaderPolicy, PullRequestRecord};
use crate::domain::ports::{EntryKind, FileStore};

use super::task_renderer::{render_document, TASK_FILE_HEADER};

/// What a single apply did to the task file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyOutcome {
    pub path: PathBuf,
    /// The file did not exist and was created with the seed header.
    pub created: bool,
    /// The new content differs from what was there before.
    pub changed: bool,
    pub tasks_written: usize,
}

/// Write `records` to the task file at `path`.
///
/// 1. A missing file is created with [`TASK_FILE_HEADER`].
/// 2. A path that exists but is not a writable regular file fails with
///    [`SyncError::FileConflict`] before anything is written.
/// 3. The whole file is replaced with the rendered block.
///
/// Under [`HeaderPolicy::Discard`] the seed header is overwritten by the
/// first write, and an empty `records` leaves the file empty.
#[instrument(skip_all, fields(path = %path.display(), count = records.len(), ?policy))]
pub async fn apply(
    records: &[PullRequestRecord],
    path: &Path,
    store: &dyn FileStore,
    policy: HeaderPolicy,
) -> SyncResult<ApplyOutcome> {
    let created = match store.entry_kind(path).await? {
        None => {
            info!("task file does not exist, creating it");
            store.create(path, TASK_FILE_HEADER).await?;
            true
        }
        Some(EntryKind::File) => false,
        Some(kind) => {
            debug!(?kind, "task file path is not a writable regular file");
            return Err(SyncError::FileConflict(path.to_path_buf()));
        }
    };

    // Only feeds `changed`; unreadable content is replaced all the same.
    let previous = if created {
        Some(TASK_FILE_HEADER.to_string())
    } else {
        match store.read(path).await {
            Ok(previous) => Some(previous),
            Err(err) => {
                debug!(error = %err, "previous task file content unreadable");
                None
            }
        }
    };

    let content = render_document(records, policy);
    store.write(path, &content).await?;

    Ok(ApplyOutcome {
        path: path.to_path_buf(),
        created,
        changed: previous.as_deref() != Some(content.as_str()),
        tasks_written: records.len(),
    })
}
