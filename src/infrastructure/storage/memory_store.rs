//! In-memory [`FileStore`] for tests and dry runs.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::errors::{SyncError, SyncResult};
use crate::domain::ports::{EntryKind, FileStore};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    File(String),
    Directory,
}

/// A store operation, recorded in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Create(PathBuf),
    Read(PathBuf),
    Write(PathBuf),
}

#[derive(Debug, Default)]
struct State {
    entries: BTreeMap<PathBuf, Entry>,
    operations: Vec<StoreOp>,
    fail_writes: bool,
}

/// File store kept entirely in memory.
///
/// Records every create/read/write so callers can assert on ordering, and
/// can be told to reject writes to exercise failure paths.
#[derive(Debug, Default)]
pub struct InMemoryFileStore {
    state: Mutex<State>,
}

impl InMemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.lock()
            .entries
            .insert(path.into(), Entry::File(content.into()));
        self
    }

    #[must_use]
    pub fn with_directory(self, path: impl Into<PathBuf>) -> Self {
        self.lock().entries.insert(path.into(), Entry::Directory);
        self
    }

    /// Make every subsequent create and write fail.
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Current content of a file, if one exists at `path`.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        match self.lock().entries.get(path.as_ref()) {
            Some(Entry::File(content)) => Some(content.clone()),
            _ => None,
        }
    }

    pub fn operations(&self) -> Vec<StoreOp> {
        self.lock().operations.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn rejected(path: &Path) -> SyncError {
    SyncError::Write {
        path: path.to_path_buf(),
        message: "write rejected by store".to_string(),
    }
}

#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn entry_kind(&self, path: &Path) -> SyncResult<Option<EntryKind>> {
        Ok(self.lock().entries.get(path).map(|entry| match entry {
            Entry::File(_) => EntryKind::File,
            Entry::Directory => EntryKind::Directory,
        }))
    }

    async fn create(&self, path: &Path, content: &str) -> SyncResult<()> {
        let mut state = self.lock();
        if state.fail_writes {
            return Err(rejected(path));
        }
        if state.entries.contains_key(path) {
            return Err(SyncError::Write {
                path: path.to_path_buf(),
                message: "already exists".to_string(),
            });
        }
        state
            .entries
            .insert(path.to_path_buf(), Entry::File(content.to_string()));
        state.operations.push(StoreOp::Create(path.to_path_buf()));
        Ok(())
    }

    async fn read(&self, path: &Path) -> SyncResult<String> {
        let mut state = self.lock();
        state.operations.push(StoreOp::Read(path.to_path_buf()));
        match state.entries.get(path) {
            Some(Entry::File(content)) => Ok(content.clone()),
            Some(Entry::Directory) => Err(SyncError::Storage {
                path: path.to_path_buf(),
                message: "is a directory".to_string(),
            }),
            None => Err(SyncError::Storage {
                path: path.to_path_buf(),
                message: "not found".to_string(),
            }),
        }
    }

    async fn write(&self, path: &Path, content: &str) -> SyncResult<()> {
        let mut state = self.lock();
        if state.fail_writes {
            return Err(rejected(path));
        }
        match state.entries.get_mut(path) {
            Some(Entry::File(existing)) => {
                *existing = content.to_string();
            }
            _ => {
                return Err(SyncError::Write {
                    path: path.to_path_buf(),
                    message: "not a file".to_string(),
                })
            }
        }
        state.operations.push(StoreOp::Write(path.to_path_buf()));
        Ok(())
    }
}
