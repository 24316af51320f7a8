//! File storage port.

use std::path::Path;

use async_trait::async_trait;

use crate::domain::errors::SyncResult;

/// What currently sits at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    /// A regular file whose permissions forbid writing.
    ReadOnlyFile,
    Directory,
    Other,
}

/// Minimal file capability: existence check, create, read, write.
///
/// Paths are interpreted by the implementation (the filesystem store
/// resolves relative paths against its root directory).
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Returns `None` when nothing exists at `path`.
    async fn entry_kind(&self, path: &Path) -> SyncResult<Option<EntryKind>>;

    async fn exists(&self, path: &Path) -> SyncResult<bool> {
        Ok(self.entry_kind(path).await?.is_some())
    }

    /// Create a new file. Fails if something already exists at `path`.
    async fn create(&self, path: &Path, content: &str) -> SyncResult<()>;

    async fn read(&self, path: &Path) -> SyncResult<String>;

    /// Replace the entire content of an existing file.
    async fn write(&self, path: &Path, content: &str) -> SyncResult<()>;
}
