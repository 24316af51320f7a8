//! Filesystem-backed [`FileStore`].

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::domain::errors::{SyncError, SyncResult};
use crate::domain::ports::{EntryKind, FileStore};

/// File store rooted at a base directory (the notes vault).
///
/// Relative paths resolve against the root; absolute paths are used as
/// given. Symlinks are followed, so a linked task file is updated in
/// place of its link. Writes go to a uniquely named sibling temp file
/// that is renamed over the target, so a failed write leaves the previous
/// content intact and concurrent writers never share a temp file.
#[derive(Debug, Clone)]
pub struct FsFileStore {
    root: PathBuf,
}

impl FsFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

/// Replace `target` with `content` through a temp file in `dir`.
///
/// Blocking; run it off the async runtime.
fn replace_atomically(
    dir: &Path,
    target: &Path,
    content: &str,
    permissions: Option<std::fs::Permissions>,
) -> std::io::Result<()> {
    let mut temp = tempfile::Builder::new()
        .prefix(".pr-to-task.")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    temp.write_all(content.as_bytes())?;
    temp.as_file().sync_all()?;
    if let Some(permissions) = permissions {
        temp.as_file().set_permissions(permissions)?;
    }
    persist(temp, target)
}

fn persist(temp: NamedTempFile, target: &Path) -> std::io::Result<()> {
    // A failed persist drops the temp file, which removes it.
    temp.persist(target).map(drop).map_err(|e| e.error)
}

fn write_error(path: &Path, err: &std::io::Error) -> SyncError {
    SyncError::Write {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn storage_error(path: &Path, err: &std::io::Error) -> SyncError {
    SyncError::Storage {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

#[async_trait]
impl FileStore for FsFileStore {
    async fn entry_kind(&self, path: &Path) -> SyncResult<Option<EntryKind>> {
        let full = self.resolve(path);
        match fs::metadata(&full).await {
            Ok(meta) if meta.is_file() && meta.permissions().readonly() => {
                Ok(Some(EntryKind::ReadOnlyFile))
            }
            Ok(meta) if meta.is_file() => Ok(Some(EntryKind::File)),
            Ok(meta) if meta.is_dir() => Ok(Some(EntryKind::Directory)),
            Ok(_) => Ok(Some(EntryKind::Other)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error(&full, &e)),
        }
    }

    async fn create(&self, path: &Path, content: &str) -> SyncResult<()> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| write_error(&full, &e))?;
        }

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full)
            .await
            .map_err(|e| write_error(&full, &e))?;
        file.write_all(content.as_bytes())
            .await
            .map_err(|e| write_error(&full, &e))?;
        file.flush().await.map_err(|e| write_error(&full, &e))?;

        debug!(path = %full.display(), "created task file");
        Ok(())
    }

    async fn read(&self, path: &Path) -> SyncResult<String> {
        let full = self.resolve(path);
        fs::read_to_string(&full)
            .await
            .map_err(|e| storage_error(&full, &e))
    }

    async fn write(&self, path: &Path, content: &str) -> SyncResult<()> {
        let full = self.resolve(path);
        // Write through symlinks to the file they point at.
        let target = match fs::canonicalize(&full).await {
            Ok(target) => target,
            Err(e) if e.kind() == ErrorKind::NotFound => full.clone(),
            Err(e) => return Err(write_error(&full, &e)),
        };
        let dir = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let permissions = fs::metadata(&target).await.ok().map(|m| m.permissions());

        let content = content.to_owned();
        let bytes = content.len();
        let dest = target.clone();
        tokio::task::spawn_blocking(move || replace_atomically(&dir, &dest, &content, permissions))
            .await
            .map_err(|e| SyncError::Write {
                path: full.clone(),
                message: e.to_string(),
            })?
            .map_err(|e| write_error(&full, &e))?;

        debug!(path = %target.display(), bytes, "wrote task file");
        Ok(())
    }
}
