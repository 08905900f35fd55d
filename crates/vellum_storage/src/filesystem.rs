//! Filesystem-backed document store.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use vellum_error::{StorageError, StorageErrorKind, VellumResult};
use vellum_interface::FileStore;

const TEMP_SUFFIX: &str = ".vellum-tmp";

/// Filesystem store rooted at a base directory.
///
/// Keys are slash-separated relative paths mapped beneath the base:
///
/// ```text
/// {base_path}/
/// ├── apps/
/// │   ├── 0b7c...e1.json
/// │   └── 5f21...9a.json
/// └── notes/
///     └── draft.txt
/// ```
///
/// Keys that are absolute or contain `..` are rejected. Writes go to a temp
/// file first and are renamed into place, so readers never see a partial
/// document.
#[derive(Debug, Clone)]
pub struct FileSystemStore {
    base_path: PathBuf,
}

impl FileSystemStore {
    /// Create a store rooted at `base_path`.
    ///
    /// Creates the base directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    #[tracing::instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> VellumResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::info!(path = %base_path.display(), "Opened filesystem store");
        Ok(Self { base_path })
    }

    /// Root directory of the store.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Map a key to a path under the base directory.
    fn resolve(&self, key: &str) -> VellumResult<PathBuf> {
        let invalid = || StorageError::new(StorageErrorKind::InvalidPath(key.to_string()));

        if key.is_empty() || key.contains('\\') || key.ends_with(TEMP_SUFFIX) {
            return Err(invalid().into());
        }
        let relative = Path::new(key);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(invalid().into());
        }
        Ok(self.base_path.join(relative))
    }

    /// Key for a path found under the base directory.
    fn key_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.base_path).ok()?;
        let parts: Vec<&str> = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<_>>()?;
        Some(parts.join("/"))
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut temp = path.as_os_str().to_owned();
    temp.push(TEMP_SUFFIX);
    PathBuf::from(temp)
}

#[async_trait]
impl FileStore for FileSystemStore {
    #[tracing::instrument(skip(self))]
    async fn list(&self, prefix: &str) -> VellumResult<Vec<String>> {
        let mut keys = Vec::new();
        let mut pending = vec![self.base_path.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                        "{}: {}",
                        dir.display(),
                        e
                    )))
                    .into());
                }
            };

            while let Some(entry) = entries.next_entry().await.map_err(|e| {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    dir.display(),
                    e
                )))
            })? {
                let path = entry.path();
                let is_dir = entry
                    .file_type()
                    .await
                    .map(|t| t.is_dir())
                    .unwrap_or(false);
                if is_dir {
                    pending.push(path);
                    continue;
                }
                match self.key_for(&path) {
                    Some(key) if key.ends_with(TEMP_SUFFIX) => {}
                    Some(key) if key.starts_with(prefix) => keys.push(key),
                    Some(_) => {}
                    None => {
                        tracing::warn!(path = %path.display(), "Skipping non UTF-8 path");
                    }
                }
            }
        }

        keys.sort();
        tracing::debug!(count = keys.len(), "Listed documents");
        Ok(keys)
    }

    #[tracing::instrument(skip(self))]
    async fn read(&self, path: &str) -> VellumResult<String> {
        let full = self.resolve(path)?;

        let contents = tokio::fs::read_to_string(&full).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(path.to_string()))
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    full.display(),
                    e
                )))
            }
        })?;

        tracing::debug!(size = contents.len(), "Read document");
        Ok(contents)
    }

    #[tracing::instrument(skip(self, contents), fields(size = contents.len()))]
    async fn write(&self, path: &str, contents: &str) -> VellumResult<()> {
        let full = self.resolve(path)?;

        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        let temp = temp_path(&full);
        tokio::fs::write(&temp, contents).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp, &full).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp.display(),
                full.display(),
                e
            )))
        })?;

        tracing::info!(path = %full.display(), "Wrote document");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, path: &str) -> VellumResult<()> {
        let full = self.resolve(path)?;

        match tokio::fs::remove_file(&full).await {
            Ok(()) => {
                tracing::info!(path = %full.display(), "Deleted document");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Delete of missing document ignored");
                Ok(())
            }
            Err(e) => Err(StorageError::new(StorageErrorKind::FileDelete(format!(
                "{}: {}",
                full.display(),
                e
            )))
            .into()),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn exists(&self, path: &str) -> VellumResult<bool> {
        let full = self.resolve(path)?;
        Ok(tokio::fs::try_exists(&full).await.unwrap_or(false))
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }
}
