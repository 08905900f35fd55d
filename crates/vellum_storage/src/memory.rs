//! In-memory document store.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use vellum_error::{StorageError, StorageErrorKind, VellumResult};
use vellum_interface::FileStore;

/// Document store held in a shared map.
///
/// Clones share the same documents. Useful for tests and for hosts that
/// persist elsewhere.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFileStore {
    documents: Arc<Mutex<BTreeMap<String, String>>>,
}

impl InMemoryFileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.lock().map(|docs| docs.len()).unwrap_or(0)
    }

    /// Whether the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> VellumResult<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.documents.lock().map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!("store lock poisoned: {}", e)))
                .into()
        })
    }
}

#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn list(&self, prefix: &str) -> VellumResult<Vec<String>> {
        let docs = self.lock()?;
        Ok(docs
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn read(&self, path: &str) -> VellumResult<String> {
        let docs = self.lock()?;
        docs.get(path).cloned().ok_or_else(|| {
            StorageError::new(StorageErrorKind::NotFound(path.to_string())).into()
        })
    }

    #[tracing::instrument(skip(self, contents), fields(size = contents.len()))]
    async fn write(&self, path: &str, contents: &str) -> VellumResult<()> {
        if path.is_empty() {
            return Err(StorageError::new(StorageErrorKind::InvalidPath(path.to_string())).into());
        }
        self.lock()?.insert(path.to_string(), contents.to_string());
        tracing::debug!("Stored document in memory");
        Ok(())
    }

    async fn delete(&self, path: &str) -> VellumResult<()> {
        self.lock()?.remove(path);
        Ok(())
    }

    async fn exists(&self, path: &str) -> VellumResult<bool> {
        Ok(self.lock()?.contains_key(path))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
