//! App document persistence.

use std::sync::Arc;
use uuid::Uuid;
use vellum_core::AppConfig;
use vellum_error::{JsonError, StorageError, StorageErrorKind, VellumResult};
use vellum_interface::FileStore;

/// Default key prefix for app documents.
pub const DEFAULT_APPS_PREFIX: &str = "apps";

/// Saves and loads whole app documents at `{prefix}/{id}.json`.
///
/// Each save writes the complete document, including the last execution, so
/// a reload restores exactly what was saved.
#[derive(Clone)]
pub struct AppRepository {
    store: Arc<dyn FileStore>,
    prefix: String,
}

impl std::fmt::Debug for AppRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppRepository")
            .field("backend", &self.store.backend_name())
            .field("prefix", &self.prefix)
            .finish()
    }
}

impl AppRepository {
    /// Repository storing apps under `apps/`.
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        Self::with_prefix(store, DEFAULT_APPS_PREFIX)
    }

    /// Repository storing apps under a custom prefix.
    pub fn with_prefix(store: Arc<dyn FileStore>, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into().trim_end_matches('/').to_string();
        Self { store, prefix }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn FileStore> {
        &self.store
    }

    /// Storage key for an app id.
    pub fn key(&self, id: &Uuid) -> String {
        format!("{}/{}.json", self.prefix, id)
    }

    /// Write the whole app document.
    #[tracing::instrument(
        skip(self, app),
        fields(app_id = %app.id, backend = self.store.backend_name())
    )]
    pub async fn save(&self, app: &AppConfig) -> VellumResult<()> {
        let document = serde_json::to_string_pretty(app).map_err(JsonError::from)?;
        self.store.write(&self.key(&app.id), &document).await?;
        tracing::info!(actions = app.actions.len(), "Saved app");
        Ok(())
    }

    /// Read an app document.
    ///
    /// # Errors
    ///
    /// [`StorageErrorKind::NotFound`] if no document exists for `id`, and
    /// [`StorageErrorKind::Corrupt`] if the document does not decode.
    ///
    /// Actions stored as `loading` come back `idle`.
    #[tracing::instrument(skip(self), fields(backend = self.store.backend_name()))]
    pub async fn load(&self, id: &Uuid) -> VellumResult<AppConfig> {
        let key = self.key(id);
        let document = self.store.read(&key).await?;
        let mut app: AppConfig = serde_json::from_str(&document).map_err(|e| {
            StorageError::new(StorageErrorKind::Corrupt {
                path: key.clone(),
                message: e.to_string(),
            })
        })?;
        let settled = app.last_execution.settle_in_flight();
        if settled > 0 {
            tracing::warn!(settled, "Reset actions saved mid-run to idle");
        }
        tracing::debug!(actions = app.actions.len(), "Loaded app");
        Ok(app)
    }

    /// Ids of every stored app, sorted.
    ///
    /// Keys under the prefix that are not `{uuid}.json` are skipped.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> VellumResult<Vec<Uuid>> {
        let prefix = format!("{}/", self.prefix);
        let mut ids: Vec<Uuid> = self
            .store
            .list(&prefix)
            .await?
            .iter()
            .filter_map(|key| {
                let name = key.strip_prefix(&prefix)?.strip_suffix(".json")?;
                match Uuid::parse_str(name) {
                    Ok(id) => Some(id),
                    Err(_) => {
                        tracing::warn!(key = %key, "Ignoring non-app document");
                        None
                    }
                }
            })
            .collect();
        ids.sort();
        Ok(ids)
    }

    /// Remove an app document. Removing a missing app is not an error.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &Uuid) -> VellumResult<()> {
        self.store.delete(&self.key(id)).await
    }

    /// Whether an app document exists.
    pub async fn exists(&self, id: &Uuid) -> VellumResult<bool> {
        self.store.exists(&self.key(id)).await
    }
}
