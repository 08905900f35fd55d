//! Layered configuration for embedding Vellum.
//!
//! Sources, later overriding earlier:
//! - Bundled defaults (`vellum.toml` shipped with the crate)
//! - `~/.config/vellum/vellum.toml`
//! - `./vellum.toml`

use config::{Config, ConfigBuilder, File, FileFormat, builder::DefaultState};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;
use vellum_core::{AppConfig, DEFAULT_LANGUAGE};
use vellum_error::{ConfigError, VellumResult};
use vellum_execution::{ActionExecutor, ExecutionOrchestrator, ModelDefaults};
use vellum_interface::{FileStore, GenerationService};
use vellum_storage::{AppRepository, FileSystemStore};

const DEFAULT_CONFIG: &str = include_str!("../vellum.toml");

/// Where app documents and file-action outputs are stored.
///
/// # Example
///
/// ```toml
/// [storage]
/// root = "/var/lib/vellum"
/// apps_prefix = "apps"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Getters)]
pub struct StorageConfig {
    /// Directory the filesystem store is rooted at
    root: PathBuf,
    /// Key prefix for app documents
    #[serde(default = "default_apps_prefix")]
    apps_prefix: String,
}

fn default_apps_prefix() -> String {
    vellum_storage::DEFAULT_APPS_PREFIX.to_string()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("vellum-data"),
            apps_prefix: default_apps_prefix(),
        }
    }
}

/// Top-level Vellum configuration.
///
/// # Example
///
/// ```no_run
/// use vellum::VellumConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = VellumConfig::load()?;
/// println!("Apps live under {}", config.storage().root().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Getters)]
pub struct VellumConfig {
    /// Language used when an app does not select one
    #[serde(default = "default_language")]
    default_language: String,
    /// Storage settings
    #[serde(default)]
    storage: StorageConfig,
    /// Fallback models per generation kind
    #[serde(default)]
    models: ModelDefaults,
}

impl Default for VellumConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            storage: StorageConfig::default(),
            models: ModelDefaults::default(),
        }
    }
}

impl VellumConfig {
    /// Load configuration from a single file, without bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> VellumResult<Self> {
        let path = path.as_ref();
        let config = Config::builder()
            .add_source(File::from(path))
            .build()
            .map_err(|e| {
                ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.display(),
                    e
                ))
            })?;
        Self::deserialize_from(config)
    }

    /// Bundled defaults overridden by a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if `toml` does not parse or has wrong types.
    pub fn from_toml(toml: &str) -> VellumResult<Self> {
        let config = Self::defaults()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?;
        Self::deserialize_from(config)
    }

    /// Load configuration with user overrides applied over bundled defaults.
    ///
    /// User config files are optional and skipped if not found.
    pub fn load() -> VellumResult<Self> {
        let mut builder = Self::defaults();

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("vellum").join("vellum.toml");
            tracing::debug!(path = %user_config.display(), "Checking user configuration");
            builder = builder.add_source(File::from(user_config).required(false));
        }

        builder = builder.add_source(File::with_name("vellum").required(false));

        let config = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?;
        let loaded = Self::deserialize_from(config)?;
        tracing::info!(
            default_language = %loaded.default_language,
            storage_root = %loaded.storage.root.display(),
            "Loaded configuration"
        );
        Ok(loaded)
    }

    fn defaults() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn deserialize_from(config: Config) -> VellumResult<Self> {
        let parsed: Self = config
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        if parsed.default_language.trim().is_empty() {
            return Err(ConfigError::new("default_language must not be empty").into());
        }
        Ok(parsed)
    }

    /// New empty app that selects the configured default language.
    pub fn new_app(&self, name: impl Into<String>) -> AppConfig {
        let mut app = AppConfig::new(name);
        app.selected_language = self.default_language.clone();
        app
    }

    /// Filesystem store rooted at `storage.root`, created if missing.
    pub fn file_store(&self) -> VellumResult<FileSystemStore> {
        FileSystemStore::new(&self.storage.root)
    }

    /// App repository over `store` using `storage.apps_prefix`.
    pub fn repository(&self, store: Arc<dyn FileStore>) -> AppRepository {
        AppRepository::with_prefix(store, self.storage.apps_prefix.clone())
    }

    /// Executor with the built-in handlers and the configured default models.
    pub fn executor(
        &self,
        generation: Arc<dyn GenerationService>,
        files: Arc<dyn FileStore>,
    ) -> ActionExecutor {
        ActionExecutor::new(generation, files).with_models(self.models.clone())
    }

    /// Orchestrator for `app` wired with the configured models, apps prefix
    /// and fallback language.
    pub fn orchestrator(
        &self,
        app: AppConfig,
        generation: Arc<dyn GenerationService>,
        files: Arc<dyn FileStore>,
    ) -> ExecutionOrchestrator {
        let executor = self.executor(generation.clone(), files.clone());
        let repository = self.repository(files.clone());
        ExecutionOrchestrator::new(app, generation, files)
            .with_executor(executor)
            .with_repository(repository)
            .with_fallback_language(self.default_language.clone())
    }

    /// Reopen an app saved under `storage.apps_prefix`, wired like
    /// [`orchestrator`](Self::orchestrator).
    pub async fn open(
        &self,
        id: Uuid,
        generation: Arc<dyn GenerationService>,
        files: Arc<dyn FileStore>,
    ) -> VellumResult<ExecutionOrchestrator> {
        let repository = self.repository(files.clone());
        let executor = self.executor(generation.clone(), files.clone());
        let orchestrator = ExecutionOrchestrator::open_with(repository, id, generation, files)
            .await?
            .with_executor(executor)
            .with_fallback_language(self.default_language.clone());
        Ok(orchestrator)
    }
}
