//! Document stores and app persistence for Vellum.
//!
//! This crate provides two [`FileStore`] backends and the [`AppRepository`]
//! that persists whole app documents through any of them.
//!
//! # Features
//!
//! - **Filesystem store**: Keys map to files under a base directory, with atomic writes
//! - **In-memory store**: Shared map for tests and embedded hosts
//! - **App repository**: One JSON document per app at `apps/{id}.json`
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use vellum_core::AppConfig;
//! use vellum_storage::{AppRepository, InMemoryFileStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = AppRepository::new(Arc::new(InMemoryFileStore::new()));
//! let app = AppConfig::new("Story maker");
//!
//! repo.save(&app).await?;
//! let loaded = repo.load(&app.id).await?;
//! assert_eq!(app, loaded);
//! # Ok(())
//! # }
//! ```

mod filesystem;
mod memory;
mod repository;

pub use filesystem::FileSystemStore;
pub use memory::InMemoryFileStore;
pub use repository::{AppRepository, DEFAULT_APPS_PREFIX};
pub use vellum_error::{StorageError, StorageErrorKind};
pub use vellum_interface::FileStore;
