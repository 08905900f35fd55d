//! Vellum - embeddable engine for no-code AI generation apps
//!
//! An app is a set of input fields, an ordered list of generation actions,
//! and output templates. Actions reference earlier artifacts with `@name.ext`
//! tokens; running the app fills an execution bag that templates render from.
//!
//! # Features
//!
//! - **Localized documents**: Names, prompts and templates per language with fallback
//! - **Dependency gating**: An action only plays once every referenced artifact exists
//! - **Pluggable generation**: Bring any [`GenerationService`] and [`FileStore`]
//! - **Persistence**: Apps and their execution state saved as JSON documents
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vellum::{AppConfig, ExecutionOrchestrator, InputField, InputType, VellumConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     vellum::init_tracing()?;
//!     let config = VellumConfig::load()?;
//!     let files = Arc::new(config.file_store()?);
//!
//!     let mut app = AppConfig::new("Story maker");
//!     app.add_input(InputField::new("name.md", InputType::Text, "Name"))?;
//!
//!     let mut orchestrator = config.orchestrator(app, Arc::new(my_service), files);
//!     orchestrator.set_input_value("name.md", "Ana")?;
//!     orchestrator.run_all().await?;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod telemetry;

pub use config::{StorageConfig, VellumConfig};
pub use telemetry::{init_json_tracing, init_tracing};

pub use vellum_core::*;
pub use vellum_error::*;
pub use vellum_interface::*;

pub use vellum_execution::{
    ActionExecutor, ActionFailure, ActionHandler, ActionOutcome, ExecutionOrchestrator,
    HandlerContext, HandlerRegistry, JsonHandler, MediaHandler, ModelDefaults, Playability,
    ReadFileHandler, RenderedOutput, RunReport, TextHandler, WriteFileHandler,
    action_dependencies, action_dependencies_with_fallback, check_playable,
    check_playable_with_fallback, render_outputs, render_outputs_with_fallback, substitute,
    unresolved_references,
};
pub use vellum_storage::{AppRepository, DEFAULT_APPS_PREFIX, FileSystemStore, InMemoryFileStore};
