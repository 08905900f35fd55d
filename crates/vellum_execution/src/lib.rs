//! Action execution engine for Vellum apps.
//!
//! This crate turns an app definition into generated artifacts:
//!
//! - [`substitute`] resolves `@name.ext` references against the execution bag
//! - [`check_playable`] reports which referenced artifacts are still missing
//! - [`ActionExecutor`] dispatches one action through the [`HandlerRegistry`]
//! - [`ExecutionOrchestrator`] runs actions in order and tracks their status
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vellum_core::{ActionType, AppConfig, InputField, InputType};
//! use vellum_execution::ExecutionOrchestrator;
//! use vellum_storage::InMemoryFileStore;
//!
//! let mut app = AppConfig::new("Story maker");
//! app.add_input(InputField::new("name.md", InputType::Text, "Name"))?;
//! app.add_action(ActionType::GenerateText, "Story");
//! app.actions[0].prompt.insert("en-US", "Tell a story about @name.md".to_string());
//!
//! let mut orchestrator =
//!     ExecutionOrchestrator::new(app, Arc::new(my_service), Arc::new(InMemoryFileStore::new()));
//! orchestrator.set_input_value("name.md", "Ana")?;
//!
//! let report = orchestrator.run_all().await?;
//! assert!(report.is_success());
//! println!("{:?}", orchestrator.bag_entry("story.md"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod dependency;
mod executor;
mod handlers;
mod models;
mod orchestrator;
mod output;
mod variables;

pub use dependency::{
    Playability, action_dependencies, action_dependencies_with_fallback, check_playable,
    check_playable_with_fallback,
};
pub use executor::{ActionExecutor, ActionOutcome};
pub use handlers::{
    ActionHandler, HandlerContext, HandlerRegistry, JsonHandler, MediaHandler, ReadFileHandler,
    TextHandler, WriteFileHandler,
};
pub use models::ModelDefaults;
pub use orchestrator::{ActionFailure, ExecutionOrchestrator, RunReport};
pub use output::{RenderedOutput, render_outputs, render_outputs_with_fallback};
pub use variables::{extract_references, substitute, unresolved_references};
