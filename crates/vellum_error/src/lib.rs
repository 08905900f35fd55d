//! Error types for the Vellum app execution engine.
//!
//! This crate provides the foundation error types used throughout the Vellum workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! The three failure families the engine distinguishes map onto:
//! - missing dependencies: [`ExecutionErrorKind::MissingDependency`]
//! - generation failures: [`GenerationError`] and [`ExecutionErrorKind::GenerationFailed`]
//! - persistence failures: [`StorageError`]
//!
//! # Examples
//!
//! ```
//! use vellum_error::{VellumResult, StorageError, StorageErrorKind};
//!
//! fn load_app() -> VellumResult<String> {
//!     Err(StorageError::new(StorageErrorKind::NotFound("apps/1.json".into())))?
//! }
//!
//! match load_app() {
//!     Ok(doc) => println!("Got: {}", doc),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod execution;
mod generation;
mod json;
mod storage;
mod validation;

pub use builder::{BuilderError, BuilderErrorKind};
pub use config::ConfigError;
pub use error::{VellumError, VellumErrorKind, VellumResult};
pub use execution::{ExecutionError, ExecutionErrorKind};
pub use generation::{GenerationError, GenerationErrorKind};
pub use json::JsonError;
pub use storage::{StorageError, StorageErrorKind};
pub use validation::{ValidationError, ValidationErrorKind};
