//! Core data types for the Vellum app execution engine.
//!
//! This crate provides the data model shared by every Vellum crate: apps,
//! their input fields and actions, the execution bag that holds named
//! artifacts, and the localization resolver all language lookups go through.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod action;
mod app;
mod bag;
mod execution;
mod input;
mod localization;
mod output;
mod reference;

pub use action::{ActionData, ActionType, derive_output_filename, slugify};
pub use app::AppConfig;
pub use bag::{BagEntry, ExecutionBag};
pub use execution::{ActionStatus, Execution};
pub use input::{InputField, InputType, SelectOption};
pub use localization::{DEFAULT_LANGUAGE, Localizable, resolve};
pub use output::{OutputTemplate, OutputType};
pub use reference::{
    ArtifactReference, extract_references, is_valid_artifact_filename, scan_references,
};
