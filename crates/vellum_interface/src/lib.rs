//! Trait definitions for the Vellum app engine.
//!
//! This crate defines the collaborators the engine depends on but does not
//! implement: a generation service and a file store.

mod traits;
mod types;

pub use traits::{FileStore, GenerationService};
pub use types::{
    AudioResponse, ImageResponse, MediaRequest, MediaRequestBuilder, MediaResponse, ObjectRequest,
    ObjectRequestBuilder, ObjectResponse, TextRequest, TextRequestBuilder, TextResponse,
    VideoResponse,
};
