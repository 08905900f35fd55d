//! Collaborator traits injected into the execution engine.

use crate::{
    AudioResponse, ImageResponse, MediaRequest, ObjectRequest, ObjectResponse, TextRequest,
    TextResponse, VideoResponse,
};
use async_trait::async_trait;
use vellum_error::{GenerationError, GenerationErrorKind, VellumResult};

/// Core trait that all generation providers implement.
///
/// Each call takes a fully resolved prompt; the engine never sends unresolved
/// `@name.ext` references. Failures are reported as
/// [`GenerationError`](vellum_error::GenerationError) wrapped in
/// [`VellumError`](vellum_error::VellumError).
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Generate free-form text.
    async fn generate_text(&self, req: &TextRequest) -> VellumResult<TextResponse>;

    /// Generate a JSON object satisfying the request schema.
    async fn generate_object(&self, req: &ObjectRequest) -> VellumResult<ObjectResponse>;

    /// Generate one or more images.
    async fn generate_image(&self, req: &MediaRequest) -> VellumResult<ImageResponse>;

    /// Generate speech or other audio.
    async fn generate_audio(&self, req: &MediaRequest) -> VellumResult<AudioResponse>;

    /// Generate a video.
    ///
    /// Providers without video support keep the default, which reports the
    /// service as unavailable.
    async fn generate_video(&self, _req: &MediaRequest) -> VellumResult<VideoResponse> {
        Err(GenerationError::new(GenerationErrorKind::Unavailable(format!(
            "{} does not support video generation",
            self.provider_name()
        )))
        .into())
    }

    /// Provider name (e.g., "openai", "replicate", "mock").
    fn provider_name(&self) -> &'static str;
}

/// Key/value document store addressed by slash-separated paths.
///
/// Used for app persistence and by the `readFile`/`writeFile` actions.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Keys under `prefix`, sorted.
    async fn list(&self, prefix: &str) -> VellumResult<Vec<String>>;

    /// Read a document.
    ///
    /// A missing key is a [`StorageErrorKind::NotFound`](vellum_error::StorageErrorKind::NotFound).
    async fn read(&self, path: &str) -> VellumResult<String>;

    /// Create or replace a document.
    async fn write(&self, path: &str, contents: &str) -> VellumResult<()>;

    /// Delete a document. Deleting a missing key is not an error.
    async fn delete(&self, path: &str) -> VellumResult<()>;

    /// Whether a document exists.
    async fn exists(&self, path: &str) -> VellumResult<bool>;

    /// Backend name for logging (e.g., "filesystem", "memory").
    fn backend_name(&self) -> &'static str;
}
