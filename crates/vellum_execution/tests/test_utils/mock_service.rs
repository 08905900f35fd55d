//! Mock generation service for testing.

use async_trait::async_trait;
use serde_json::{Value as JsonValue, json};
use std::sync::{Arc, Mutex};
use vellum_error::{GenerationError, GenerationErrorKind, VellumResult};
use vellum_interface::{
    AudioResponse, GenerationService, ImageResponse, MediaRequest, ObjectRequest, ObjectResponse,
    TextRequest, TextResponse, VideoResponse,
};

/// Behavior configuration for text responses.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return the prompt prefixed with `generated: `
    Echo,
    /// Always return the given text
    Success(String),
    /// Always fail with the given error
    Error(GenerationErrorKind),
    /// Fail when the prompt contains `needle`, echo otherwise
    FailWhenPromptContains {
        needle: String,
        error: GenerationErrorKind,
    },
    /// Record the call, then never answer
    Hang,
}

/// One recorded service call.
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    /// Endpoint name: text, object, image, audio or video
    pub endpoint: &'static str,
    pub prompt: String,
    pub model: Option<String>,
    pub schema: Option<JsonValue>,
    pub options: serde_json::Map<String, JsonValue>,
}

/// Mock generation service.
///
/// Records every call and answers text requests per [`MockBehavior`].
/// Objects and media use fixed payloads that tests can override.
pub struct MockGenerationService {
    behavior: MockBehavior,
    object: JsonValue,
    media: Vec<String>,
    media_path: Option<String>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockGenerationService {
    /// Mock that echoes prompts.
    pub fn new_echo() -> Self {
        Self::new_with_behavior(MockBehavior::Echo)
    }

    /// Mock that always returns `text`.
    pub fn new_success(text: impl Into<String>) -> Self {
        Self::new_with_behavior(MockBehavior::Success(text.into()))
    }

    /// Mock that always fails.
    pub fn new_error(error: GenerationErrorKind) -> Self {
        Self::new_with_behavior(MockBehavior::Error(error))
    }

    /// Mock that fails on prompts containing `needle`.
    pub fn new_failing_on(needle: impl Into<String>, error: GenerationErrorKind) -> Self {
        Self::new_with_behavior(MockBehavior::FailWhenPromptContains {
            needle: needle.into(),
            error,
        })
    }

    /// Mock whose text calls never complete.
    #[allow(dead_code)]
    pub fn new_hanging() -> Self {
        Self::new_with_behavior(MockBehavior::Hang)
    }

    /// Mock with custom behavior.
    pub fn new_with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            object: json!({"ok": true}),
            media: vec!["https://media.example/generated-1".to_string()],
            media_path: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Object returned by `generate_object`.
    #[allow(dead_code)]
    pub fn with_object(mut self, object: JsonValue) -> Self {
        self.object = object;
        self
    }

    /// Media list and stored path returned by the media endpoints.
    #[allow(dead_code)]
    pub fn with_media(mut self, media: Vec<String>, path: Option<String>) -> Self {
        self.media = media;
        self.media_path = path;
        self
    }

    /// Every call so far.
    #[allow(dead_code)]
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Prompts sent so far, in order.
    #[allow(dead_code)]
    pub fn prompts(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.prompt).collect()
    }

    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_failure(&self, prompt: &str) -> VellumResult<()> {
        match &self.behavior {
            MockBehavior::Error(kind) => Err(GenerationError::new(kind.clone()).into()),
            MockBehavior::FailWhenPromptContains { needle, error } if prompt.contains(needle) => {
                Err(GenerationError::new(error.clone()).into())
            }
            _ => Ok(()),
        }
    }

    fn media_call(&self, endpoint: &'static str, req: &MediaRequest) -> VellumResult<()> {
        self.record(MockCall {
            endpoint,
            prompt: req.prompt.clone(),
            model: req.model.clone(),
            schema: None,
            options: req.options.clone(),
        });
        self.check_failure(&req.prompt)
    }
}

#[async_trait]
impl GenerationService for MockGenerationService {
    async fn generate_text(&self, req: &TextRequest) -> VellumResult<TextResponse> {
        self.record(MockCall {
            endpoint: "text",
            prompt: req.prompt.clone(),
            model: req.model.clone(),
            schema: None,
            options: Default::default(),
        });
        self.check_failure(&req.prompt)?;
        if matches!(self.behavior, MockBehavior::Hang) {
            std::future::pending::<()>().await;
        }

        let text = match &self.behavior {
            MockBehavior::Success(text) => text.clone(),
            _ => format!("generated: {}", req.prompt),
        };
        Ok(TextResponse { text, path: None })
    }

    async fn generate_object(&self, req: &ObjectRequest) -> VellumResult<ObjectResponse> {
        self.record(MockCall {
            endpoint: "object",
            prompt: req.prompt.clone(),
            model: req.model.clone(),
            schema: Some(req.schema.clone()),
            options: Default::default(),
        });
        self.check_failure(&req.prompt)?;
        Ok(ObjectResponse {
            object: self.object.clone(),
            path: None,
        })
    }

    async fn generate_image(&self, req: &MediaRequest) -> VellumResult<ImageResponse> {
        self.media_call("image", req)?;
        Ok(ImageResponse {
            images: self.media.clone(),
            path: self.media_path.clone(),
        })
    }

    async fn generate_audio(&self, req: &MediaRequest) -> VellumResult<AudioResponse> {
        self.media_call("audio", req)?;
        Ok(AudioResponse {
            audios: self.media.clone(),
            path: self.media_path.clone(),
        })
    }

    async fn generate_video(&self, req: &MediaRequest) -> VellumResult<VideoResponse> {
        self.media_call("video", req)?;
        Ok(VideoResponse {
            videos: self.media.clone(),
            path: self.media_path.clone(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
