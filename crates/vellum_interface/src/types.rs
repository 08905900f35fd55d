//! Request and response types exchanged with a generation service.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use vellum_error::BuilderError;

/// Text generation request.
///
/// # Examples
///
/// ```
/// use vellum_interface::TextRequest;
///
/// let request = TextRequest::builder()
///     .prompt("Tell a story about Ana")
///     .model("gpt-4o-mini")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.prompt, "Tell a story about Ana");
/// assert_eq!(request.temperature, None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(setter(into, strip_option), build_fn(error = "BuilderError"))]
pub struct TextRequest {
    /// Fully resolved prompt
    #[builder(setter(into))]
    pub prompt: String,
    /// Model identifier
    #[builder(default)]
    pub model: Option<String>,
    /// Sampling temperature
    #[builder(default)]
    pub temperature: Option<f32>,
    /// Maximum number of tokens to generate
    #[builder(default)]
    pub max_tokens: Option<u32>,
}

impl TextRequest {
    /// Start building a request.
    pub fn builder() -> TextRequestBuilder {
        TextRequestBuilder::default()
    }
}

/// Structured generation request constrained by a JSON Schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(setter(into, strip_option), build_fn(error = "BuilderError"))]
pub struct ObjectRequest {
    /// Fully resolved prompt
    #[builder(setter(into))]
    pub prompt: String,
    /// JSON Schema the object must satisfy
    #[builder(setter(into))]
    pub schema: JsonValue,
    /// Model identifier
    #[builder(default)]
    pub model: Option<String>,
}

impl ObjectRequest {
    /// Start building a request.
    pub fn builder() -> ObjectRequestBuilder {
        ObjectRequestBuilder::default()
    }
}

/// Image, audio or video generation request.
///
/// `options` carries provider-specific parameters (size, voice, duration,
/// ...) straight from the action config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(setter(into, strip_option), build_fn(error = "BuilderError"))]
pub struct MediaRequest {
    /// Fully resolved prompt
    #[builder(setter(into))]
    pub prompt: String,
    /// Model identifier
    #[builder(default)]
    pub model: Option<String>,
    /// Provider-specific parameters
    #[builder(default)]
    pub options: Map<String, JsonValue>,
}

impl MediaRequest {
    /// Start building a request.
    pub fn builder() -> MediaRequestBuilder {
        MediaRequestBuilder::default()
    }
}

/// Text generation result.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextResponse {
    /// Generated text
    pub text: String,
    /// Where the service stored the text, if it did
    #[serde(default)]
    pub path: Option<String>,
}

/// Structured generation result.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ObjectResponse {
    /// Generated object
    pub object: JsonValue,
    /// Where the service stored the object, if it did
    #[serde(default)]
    pub path: Option<String>,
}

/// Image generation result.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageResponse {
    /// Locations of the generated images
    #[serde(default)]
    pub images: Vec<String>,
    /// Primary stored file
    #[serde(default)]
    pub path: Option<String>,
}

/// Audio generation result.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AudioResponse {
    /// Locations of the generated audio clips
    #[serde(default)]
    pub audios: Vec<String>,
    /// Primary stored file
    #[serde(default)]
    pub path: Option<String>,
}

/// Video generation result.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VideoResponse {
    /// Locations of the generated videos
    #[serde(default)]
    pub videos: Vec<String>,
    /// Primary stored file
    #[serde(default)]
    pub path: Option<String>,
}

/// Uniform view over the three media responses.
pub trait MediaResponse {
    /// Generated media locations.
    fn files(&self) -> &[String];

    /// Primary stored file reported by the service.
    fn stored_path(&self) -> Option<&str>;

    /// The file an artifact should point at: the stored path if reported,
    /// otherwise the first generated location.
    fn primary_file(&self) -> Option<&str> {
        self.stored_path()
            .filter(|path| !path.is_empty())
            .or_else(|| self.files().first().map(String::as_str))
    }
}

impl MediaResponse for ImageResponse {
    fn files(&self) -> &[String] {
        &self.images
    }

    fn stored_path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}

impl MediaResponse for AudioResponse {
    fn files(&self) -> &[String] {
        &self.audios
    }

    fn stored_path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}

impl MediaResponse for VideoResponse {
    fn files(&self) -> &[String] {
        &self.videos
    }

    fn stored_path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}
