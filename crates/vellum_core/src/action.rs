//! Actions: the ordered generation steps of an app.

use crate::{DEFAULT_LANGUAGE, Localizable};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

/// What an action does.
///
/// The set is closed; the executor keeps exactly one handler per variant.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
pub enum ActionType {
    /// Free-form text generation
    #[serde(rename = "generateText")]
    #[display("generateText")]
    GenerateText,
    /// Structured generation against a JSON Schema
    #[serde(rename = "generateJSON")]
    #[display("generateJSON")]
    GenerateJson,
    /// Image generation
    #[serde(rename = "generateImage")]
    #[display("generateImage")]
    GenerateImage,
    /// Audio generation
    #[serde(rename = "generateAudio")]
    #[display("generateAudio")]
    GenerateAudio,
    /// Video generation
    #[serde(rename = "generateVideo")]
    #[display("generateVideo")]
    GenerateVideo,
    /// Read a document from the file store
    #[serde(rename = "readFile")]
    #[display("readFile")]
    ReadFile,
    /// Write a document to the file store
    #[serde(rename = "writeFile")]
    #[display("writeFile")]
    WriteFile,
}

impl ActionType {
    /// Extension given to this action's output artifact.
    pub fn extension(&self) -> &'static str {
        match self {
            ActionType::GenerateText => "md",
            ActionType::GenerateJson => "json",
            ActionType::GenerateImage => "png",
            ActionType::GenerateAudio => "mp3",
            ActionType::GenerateVideo => "mp4",
            ActionType::ReadFile | ActionType::WriteFile => "txt",
        }
    }

    /// File actions skip prompt localization and variable substitution.
    pub fn is_file_action(&self) -> bool {
        matches!(self, ActionType::ReadFile | ActionType::WriteFile)
    }

    /// Whether the output is a media file addressed by path.
    pub fn is_media(&self) -> bool {
        matches!(
            self,
            ActionType::GenerateImage | ActionType::GenerateAudio | ActionType::GenerateVideo
        )
    }
}

/// One step of an app's pipeline.
///
/// `config` holds type-specific parameters such as `model`, `schema`,
/// `temperature`, or for file actions `path`, `content` and `source`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_setters::Setters)]
#[serde(rename_all = "camelCase")]
#[setters(prefix = "with_")]
pub struct ActionData {
    /// Stable identity, survives reordering
    #[setters(skip)]
    pub id: Uuid,
    /// What the action does
    #[serde(rename = "type")]
    #[setters(skip)]
    pub action_type: ActionType,
    /// Display title
    #[serde(default)]
    pub title: Localizable<String>,
    /// Output artifact name, the bag key the result is written under
    #[setters(skip)]
    pub filename: String,
    /// Prompt with `@name.ext` references
    #[serde(default)]
    pub prompt: Localizable<String>,
    /// Type-specific parameters
    #[serde(default)]
    #[setters(skip)]
    pub config: Map<String, JsonValue>,
}

impl ActionData {
    /// Create an action with a fresh id, empty title, prompt and config.
    pub fn new(action_type: ActionType, filename: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            action_type,
            title: Localizable::new(),
            filename: filename.into(),
            prompt: Localizable::new(),
            config: Map::new(),
        }
    }

    /// Set the prompt for the default language.
    pub fn with_prompt_text(mut self, prompt: impl Into<String>) -> Self {
        self.prompt.insert(DEFAULT_LANGUAGE, prompt.into());
        self
    }

    /// Set one config parameter.
    pub fn with_config_value(
        mut self,
        key: impl Into<String>,
        value: impl Into<JsonValue>,
    ) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// A config parameter as a string, if present and a string.
    pub fn config_str(&self, key: &str) -> Option<&str> {
        self.config.get(key).and_then(JsonValue::as_str)
    }

    /// Title for `lang`, or the output filename when untitled.
    pub fn display_name(&self, lang: &str) -> String {
        self.title
            .resolve_or_default(lang)
            .filter(|title| !title.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| self.filename.clone())
    }
}

/// Lowercase ASCII slug of a title, `_` between words.
///
/// Returns `"output"` if nothing usable remains.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('_');
            }
            pending_separator = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }
    if slug.is_empty() {
        "output".to_string()
    } else {
        slug
    }
}

/// Derive an output filename from a title and action type.
///
/// `taken` reports whether a name is already used by another artifact; on
/// collision `_2`, `_3`, ... is appended to the stem.
///
/// # Examples
///
/// ```
/// use vellum_core::{ActionType, derive_output_filename};
///
/// let taken = ["story.md".to_string()];
/// let name = derive_output_filename("Story", ActionType::GenerateText, |n| {
///     taken.iter().any(|t| t == n)
/// });
/// assert_eq!(name, "story_2.md");
/// ```
pub fn derive_output_filename(
    title: &str,
    action_type: ActionType,
    taken: impl Fn(&str) -> bool,
) -> String {
    let stem = slugify(title);
    let extension = action_type.extension();
    let candidate = format!("{}.{}", stem, extension);
    if !taken(&candidate) {
        return candidate;
    }
    (2..)
        .map(|n| format!("{}_{}.{}", stem, n, extension))
        .find(|name| !taken(name))
        .unwrap_or(candidate)
}
