//! User-facing input fields.

use crate::Localizable;
use serde::{Deserialize, Serialize};

/// Kind of value an input field collects.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    /// Free text
    #[display("text")]
    Text,
    /// Uploaded or generated image, stored by path
    #[display("image")]
    Image,
    /// One of a fixed set of options
    #[display("select")]
    Select,
    /// Arbitrary uploaded file, stored by path
    #[display("file")]
    File,
    /// Uploaded or recorded audio, stored by path
    #[display("audio")]
    Audio,
}

impl InputType {
    /// Whether values of this type are file paths rather than text.
    pub fn is_file_backed(&self) -> bool {
        matches!(self, InputType::Image | InputType::File | InputType::Audio)
    }
}

/// One choice of a `select` input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Value written to the bag when chosen
    pub value: String,
    /// Label shown to the user
    #[serde(default)]
    pub label: Localizable<String>,
}

/// A typed input field of an app.
///
/// The `filename` is the field's identity and the bag key its value is
/// stored under, so other prompts can reference it as `@filename`.
///
/// # Examples
///
/// ```
/// use vellum_core::{InputField, InputType};
///
/// let field = InputField::new("name.md", InputType::Text, "Your name");
/// assert_eq!(field.filename, "name.md");
/// assert!(!field.required);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputField {
    /// Artifact filename, unique within the app
    pub filename: String,
    /// Kind of value collected
    #[serde(rename = "type")]
    pub input_type: InputType,
    /// Field label
    #[serde(default)]
    pub title: Localizable<String>,
    /// Whether a value must be supplied before running
    #[serde(default)]
    pub required: bool,
    /// Hint shown in an empty field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<Localizable<String>>,
    /// Choices for `select` inputs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
}

impl InputField {
    /// Create an optional field with a title in the default language.
    pub fn new(
        filename: impl Into<String>,
        input_type: InputType,
        title: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            input_type,
            title: Localizable::single(crate::DEFAULT_LANGUAGE, title.into()),
            required: false,
            placeholder: None,
            options: None,
        }
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}
