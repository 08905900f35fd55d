//! Output templates that present an app's results.

use crate::Localizable;
use serde::{Deserialize, Serialize};

/// Format of a rendered output.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputType {
    /// HTML fragment
    #[display("html")]
    Html,
    /// Markdown document
    #[default]
    #[display("markdown")]
    Markdown,
    /// Plain text
    #[display("text")]
    Text,
}

/// A template whose `@name.ext` references are filled from the bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputTemplate {
    /// Output format
    #[serde(rename = "type", default)]
    pub output_type: OutputType,
    /// Heading shown above the output
    #[serde(default)]
    pub title: Localizable<String>,
    /// Template body
    #[serde(default)]
    pub template: Localizable<String>,
}

impl OutputTemplate {
    /// Create a markdown output with a body in the default language.
    pub fn markdown(template: impl Into<String>) -> Self {
        Self {
            output_type: OutputType::Markdown,
            title: Localizable::new(),
            template: Localizable::single(crate::DEFAULT_LANGUAGE, template.into()),
        }
    }
}
