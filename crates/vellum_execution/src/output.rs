//! Output rendering.

use crate::substitute;
use serde::Serialize;
use vellum_core::{AppConfig, DEFAULT_LANGUAGE, ExecutionBag, Localizable, OutputType};

/// One output template filled from the bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedOutput {
    /// Format of `body`
    #[serde(rename = "type")]
    pub output_type: OutputType,
    /// Localized title, empty when untitled
    pub title: String,
    /// Template with references substituted
    pub body: String,
}

/// Render every output template of `app` in `lang`.
///
/// References to artifacts without a text value stay as literal tokens, so a
/// partially run app still renders.
pub fn render_outputs(app: &AppConfig, bag: &ExecutionBag, lang: &str) -> Vec<RenderedOutput> {
    render_outputs_with_fallback(app, bag, lang, DEFAULT_LANGUAGE)
}

/// [`render_outputs`] with an explicit fallback language for titles and
/// templates.
pub fn render_outputs_with_fallback(
    app: &AppConfig,
    bag: &ExecutionBag,
    lang: &str,
    fallback: &str,
) -> Vec<RenderedOutput> {
    let localize = |value: &Localizable<String>| {
        value.resolve(lang, fallback).cloned().unwrap_or_default()
    };
    app.output
        .iter()
        .map(|output| RenderedOutput {
            output_type: output.output_type,
            title: localize(&output.title),
            body: substitute(&localize(&output.template), bag),
        })
        .collect()
}
