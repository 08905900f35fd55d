//! Per-type action handlers and the registry the executor dispatches through.
//!
//! Every [`ActionType`] has exactly one handler. A new action type means one
//! new [`ActionHandler`] and one [`HandlerRegistry::register`] call.

use crate::{ActionOutcome, ModelDefaults};
use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};
use vellum_core::{ActionData, ActionType, BagEntry, ExecutionBag};
use vellum_error::{ExecutionError, ExecutionErrorKind, JsonError, VellumResult};
use vellum_interface::{
    FileStore, GenerationService, MediaRequest, MediaResponse, ObjectRequest, TextRequest,
};

/// Config keys consumed by the media handler rather than passed as options.
const MEDIA_RESERVED_KEYS: [&str; 2] = ["model", "caption"];

/// Everything a handler may read while running one action.
pub struct HandlerContext<'a> {
    /// The action being run
    pub action: &'a ActionData,
    /// Localized prompt with references already substituted
    pub prompt: &'a str,
    /// Bag snapshot at the start of the step
    pub bag: &'a ExecutionBag,
    /// Generation provider
    pub generation: &'a dyn GenerationService,
    /// Document store for file actions
    pub files: &'a dyn FileStore,
    /// Fallback models
    pub models: &'a ModelDefaults,
}

impl HandlerContext<'_> {
    /// `config.model`, else the default for this action type.
    fn model(&self) -> Option<String> {
        self.action
            .config_str("model")
            .or_else(|| self.models.for_action(self.action.action_type))
            .map(str::to_string)
    }

    fn invalid_config(&self, message: impl Into<String>) -> ExecutionError {
        ExecutionError::new(ExecutionErrorKind::InvalidConfig {
            action: self.action.filename.clone(),
            message: message.into(),
        })
    }

    fn required_path(&self) -> VellumResult<&str> {
        match self.action.config_str("path") {
            Some(path) if !path.trim().is_empty() => Ok(path),
            _ => Err(self.invalid_config("`path` is required").into()),
        }
    }
}

/// Runs one kind of action.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// The action type this handler serves.
    fn action_type(&self) -> ActionType;

    /// Run the action and produce the entry for its output artifact.
    ///
    /// The returned entry's `language` is set by the executor.
    async fn handle(&self, ctx: &HandlerContext<'_>) -> VellumResult<ActionOutcome>;
}

/// `generateText`: prompt in, text out.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextHandler;

impl TextHandler {
    async fn generate(ctx: &HandlerContext<'_>, model: Option<String>) -> VellumResult<BagEntry> {
        let mut builder = TextRequest::builder();
        builder.prompt(ctx.prompt);
        if let Some(model) = model {
            builder.model(model);
        }
        if let Some(temperature) = ctx.action.config.get("temperature").and_then(JsonValue::as_f64)
        {
            builder.temperature(temperature as f32);
        }
        if let Some(max_tokens) = ctx.action.config.get("maxTokens").and_then(JsonValue::as_u64) {
            builder.max_tokens(u32::try_from(max_tokens).unwrap_or(u32::MAX));
        }
        let request = builder.build()?;

        let response = ctx.generation.generate_text(&request).await?;
        Ok(BagEntry {
            text_value: Some(response.text),
            path: response.path,
            language: None,
        })
    }
}

#[async_trait]
impl ActionHandler for TextHandler {
    fn action_type(&self) -> ActionType {
        ActionType::GenerateText
    }

    async fn handle(&self, ctx: &HandlerContext<'_>) -> VellumResult<ActionOutcome> {
        let entry = Self::generate(ctx, ctx.model()).await?;
        Ok(ActionOutcome::new(entry))
    }
}

/// `generateJSON`: structured output constrained by `config.schema`.
///
/// The schema may be a JSON value or a string holding JSON. A string that
/// does not parse downgrades the step to plain text generation with a
/// warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonHandler;

impl JsonHandler {
    fn schema(action: &ActionData) -> Result<JsonValue, String> {
        match action.config.get("schema") {
            None | Some(JsonValue::Null) => Ok(JsonValue::Object(Map::new())),
            Some(JsonValue::String(raw)) => serde_json::from_str(raw).map_err(|e| e.to_string()),
            Some(schema) => Ok(schema.clone()),
        }
    }
}

#[async_trait]
impl ActionHandler for JsonHandler {
    fn action_type(&self) -> ActionType {
        ActionType::GenerateJson
    }

    async fn handle(&self, ctx: &HandlerContext<'_>) -> VellumResult<ActionOutcome> {
        let schema = match Self::schema(ctx.action) {
            Ok(schema) => schema,
            Err(reason) => {
                warn!(
                    action = %ctx.action.filename,
                    reason = %reason,
                    "Schema does not parse, falling back to text generation"
                );
                let model = ctx
                    .action
                    .config_str("model")
                    .or_else(|| ctx.models.for_action(ActionType::GenerateText))
                    .map(str::to_string);
                let entry = TextHandler::generate(ctx, model).await?;
                return Ok(ActionOutcome::new(entry).with_warning(format!(
                    "Schema is not valid JSON ({}); generated plain text instead",
                    reason
                )));
            }
        };

        let mut builder = ObjectRequest::builder();
        builder.prompt(ctx.prompt).schema(schema);
        if let Some(model) = ctx.model() {
            builder.model(model);
        }
        let request = builder.build()?;

        let response = ctx.generation.generate_object(&request).await?;
        let text = serde_json::to_string(&response.object).map_err(JsonError::from)?;
        Ok(ActionOutcome::new(BagEntry {
            text_value: Some(text),
            path: response.path,
            language: None,
        }))
    }
}

/// `generateImage`, `generateAudio` and `generateVideo`.
///
/// Config keys other than `model` and `caption` are passed to the service as
/// options. The artifact's text value is `config.caption` if set, otherwise
/// the file location, so later prompts can reference the media.
#[derive(Debug, Clone, Copy)]
pub struct MediaHandler {
    action_type: ActionType,
}

impl MediaHandler {
    /// Handler for `generateImage`.
    pub fn image() -> Self {
        Self {
            action_type: ActionType::GenerateImage,
        }
    }

    /// Handler for `generateAudio`.
    pub fn audio() -> Self {
        Self {
            action_type: ActionType::GenerateAudio,
        }
    }

    /// Handler for `generateVideo`.
    pub fn video() -> Self {
        Self {
            action_type: ActionType::GenerateVideo,
        }
    }

    fn entry(ctx: &HandlerContext<'_>, response: &impl MediaResponse) -> VellumResult<BagEntry> {
        let path = response.primary_file().ok_or_else(|| {
            ExecutionError::new(ExecutionErrorKind::UnusablePayload {
                action: ctx.action.filename.clone(),
                message: "service returned no media".to_string(),
            })
        })?;
        debug!(path, files = response.files().len(), "Media generated");

        let caption = ctx
            .action
            .config_str("caption")
            .filter(|caption| !caption.trim().is_empty())
            .unwrap_or(path);
        Ok(BagEntry::file(path, Some(caption.to_string())))
    }
}

#[async_trait]
impl ActionHandler for MediaHandler {
    fn action_type(&self) -> ActionType {
        self.action_type
    }

    async fn handle(&self, ctx: &HandlerContext<'_>) -> VellumResult<ActionOutcome> {
        let options: Map<String, JsonValue> = ctx
            .action
            .config
            .iter()
            .filter(|(key, _)| !MEDIA_RESERVED_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let mut builder = MediaRequest::builder();
        builder.prompt(ctx.prompt).options(options);
        if let Some(model) = ctx.model() {
            builder.model(model);
        }
        let request = builder.build()?;

        let entry = match self.action_type {
            ActionType::GenerateImage => {
                Self::entry(ctx, &ctx.generation.generate_image(&request).await?)?
            }
            ActionType::GenerateAudio => {
                Self::entry(ctx, &ctx.generation.generate_audio(&request).await?)?
            }
            ActionType::GenerateVideo => {
                Self::entry(ctx, &ctx.generation.generate_video(&request).await?)?
            }
            other => {
                return Err(
                    ExecutionError::new(ExecutionErrorKind::HandlerNotRegistered(
                        other.to_string(),
                    ))
                    .into(),
                );
            }
        };
        Ok(ActionOutcome::new(entry))
    }
}

/// `readFile`: loads `config.path` from the file store.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadFileHandler;

#[async_trait]
impl ActionHandler for ReadFileHandler {
    fn action_type(&self) -> ActionType {
        ActionType::ReadFile
    }

    async fn handle(&self, ctx: &HandlerContext<'_>) -> VellumResult<ActionOutcome> {
        let path = ctx.required_path()?;
        let contents = ctx.files.read(path).await?;
        Ok(ActionOutcome::new(BagEntry {
            text_value: Some(contents),
            path: Some(path.to_string()),
            language: None,
        }))
    }
}

/// `writeFile`: stores `config.content`, or the text of the `config.source`
/// artifact, at `config.path`.
///
/// Content is written verbatim; references inside it are not substituted.
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteFileHandler;

#[async_trait]
impl ActionHandler for WriteFileHandler {
    fn action_type(&self) -> ActionType {
        ActionType::WriteFile
    }

    async fn handle(&self, ctx: &HandlerContext<'_>) -> VellumResult<ActionOutcome> {
        let path = ctx.required_path()?;
        let contents = match (
            ctx.action.config_str("content"),
            ctx.action.config_str("source"),
        ) {
            (Some(content), _) => content.to_string(),
            (None, Some(source)) => ctx
                .bag
                .text_value(source)
                .map(str::to_string)
                .ok_or_else(|| {
                    ExecutionError::new(ExecutionErrorKind::MissingDependency(vec![
                        source.to_string(),
                    ]))
                })?,
            (None, None) => {
                return Err(ctx.invalid_config("`content` or `source` is required").into());
            }
        };

        ctx.files.write(path, &contents).await?;
        Ok(ActionOutcome::new(BagEntry {
            text_value: Some(contents),
            path: Some(path.to_string()),
            language: None,
        }))
    }
}

/// Lookup table from action type to handler.
pub struct HandlerRegistry {
    handlers: HashMap<ActionType, Arc<dyn ActionHandler>>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registry with a handler for every built-in action type.
    pub fn with_builtin_handlers() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(TextHandler));
        registry.register(Arc::new(JsonHandler));
        registry.register(Arc::new(MediaHandler::image()));
        registry.register(Arc::new(MediaHandler::audio()));
        registry.register(Arc::new(MediaHandler::video()));
        registry.register(Arc::new(ReadFileHandler));
        registry.register(Arc::new(WriteFileHandler));
        registry
    }

    /// Register a handler.
    ///
    /// Replaces, with a warning, any handler already serving the same type.
    #[tracing::instrument(skip(self, handler), fields(action_type = %handler.action_type()))]
    pub fn register(&mut self, handler: Arc<dyn ActionHandler>) {
        let action_type = handler.action_type();
        if self.handlers.insert(action_type, handler).is_some() {
            warn!("Handler already registered, replaced previous registration");
        } else {
            debug!("Registered handler");
        }
    }

    /// Handler for an action type.
    pub fn get(&self, action_type: ActionType) -> Option<&Arc<dyn ActionHandler>> {
        self.handlers.get(&action_type)
    }

    /// Whether a handler serves the type.
    pub fn contains(&self, action_type: ActionType) -> bool {
        self.handlers.contains_key(&action_type)
    }

    /// Registered action types, sorted.
    pub fn action_types(&self) -> Vec<ActionType> {
        let mut types: Vec<ActionType> = self.handlers.keys().copied().collect();
        types.sort();
        types
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::with_builtin_handlers()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("action_types", &self.action_types())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strum::IntoEnumIterator;

    #[test]
    fn test_builtin_registry_covers_every_action_type() {
        let registry = HandlerRegistry::with_builtin_handlers();
        for action_type in ActionType::iter() {
            let handler = registry.get(action_type).unwrap();
            assert_eq!(handler.action_type(), action_type);
        }
        assert_eq!(registry.len(), ActionType::iter().count());
    }

    #[test]
    fn test_register_replaces_existing_handler() {
        let mut registry = HandlerRegistry::new();
        registry.register(Arc::new(TextHandler));
        registry.register(Arc::new(TextHandler));
        assert_eq!(registry.action_types(), vec![ActionType::GenerateText]);
    }

    #[test]
    fn test_schema_forms() {
        let object = ActionData::new(ActionType::GenerateJson, "a.json")
            .with_config_value("schema", json!({"type": "object"}));
        assert_eq!(JsonHandler::schema(&object).unwrap(), json!({"type": "object"}));

        let string = ActionData::new(ActionType::GenerateJson, "a.json")
            .with_config_value("schema", r#"{"type":"array"}"#);
        assert_eq!(JsonHandler::schema(&string).unwrap(), json!({"type": "array"}));

        let broken = ActionData::new(ActionType::GenerateJson, "a.json")
            .with_config_value("schema", "{not json");
        assert!(JsonHandler::schema(&broken).is_err());

        let absent = ActionData::new(ActionType::GenerateJson, "a.json");
        assert_eq!(JsonHandler::schema(&absent).unwrap(), json!({}));
    }
}
