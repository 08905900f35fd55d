//! Single-action execution.

use crate::{HandlerContext, HandlerRegistry, ModelDefaults};
use std::sync::Arc;
use vellum_core::{ActionData, BagEntry, ExecutionBag};
use vellum_error::{ExecutionError, ExecutionErrorKind, VellumErrorKind, VellumResult};
use vellum_interface::{FileStore, GenerationService};

/// Result of running one action.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActionOutcome {
    /// Entry to store under the action's output filename
    pub entry: BagEntry,
    /// Non-fatal notices, such as a schema fallback
    pub warnings: Vec<String>,
}

impl ActionOutcome {
    /// Outcome with no warnings.
    pub fn new(entry: BagEntry) -> Self {
        Self {
            entry,
            warnings: Vec::new(),
        }
    }

    /// Add a warning.
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

/// Dispatches actions to their handlers.
///
/// The executor never writes the bag; it returns the entry and leaves the
/// write to the caller. Errors from the generation service or file store
/// are reported as [`ExecutionErrorKind::GenerationFailed`] naming the
/// action, so one failing action never looks like a caller error.
pub struct ActionExecutor {
    generation: Arc<dyn GenerationService>,
    files: Arc<dyn FileStore>,
    registry: HandlerRegistry,
    models: ModelDefaults,
}

impl ActionExecutor {
    /// Executor with the built-in handlers and no default models.
    pub fn new(generation: Arc<dyn GenerationService>, files: Arc<dyn FileStore>) -> Self {
        Self {
            generation,
            files,
            registry: HandlerRegistry::with_builtin_handlers(),
            models: ModelDefaults::default(),
        }
    }

    /// Replace the handler registry.
    pub fn with_registry(mut self, registry: HandlerRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Set the models used when an action names none.
    pub fn with_models(mut self, models: ModelDefaults) -> Self {
        self.models = models;
        self
    }

    /// The handler registry.
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// The default models.
    pub fn models(&self) -> &ModelDefaults {
        &self.models
    }

    /// Run one action.
    ///
    /// `prompt` is the localized, substituted prompt; file actions ignore it.
    /// The returned entry is tagged with `lang`.
    ///
    /// # Errors
    ///
    /// Returns an [`ExecutionError`] when no handler serves the action type,
    /// when the action is misconfigured or its source is missing, and when
    /// the service fails or returns an unusable payload.
    #[tracing::instrument(
        skip(self, action, prompt, bag),
        fields(
            action = %action.filename,
            action_type = %action.action_type,
            prompt_len = prompt.len()
        )
    )]
    pub async fn execute(
        &self,
        action: &ActionData,
        prompt: &str,
        bag: &ExecutionBag,
        lang: &str,
    ) -> VellumResult<ActionOutcome> {
        let handler = self.registry.get(action.action_type).ok_or_else(|| {
            ExecutionError::new(ExecutionErrorKind::HandlerNotRegistered(
                action.action_type.to_string(),
            ))
        })?;

        let ctx = HandlerContext {
            action,
            prompt,
            bag,
            generation: self.generation.as_ref(),
            files: self.files.as_ref(),
            models: &self.models,
        };

        match handler.handle(&ctx).await {
            Ok(mut outcome) => {
                outcome.entry.language = Some(lang.to_string());
                tracing::debug!(warnings = outcome.warnings.len(), "Action produced entry");
                Ok(outcome)
            }
            Err(err) => {
                if matches!(err.kind(), VellumErrorKind::Execution(_)) {
                    return Err(err);
                }
                tracing::error!(error = %err, "Action failed");
                Err(ExecutionError::new(ExecutionErrorKind::GenerationFailed {
                    action: action.filename.clone(),
                    message: err.user_message(),
                })
                .into())
            }
        }
    }
}

impl std::fmt::Debug for ActionExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionExecutor")
            .field("provider", &self.generation.provider_name())
            .field("files", &self.files.backend_name())
            .field("registry", &self.registry)
            .field("models", &self.models)
            .finish()
    }
}
