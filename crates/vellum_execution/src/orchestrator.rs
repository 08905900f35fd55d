//! Run control for an app's ordered action list.

use crate::{
    ActionExecutor, Playability, RenderedOutput, check_playable_with_fallback,
    render_outputs_with_fallback, substitute,
};
use derive_getters::Getters;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use vellum_core::{ActionData, ActionStatus, AppConfig, BagEntry, DEFAULT_LANGUAGE, Execution};
use vellum_error::{ExecutionError, ExecutionErrorKind, VellumResult};
use vellum_interface::{FileStore, GenerationService};
use vellum_storage::AppRepository;

/// The action that stopped a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct ActionFailure {
    /// Position in the action list
    index: usize,
    /// Action id
    action_id: Uuid,
    /// Output filename of the action
    filename: String,
    /// Message also stored as the execution error
    message: String,
}

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    /// Actions that completed, in order
    completed: Vec<Uuid>,
    /// The failure that ended the run, if any
    failure: Option<ActionFailure>,
    /// Actions never reached because the run halted
    skipped: Vec<Uuid>,
}

impl RunReport {
    /// Whether every attempted action completed.
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Owns an app and its execution state and runs its actions in order.
///
/// All mutation goes through `&mut self`, so at most one run or input edit
/// touches the bag at a time. A failing action is recorded in the execution
/// state and the returned [`RunReport`]; it is never returned as `Err`.
///
/// Dropping a run future mid-call abandons that generation call and leaves
/// the action `loading` until the next run resets it. Loading a saved app
/// turns such actions back to `idle`.
pub struct ExecutionOrchestrator {
    app: AppConfig,
    executor: ActionExecutor,
    repository: AppRepository,
    language: String,
    fallback_language: String,
}

impl ExecutionOrchestrator {
    /// Orchestrator for `app`, persisting through `files`.
    ///
    /// Runs in the app's selected language.
    pub fn new(
        app: AppConfig,
        generation: Arc<dyn GenerationService>,
        files: Arc<dyn FileStore>,
    ) -> Self {
        let language = app.selected_language.clone();
        Self {
            executor: ActionExecutor::new(generation, files.clone()),
            repository: AppRepository::new(files),
            app,
            language,
            fallback_language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Replace the executor, e.g. to set default models or extra handlers.
    pub fn with_executor(mut self, executor: ActionExecutor) -> Self {
        self.executor = executor;
        self
    }

    /// Replace the repository used by [`save`](Self::save).
    pub fn with_repository(mut self, repository: AppRepository) -> Self {
        self.repository = repository;
        self
    }

    /// Language used when a prompt, title or template has no entry for the
    /// current language. Defaults to [`DEFAULT_LANGUAGE`].
    pub fn with_fallback_language(mut self, lang: impl Into<String>) -> Self {
        self.fallback_language = lang.into();
        self
    }

    /// Load a saved app from the default `apps/` prefix and restore its last
    /// execution.
    pub async fn open(
        id: Uuid,
        generation: Arc<dyn GenerationService>,
        files: Arc<dyn FileStore>,
    ) -> VellumResult<Self> {
        let repository = AppRepository::new(files.clone());
        Self::open_with(repository, id, generation, files).await
    }

    /// Load a saved app through `repository`, which is kept for later saves.
    ///
    /// Actions saved mid-call come back `idle`.
    #[tracing::instrument(
        skip(repository, generation, files),
        fields(backend = files.backend_name())
    )]
    pub async fn open_with(
        repository: AppRepository,
        id: Uuid,
        generation: Arc<dyn GenerationService>,
        files: Arc<dyn FileStore>,
    ) -> VellumResult<Self> {
        let app = repository.load(&id).await?;
        info!(
            actions = app.actions.len(),
            entries = app.last_execution.bag.len(),
            "Opened app"
        );
        Ok(Self::new(app, generation, files).with_repository(repository))
    }

    /// Save the app, including the current execution state.
    pub async fn save(&self) -> VellumResult<()> {
        self.repository.save(&self.app).await
    }

    /// Replace in-memory state with the saved document.
    ///
    /// On failure the in-memory state is left untouched.
    pub async fn reload(&mut self) -> VellumResult<()> {
        let app = self.repository.load(&self.app.id).await?;
        self.language = app.selected_language.clone();
        self.app = app;
        Ok(())
    }

    /// The app.
    pub fn app(&self) -> &AppConfig {
        &self.app
    }

    /// The app, for editing its definition.
    pub fn app_mut(&mut self) -> &mut AppConfig {
        &mut self.app
    }

    /// Consume the orchestrator, returning the app.
    pub fn into_app(self) -> AppConfig {
        self.app
    }

    /// Current execution state.
    pub fn execution(&self) -> &Execution {
        &self.app.last_execution
    }

    /// The executor.
    pub fn executor(&self) -> &ActionExecutor {
        &self.executor
    }

    /// Language prompts are localized in.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Language used when the current one has no entry.
    pub fn fallback_language(&self) -> &str {
        &self.fallback_language
    }

    /// Switch the language used for prompts, titles and new bag entries.
    pub fn set_language(&mut self, lang: impl Into<String>) {
        let lang = lang.into();
        debug!(lang = %lang, "Switching language");
        self.app.selected_language = lang.clone();
        self.language = lang;
    }

    /// The action at `index`.
    pub fn action(&self, index: usize) -> VellumResult<&ActionData> {
        self.app
            .actions
            .get(index)
            .ok_or_else(|| ExecutionError::new(ExecutionErrorKind::ActionNotFound(index)).into())
    }

    /// Whether the action at `index` has every artifact it references.
    pub fn is_playable(&self, index: usize) -> VellumResult<Playability> {
        let action = self.action(index)?;
        Ok(check_playable_with_fallback(
            action,
            &self.app.last_execution.bag,
            &self.language,
            &self.fallback_language,
        ))
    }

    /// Status of the action at `index`.
    pub fn status(&self, index: usize) -> VellumResult<ActionStatus> {
        let action = self.action(index)?;
        Ok(self.app.last_execution.status(&action.id))
    }

    /// Current bag entry for an artifact.
    pub fn bag_entry(&self, filename: &str) -> Option<&BagEntry> {
        self.app.last_execution.bag.get(filename)
    }

    /// The prompt the action at `index` would be sent right now.
    pub fn resolved_prompt(&self, index: usize) -> VellumResult<String> {
        let action = self.action(index)?;
        Ok(self.prompt_for(action))
    }

    /// Set the text value of a declared input.
    ///
    /// The entry is tagged with the current language.
    pub fn set_input_value(
        &mut self,
        filename: &str,
        value: impl Into<String>,
    ) -> VellumResult<()> {
        self.require_input(filename)?;
        let entry = BagEntry::text(value).with_language(self.language.clone());
        self.app.last_execution.bag.insert(filename, entry);
        Ok(())
    }

    /// Point a file-backed input (image, audio, file) at a stored file.
    ///
    /// The location doubles as the text value so prompts can reference it.
    pub fn set_input_file(
        &mut self,
        filename: &str,
        path: impl Into<String>,
    ) -> VellumResult<()> {
        self.require_input(filename)?;
        let path = path.into();
        let entry = BagEntry::file(path.clone(), Some(path)).with_language(self.language.clone());
        self.app.last_execution.bag.insert(filename, entry);
        Ok(())
    }

    /// Clear a user-entered input value.
    pub fn remove_input_value(&mut self, filename: &str) -> VellumResult<Option<BagEntry>> {
        self.require_input(filename)?;
        Ok(self.app.last_execution.bag.remove(filename))
    }

    /// Render the app's output templates from the current bag.
    pub fn render(&self) -> Vec<RenderedOutput> {
        render_outputs_with_fallback(
            &self.app,
            &self.app.last_execution.bag,
            &self.language,
            &self.fallback_language,
        )
    }

    /// Run a single action ("Play").
    ///
    /// The action runs only if every referenced artifact has a value;
    /// otherwise it is marked `error` with a missing-dependency message and
    /// the service is not called.
    ///
    /// # Errors
    ///
    /// Only an out-of-range `index`. Action failures are in the report.
    #[tracing::instrument(skip(self), fields(app_id = %self.app.id, lang = %self.language))]
    pub async fn run_action(&mut self, index: usize) -> VellumResult<RunReport> {
        let action = self.action(index)?.clone();
        let mut report = RunReport::default();
        self.app.last_execution.reset([&action.id]);

        let playability = check_playable_with_fallback(
            &action,
            &self.app.last_execution.bag,
            &self.language,
            &self.fallback_language,
        );
        if !playability.is_playable {
            let kind = ExecutionErrorKind::MissingDependency(playability.missing_dependencies);
            warn!(action = %action.filename, reason = %kind, "Action not playable");
            self.record_failure(index, &action, kind.to_string(), &mut report);
            return Ok(report);
        }

        self.run_step(index, &action, &mut report).await;
        Ok(report)
    }

    /// Run every action in order, halting at the first failure.
    ///
    /// All statuses are reset to `idle` and the previous error cleared
    /// first. Actions after a failure stay `idle` and are listed as
    /// skipped.
    #[tracing::instrument(
        skip(self),
        fields(app_id = %self.app.id, lang = %self.language, actions = self.app.actions.len())
    )]
    pub async fn run_all(&mut self) -> VellumResult<RunReport> {
        let actions = self.app.actions.clone();
        let mut report = RunReport::default();
        self.app
            .last_execution
            .reset(actions.iter().map(|action| &action.id));
        info!("Starting run");

        for (index, action) in actions.iter().enumerate() {
            if !self.run_step(index, action, &mut report).await {
                report.skipped = actions[index + 1..].iter().map(|a| a.id).collect();
                break;
            }
        }

        info!(
            completed = report.completed.len(),
            skipped = report.skipped.len(),
            success = report.is_success(),
            "Run finished"
        );
        Ok(report)
    }

    /// Localized prompt with references substituted; empty for file actions.
    fn prompt_for(&self, action: &ActionData) -> String {
        if action.action_type.is_file_action() {
            return String::new();
        }
        let localized = action
            .prompt
            .resolve(&self.language, &self.fallback_language)
            .map(String::as_str)
            .unwrap_or_default();
        substitute(localized, &self.app.last_execution.bag)
    }

    /// Run one action and record the result. Returns whether it completed.
    async fn run_step(
        &mut self,
        index: usize,
        action: &ActionData,
        report: &mut RunReport,
    ) -> bool {
        let prompt = self.prompt_for(action);
        self.app
            .last_execution
            .set_status(action.id, ActionStatus::Loading);
        debug!(index, action = %action.filename, "Running action");

        let result = self
            .executor
            .execute(action, &prompt, &self.app.last_execution.bag, &self.language)
            .await;

        match result {
            Ok(outcome) => {
                let execution = &mut self.app.last_execution;
                execution.bag.insert(action.filename.clone(), outcome.entry);
                if !outcome.warnings.is_empty() {
                    for warning in &outcome.warnings {
                        warn!(
                            action = %action.filename,
                            warning = %warning,
                            "Action completed with warning"
                        );
                    }
                    execution.warnings.insert(action.id, outcome.warnings);
                }
                execution.set_status(action.id, ActionStatus::Complete);
                report.completed.push(action.id);
                info!(index, action = %action.filename, "Action complete");
                true
            }
            Err(err) => {
                error!(index, action = %action.filename, error = %err, "Action failed");
                self.record_failure(index, action, err.user_message(), report);
                false
            }
        }
    }

    fn record_failure(
        &mut self,
        index: usize,
        action: &ActionData,
        message: String,
        report: &mut RunReport,
    ) {
        let execution = &mut self.app.last_execution;
        execution.set_status(action.id, ActionStatus::Error);
        execution.error = Some(message.clone());
        report.failure = Some(ActionFailure {
            index,
            action_id: action.id,
            filename: action.filename.clone(),
            message,
        });
    }

    fn require_input(&self, filename: &str) -> VellumResult<()> {
        if self.app.input(filename).is_none() {
            return Err(
                ExecutionError::new(ExecutionErrorKind::InputNotFound(filename.to_string())).into(),
            );
        }
        Ok(())
    }
}

impl std::fmt::Debug for ExecutionOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionOrchestrator")
            .field("app_id", &self.app.id)
            .field("language", &self.language)
            .field("fallback_language", &self.fallback_language)
            .field("executor", &self.executor)
            .field("repository", &self.repository)
            .finish()
    }
}
