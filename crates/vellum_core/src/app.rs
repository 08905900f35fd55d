//! App definitions.

use crate::{
    ActionData, ActionType, DEFAULT_LANGUAGE, Execution, InputField, Localizable, OutputTemplate,
    derive_output_filename, extract_references, is_valid_artifact_filename,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;
use vellum_error::{ValidationError, ValidationErrorKind, VellumResult};

/// A complete app: inputs, ordered actions, output templates, and the last
/// execution state. Stored as one JSON document keyed by `id`.
///
/// # Examples
///
/// ```
/// use vellum_core::{ActionType, AppConfig, InputField, InputType};
///
/// let mut app = AppConfig::new("Story maker");
/// app.add_input(InputField::new("name.md", InputType::Text, "Name")).unwrap();
/// let action = app.add_action(ActionType::GenerateText, "Story");
/// assert_eq!(action.filename, "story.md");
/// assert!(app.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Document key
    pub id: Uuid,
    /// App name
    #[serde(default)]
    pub name: Localizable<String>,
    /// Layout template identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Style identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Input fields
    #[serde(default)]
    pub inputs: Vec<InputField>,
    /// Actions, in execution order
    #[serde(default)]
    pub actions: Vec<ActionData>,
    /// Output templates
    #[serde(default)]
    pub output: Vec<OutputTemplate>,
    /// Languages the app is authored in
    #[serde(default = "default_languages")]
    pub supported_languages: Vec<String>,
    /// Language currently selected in the editor
    #[serde(default = "default_language")]
    pub selected_language: String,
    /// Execution state from the last session
    #[serde(default)]
    pub last_execution: Execution,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_languages() -> Vec<String> {
    vec![default_language()]
}

impl AppConfig {
    /// Create an empty app with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: Localizable::single(DEFAULT_LANGUAGE, name.into()),
            template: None,
            style: None,
            inputs: Vec::new(),
            actions: Vec::new(),
            output: Vec::new(),
            supported_languages: default_languages(),
            selected_language: default_language(),
            last_execution: Execution::new(),
        }
    }

    /// Input field with the given filename.
    pub fn input(&self, filename: &str) -> Option<&InputField> {
        self.inputs.iter().find(|input| input.filename == filename)
    }

    /// Position of the action with the given id.
    pub fn action_index(&self, id: &Uuid) -> Option<usize> {
        self.actions.iter().position(|action| action.id == *id)
    }

    /// Every artifact filename the app declares: inputs, then action outputs.
    pub fn artifact_names(&self) -> impl Iterator<Item = &str> {
        self.inputs
            .iter()
            .map(|input| input.filename.as_str())
            .chain(self.actions.iter().map(|action| action.filename.as_str()))
    }

    /// Whether some input or action already produces `filename`.
    pub fn is_artifact_name_taken(&self, filename: &str) -> bool {
        self.artifact_names().any(|name| name == filename)
    }

    /// Add an input field.
    ///
    /// # Errors
    ///
    /// Fails if the filename is not `name.ext` or is already used.
    pub fn add_input(&mut self, field: InputField) -> VellumResult<()> {
        if !is_valid_artifact_filename(&field.filename) {
            return Err(
                ValidationError::new(ValidationErrorKind::InvalidFilename(field.filename)).into(),
            );
        }
        if self.is_artifact_name_taken(&field.filename) {
            return Err(
                ValidationError::new(ValidationErrorKind::DuplicateFilename(field.filename))
                    .into(),
            );
        }
        debug!(filename = %field.filename, input_type = %field.input_type, "Adding input");
        self.inputs.push(field);
        Ok(())
    }

    /// Remove an input field. Its bag value, if any, is left to the caller.
    pub fn remove_input(&mut self, filename: &str) -> Option<InputField> {
        let position = self.inputs.iter().position(|i| i.filename == filename)?;
        Some(self.inputs.remove(position))
    }

    /// Append a new action whose output filename is derived from `title`.
    pub fn add_action(&mut self, action_type: ActionType, title: impl Into<String>) -> &ActionData {
        let title = title.into();
        let filename =
            derive_output_filename(&title, action_type, |name| self.is_artifact_name_taken(name));
        debug!(filename = %filename, action_type = %action_type, "Adding action");
        let action = ActionData::new(action_type, filename)
            .with_title(Localizable::single(self.selected_language.clone(), title));
        self.actions.push(action);
        &self.actions[self.actions.len() - 1]
    }

    /// Remove an action and its recorded status.
    pub fn remove_action(&mut self, id: &Uuid) -> Option<ActionData> {
        let position = self.action_index(id)?;
        let removed = self.actions.remove(position);
        let live: Vec<Uuid> = self.actions.iter().map(|a| a.id).collect();
        self.last_execution.retain_actions(&live);
        Some(removed)
    }

    /// Move an action to a new position.
    ///
    /// Returns `false` if either index is out of range.
    pub fn move_action(&mut self, from: usize, to: usize) -> bool {
        if from >= self.actions.len() || to >= self.actions.len() {
            return false;
        }
        let action = self.actions.remove(from);
        self.actions.insert(to, action);
        true
    }

    /// Check the definition for problems that would break execution.
    ///
    /// Every artifact filename must be `name.ext` and unique, and every prompt,
    /// in every language, may only reference inputs or earlier actions.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> VellumResult<()> {
        let mut seen = HashSet::new();
        for name in self.artifact_names() {
            if !is_valid_artifact_filename(name) {
                return Err(
                    ValidationError::new(ValidationErrorKind::InvalidFilename(name.to_string()))
                        .into(),
                );
            }
            if !seen.insert(name) {
                return Err(ValidationError::new(ValidationErrorKind::DuplicateFilename(
                    name.to_string(),
                ))
                .into());
            }
        }

        let mut available: HashSet<&str> =
            self.inputs.iter().map(|i| i.filename.as_str()).collect();
        for action in &self.actions {
            for (_, prompt) in action.prompt.iter() {
                if let Some(reference) = extract_references(prompt)
                    .into_iter()
                    .find(|r| !available.contains(r.as_str()))
                {
                    return Err(ValidationError::new(ValidationErrorKind::UnknownReference {
                        action: action.filename.clone(),
                        reference,
                    })
                    .into());
                }
            }
            available.insert(action.filename.as_str());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InputType;
    use vellum_error::VellumErrorKind;

    fn validation_kind(app: &AppConfig) -> ValidationErrorKind {
        match app.validate().unwrap_err().kind() {
            VellumErrorKind::Validation(e) => e.kind.clone(),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_add_action_avoids_input_names() {
        let mut app = AppConfig::new("Demo");
        app.add_input(InputField::new("story.md", InputType::Text, "Seed"))
            .unwrap();
        let action = app.add_action(ActionType::GenerateText, "Story");
        assert_eq!(action.filename, "story_2.md");
    }

    #[test]
    fn test_add_input_rejects_bad_and_duplicate_names() {
        let mut app = AppConfig::new("Demo");
        assert!(app
            .add_input(InputField::new("no extension", InputType::Text, "x"))
            .is_err());
        app.add_input(InputField::new("name.md", InputType::Text, "Name"))
            .unwrap();
        assert!(app
            .add_input(InputField::new("name.md", InputType::Text, "Again"))
            .is_err());
    }

    #[test]
    fn test_validate_rejects_forward_reference() {
        let mut app = AppConfig::new("Demo");
        app.actions.push(
            ActionData::new(ActionType::GenerateText, "first.md")
                .with_prompt_text("Use @second.md"),
        );
        app.actions
            .push(ActionData::new(ActionType::GenerateText, "second.md").with_prompt_text("Hi"));

        assert_eq!(
            validation_kind(&app),
            ValidationErrorKind::UnknownReference {
                action: "first.md".to_string(),
                reference: "second.md".to_string(),
            }
        );

        app.move_action(1, 0);
        app.actions[0].prompt = Localizable::single("en-US", "Hi".to_string());
        app.actions[1].prompt = Localizable::single("en-US", "Use @second.md".to_string());
        assert!(app.validate().is_ok());
    }

    #[test]
    fn test_remove_action_drops_its_status() {
        let mut app = AppConfig::new("Demo");
        let id = app.add_action(ActionType::GenerateText, "Story").id;
        app.last_execution
            .set_status(id, crate::ActionStatus::Complete);
        app.remove_action(&id).unwrap();
        assert!(app.last_execution.per_action_status.is_empty());
    }
}
