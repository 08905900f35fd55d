//! Readiness checks for single-action runs.

use serde::Serialize;
use tracing::debug;
use vellum_core::{
    ActionData, ActionType, DEFAULT_LANGUAGE, ExecutionBag, is_valid_artifact_filename,
};

use crate::variables::extract_references;

/// Whether an action can run against the current bag.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Playability {
    /// True iff `missing_dependencies` is empty
    pub is_playable: bool,
    /// Referenced artifacts with no text value in the bag, in prompt order
    pub missing_dependencies: Vec<String>,
}

impl Playability {
    fn from_missing(missing_dependencies: Vec<String>) -> Self {
        Self {
            is_playable: missing_dependencies.is_empty(),
            missing_dependencies,
        }
    }
}

/// Artifacts an action reads when it runs in `lang`.
///
/// For generation actions these are the references in the localized prompt.
/// File actions take no prompt; `writeFile` depends on its `source` artifact
/// when one is configured.
pub fn action_dependencies(action: &ActionData, lang: &str) -> Vec<String> {
    action_dependencies_with_fallback(action, lang, DEFAULT_LANGUAGE)
}

/// [`action_dependencies`] resolving the prompt with an explicit fallback
/// language.
pub fn action_dependencies_with_fallback(
    action: &ActionData,
    lang: &str,
    fallback: &str,
) -> Vec<String> {
    match action.action_type {
        ActionType::ReadFile => Vec::new(),
        ActionType::WriteFile => action
            .config_str("source")
            .filter(|source| is_valid_artifact_filename(source))
            .map(|source| vec![source.to_string()])
            .unwrap_or_default(),
        _ => action
            .prompt
            .resolve(lang, fallback)
            .map(|prompt| extract_references(prompt))
            .unwrap_or_default(),
    }
}

/// Check whether every artifact the action references has a text value.
///
/// Never mutates the bag.
///
/// # Examples
///
/// ```
/// use vellum_core::{ActionData, ActionType, BagEntry, ExecutionBag};
/// use vellum_execution::check_playable;
///
/// let action = ActionData::new(ActionType::GenerateText, "story.md")
///     .with_prompt_text("Tell a story about @name.md");
/// let mut bag = ExecutionBag::new();
///
/// let blocked = check_playable(&action, &bag, "en-US");
/// assert!(!blocked.is_playable);
/// assert_eq!(blocked.missing_dependencies, vec!["name.md".to_string()]);
///
/// bag.insert("name.md", BagEntry::text("Ana"));
/// assert!(check_playable(&action, &bag, "en-US").is_playable);
/// ```
pub fn check_playable(action: &ActionData, bag: &ExecutionBag, lang: &str) -> Playability {
    check_playable_with_fallback(action, bag, lang, DEFAULT_LANGUAGE)
}

/// [`check_playable`] resolving the prompt with an explicit fallback language.
pub fn check_playable_with_fallback(
    action: &ActionData,
    bag: &ExecutionBag,
    lang: &str,
    fallback: &str,
) -> Playability {
    let missing: Vec<String> = action_dependencies_with_fallback(action, lang, fallback)
        .into_iter()
        .filter(|name| !bag.has_text(name))
        .collect();

    debug!(
        action = %action.filename,
        lang,
        missing = missing.len(),
        "Checked action dependencies"
    );
    Playability::from_missing(missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vellum_core::{BagEntry, Localizable};

    #[test]
    fn test_no_references_is_playable() {
        let action = ActionData::new(ActionType::GenerateText, "a.md").with_prompt_text("Hello");
        let result = check_playable(&action, &ExecutionBag::new(), "en-US");
        assert_eq!(result, Playability::from_missing(Vec::new()));
        assert!(result.is_playable);
    }

    #[test]
    fn test_uses_prompt_for_requested_language() {
        let action = ActionData::new(ActionType::GenerateText, "a.md").with_prompt(
            Localizable::from_iter([
                ("en-US", "About @name.md".to_string()),
                ("pt-BR", "Sobre @nome.md".to_string()),
            ]),
        );
        let mut bag = ExecutionBag::new();
        bag.insert("name.md", BagEntry::text("Ana"));

        assert!(check_playable(&action, &bag, "en-US").is_playable);
        assert!(check_playable(&action, &bag, "de-DE").is_playable);
        assert_eq!(
            check_playable(&action, &bag, "pt-BR").missing_dependencies,
            vec!["nome.md"]
        );
        // A pt-BR deployment falls back to the pt-BR prompt, not en-US
        assert_eq!(
            check_playable_with_fallback(&action, &bag, "de-DE", "pt-BR").missing_dependencies,
            vec!["nome.md"]
        );
    }

    #[test]
    fn test_entry_without_text_is_missing() {
        let action = ActionData::new(ActionType::GenerateText, "a.md")
            .with_prompt_text("Describe @cover.png");
        let mut bag = ExecutionBag::new();
        bag.insert("cover.png", BagEntry::file("media/cover.png", None));

        let before = bag.clone();
        assert!(!check_playable(&action, &bag, "en-US").is_playable);
        assert_eq!(bag, before);
    }

    #[test]
    fn test_write_file_depends_on_source() {
        let action = ActionData::new(ActionType::WriteFile, "saved.txt")
            .with_config_value("path", "out/story.md")
            .with_config_value("source", "story.md");
        let bag = ExecutionBag::new();
        assert_eq!(
            check_playable(&action, &bag, "en-US").missing_dependencies,
            vec!["story.md"]
        );

        let literal = ActionData::new(ActionType::WriteFile, "saved.txt")
            .with_config_value("path", "out/note.md")
            .with_config_value("content", "@story.md is literal here");
        assert!(check_playable(&literal, &bag, "en-US").is_playable);
    }

    #[test]
    fn test_read_file_has_no_dependencies() {
        let action = ActionData::new(ActionType::ReadFile, "notes.txt")
            .with_prompt_text("@ignored.md")
            .with_config_value("path", "notes.txt");
        assert!(check_playable(&action, &ExecutionBag::new(), "en-US").is_playable);
    }
}
