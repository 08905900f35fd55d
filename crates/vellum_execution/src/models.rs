//! Default model selection per generation kind.

use serde::{Deserialize, Serialize};
use vellum_core::ActionType;

/// Models used when an action's config names none.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelDefaults {
    /// Model for `generateText`
    pub text: Option<String>,
    /// Model for `generateJSON`
    pub object: Option<String>,
    /// Model for `generateImage`
    pub image: Option<String>,
    /// Model for `generateAudio`
    pub audio: Option<String>,
    /// Model for `generateVideo`
    pub video: Option<String>,
}

impl ModelDefaults {
    /// Default model for an action type. File actions have none.
    pub fn for_action(&self, action_type: ActionType) -> Option<&str> {
        let model = match action_type {
            ActionType::GenerateText => &self.text,
            ActionType::GenerateJson => &self.object,
            ActionType::GenerateImage => &self.image,
            ActionType::GenerateAudio => &self.audio,
            ActionType::GenerateVideo => &self.video,
            ActionType::ReadFile | ActionType::WriteFile => return None,
        };
        model.as_deref()
    }
}
