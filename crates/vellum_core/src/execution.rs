//! Per-app execution state: the bag plus per-action status.

use crate::ExecutionBag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Lifecycle of one action within a run.
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
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    /// Not attempted in the current run
    #[default]
    #[display("idle")]
    Idle,
    /// Generation call in flight
    #[display("loading")]
    Loading,
    /// Output written to the bag
    #[display("complete")]
    Complete,
    /// Failed; see the execution error
    #[display("error")]
    Error,
}

/// The live execution state of an app.
///
/// Persisted with the app definition so reopening restores the last
/// entered inputs and generated outputs without re-running anything.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
    /// Artifact values
    #[serde(default)]
    pub bag: ExecutionBag,
    /// Status per action id
    #[serde(default)]
    pub per_action_status: BTreeMap<Uuid, ActionStatus>,
    /// Message of the failure that ended the last run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Non-fatal notices per action id from the last time it ran
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub warnings: BTreeMap<Uuid, Vec<String>>,
}

impl Execution {
    /// Create an empty execution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Status of an action; never-run actions are idle.
    pub fn status(&self, action_id: &Uuid) -> ActionStatus {
        self.per_action_status
            .get(action_id)
            .copied()
            .unwrap_or_default()
    }

    /// Record an action's status.
    pub fn set_status(&mut self, action_id: Uuid, status: ActionStatus) {
        self.per_action_status.insert(action_id, status);
    }

    /// Set every listed action back to idle and clear the run error.
    pub fn reset<'a>(&mut self, action_ids: impl IntoIterator<Item = &'a Uuid>) {
        for id in action_ids {
            self.per_action_status.insert(*id, ActionStatus::Idle);
            self.warnings.remove(id);
        }
        self.error = None;
    }

    /// Warnings recorded for an action.
    pub fn warnings_for(&self, action_id: &Uuid) -> &[String] {
        self.warnings
            .get(action_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Turn actions left `loading` by an abandoned run back to `idle`.
    ///
    /// Returns how many were reset. Loaders call this on every stored
    /// execution they read.
    pub fn settle_in_flight(&mut self) -> usize {
        let mut settled = 0;
        for status in self.per_action_status.values_mut() {
            if *status == ActionStatus::Loading {
                *status = ActionStatus::Idle;
                settled += 1;
            }
        }
        settled
    }

    /// Forget status and warnings of actions that no longer exist.
    pub fn retain_actions(&mut self, live: &[Uuid]) {
        self.per_action_status.retain(|id, _| live.contains(id));
        self.warnings.retain(|id, _| live.contains(id));
    }
}
