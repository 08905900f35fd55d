//! The execution bag: the shared namespace of named artifacts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Current value of one artifact.
///
/// Text artifacts carry `text_value`; media artifacts carry `path` and
/// optionally a `text_value` that later prompts see when they reference it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BagEntry {
    /// Text substituted for `@name.ext` references
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_value: Option<String>,
    /// Location of a file-backed value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Language the value was entered or generated in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl BagEntry {
    /// An entry holding text.
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            text_value: Some(value.into()),
            ..Self::default()
        }
    }

    /// An entry pointing at a file, with optional caption text.
    pub fn file(path: impl Into<String>, caption: Option<String>) -> Self {
        Self {
            text_value: caption,
            path: Some(path.into()),
            language: None,
        }
    }

    /// Tag the entry with a language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Mapping from artifact filename to its current value.
///
/// Writes replace whole entries; nothing is ever merged field by field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionBag {
    entries: BTreeMap<String, BagEntry>,
}

impl ExecutionBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry for an artifact.
    pub fn get(&self, filename: &str) -> Option<&BagEntry> {
        self.entries.get(filename)
    }

    /// Text value for an artifact, if it has one.
    pub fn text_value(&self, filename: &str) -> Option<&str> {
        self.entries
            .get(filename)
            .and_then(|entry| entry.text_value.as_deref())
    }

    /// Whether the artifact is usable as a prompt dependency.
    pub fn has_text(&self, filename: &str) -> bool {
        self.text_value(filename).is_some()
    }

    /// Replace the entry for an artifact, returning the previous one.
    pub fn insert(&mut self, filename: impl Into<String>, entry: BagEntry) -> Option<BagEntry> {
        let filename = filename.into();
        debug!(
            filename = %filename,
            has_text = entry.text_value.is_some(),
            has_path = entry.path.is_some(),
            "Writing bag entry"
        );
        self.entries.insert(filename, entry)
    }

    /// Remove the entry for an artifact.
    pub fn remove(&mut self, filename: &str) -> Option<BagEntry> {
        debug!(filename = %filename, "Removing bag entry");
        self.entries.remove(filename)
    }

    /// Whether any entry exists for the artifact.
    pub fn contains(&self, filename: &str) -> bool {
        self.entries.contains_key(filename)
    }

    /// Number of artifacts in the bag.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in filename order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BagEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }
}

impl<K: Into<String>> FromIterator<(K, BagEntry)> for ExecutionBag {
    fn from_iter<I: IntoIterator<Item = (K, BagEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
