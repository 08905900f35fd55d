//! Localizable values and the single resolver every lookup goes through.

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// Language used when a caller does not name a fallback.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// A value that may differ per language, keyed by language code.
///
/// Keys keep their insertion order, both in memory and through JSON
/// serialization, because resolution falls back to the first key.
/// An empty map is the normal "unset" state.
///
/// # Examples
///
/// ```
/// use vellum_core::Localizable;
///
/// let mut title = Localizable::single("en-US", "Story".to_string());
/// title.insert("pt-BR", "História".to_string());
///
/// assert_eq!(title.resolve("pt-BR", "en-US").map(String::as_str), Some("História"));
/// assert_eq!(title.resolve("de-DE", "en-US").map(String::as_str), Some("Story"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Localizable<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for Localizable<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> Localizable<T> {
    /// Create an empty (unset) value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a value with a single language.
    pub fn single(lang: impl Into<String>, value: T) -> Self {
        Self {
            entries: vec![(lang.into(), value)],
        }
    }

    /// Set the value for a language.
    ///
    /// Replacing an existing language keeps its original position.
    pub fn insert(&mut self, lang: impl Into<String>, value: T) -> Option<T> {
        let lang = lang.into();
        match self.entries.iter_mut().find(|(key, _)| *key == lang) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((lang, value));
                None
            }
        }
    }

    /// Remove the value for a language.
    pub fn remove(&mut self, lang: &str) -> Option<T> {
        let position = self.entries.iter().position(|(key, _)| key == lang)?;
        Some(self.entries.remove(position).1)
    }

    /// Exact lookup, no fallback.
    pub fn get(&self, lang: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(key, _)| key == lang)
            .map(|(_, value)| value)
    }

    /// Whether at least one language has a value.
    pub fn is_set(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Whether no language has a value.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of languages with a value.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Language codes in insertion order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// `(language, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Resolve to a single value for `lang`.
    ///
    /// Lookup order: exact `lang`, then `fallback`, then the first language
    /// in insertion order. Returns `None` only when nothing is set; a missing
    /// translation is never an error.
    pub fn resolve(&self, lang: &str, fallback: &str) -> Option<&T> {
        self.get(lang)
            .or_else(|| self.get(fallback))
            .or_else(|| self.entries.first().map(|(_, value)| value))
    }

    /// [`resolve`](Self::resolve) with [`DEFAULT_LANGUAGE`] as the fallback.
    pub fn resolve_or_default(&self, lang: &str) -> Option<&T> {
        self.resolve(lang, DEFAULT_LANGUAGE)
    }
}

/// Resolve a possibly-absent localizable value.
///
/// An absent value behaves exactly like an empty one.
pub fn resolve<'a, T>(
    value: Option<&'a Localizable<T>>,
    lang: &str,
    fallback: &str,
) -> Option<&'a T> {
    value.and_then(|value| value.resolve(lang, fallback))
}

impl<K: Into<String>, T> FromIterator<(K, T)> for Localizable<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (lang, value) in iter {
            out.insert(lang, value);
        }
        out
    }
}

impl<T: Serialize> Serialize for Localizable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (lang, value) in &self.entries {
            map.serialize_entry(lang, value)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Localizable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LocalizableVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for LocalizableVisitor<T> {
            type Value = Localizable<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of language codes to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut out = Localizable::new();
                while let Some((lang, value)) = access.next_entry::<String, T>()? {
                    out.insert(lang, value);
                }
                Ok(out)
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(Localizable::new())
            }
        }

        deserializer.deserialize_any(LocalizableVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_empty_is_none() {
        let value: Localizable<String> = Localizable::new();
        assert_eq!(value.resolve("pt-BR", DEFAULT_LANGUAGE), None);
        assert_eq!(resolve::<String>(None, "pt-BR", DEFAULT_LANGUAGE), None);
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let value = Localizable::single("en-US", "Hi".to_string());
        assert_eq!(value.resolve_or_default("pt-BR").map(String::as_str), Some("Hi"));
    }

    #[test]
    fn test_resolve_falls_back_to_first_available() {
        let value = Localizable::single("fr-FR", "Bonjour".to_string());
        assert_eq!(
            value.resolve("pt-BR", "en-US").map(String::as_str),
            Some("Bonjour")
        );
    }

    #[test]
    fn test_exact_match_wins_over_fallback() {
        let value: Localizable<&str> = [("en-US", "Hi"), ("pt-BR", "Oi")].into_iter().collect();
        assert_eq!(value.resolve("pt-BR", "en-US"), Some(&"Oi"));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut value: Localizable<u32> = [("fr-FR", 1), ("en-US", 2)].into_iter().collect();
        assert_eq!(value.insert("fr-FR", 3), Some(1));
        assert_eq!(value.languages().collect::<Vec<_>>(), vec!["fr-FR", "en-US"]);
        assert_eq!(value.resolve("de-DE", "es-ES"), Some(&3));
    }

    #[test]
    fn test_json_preserves_insertion_order() {
        let json = r#"{"fr-FR":"Bonjour","en-US":"Hello"}"#;
        let value: Localizable<String> = serde_json::from_str(json).unwrap();
        assert_eq!(value.languages().collect::<Vec<_>>(), vec!["fr-FR", "en-US"]);
        assert_eq!(value.resolve("pt-BR", "es-ES").map(String::as_str), Some("Bonjour"));
        assert_eq!(serde_json::to_string(&value).unwrap(), json);
    }

    #[test]
    fn test_null_deserializes_as_unset() {
        let value: Localizable<String> = serde_json::from_str("null").unwrap();
        assert!(value.is_empty());
    }
}
