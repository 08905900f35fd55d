//! Artifact reference grammar.
//!
//! Prompts and output templates refer to artifacts as `@name.ext`, where
//! `name` is letters, digits or underscores and `ext` is letters or digits.
//! Artifact filenames themselves are the same `name.ext` without the `@`.

use regex::Regex;
use std::sync::LazyLock;

static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@([A-Za-z0-9_]+\.[A-Za-z0-9]+)").expect("Valid artifact reference regex")
});

static FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_]+\.[A-Za-z0-9]+$").expect("Valid artifact filename regex")
});

/// One `@name.ext` occurrence inside a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactReference<'a> {
    /// The full token including the `@`
    pub token: &'a str,
    /// The bare artifact filename, the bag key
    pub filename: &'a str,
    /// Byte offset of the `@`
    pub start: usize,
    /// Byte offset one past the token
    pub end: usize,
}

/// Every reference in `text`, left to right, duplicates included.
pub fn scan_references(text: &str) -> impl Iterator<Item = ArtifactReference<'_>> {
    REFERENCE.captures_iter(text).filter_map(|caps| {
        let whole = caps.get(0)?;
        let name = caps.get(1)?;
        Some(ArtifactReference {
            token: whole.as_str(),
            filename: name.as_str(),
            start: whole.start(),
            end: whole.end(),
        })
    })
}

/// Distinct referenced filenames in order of first occurrence.
///
/// # Examples
///
/// ```
/// use vellum_core::extract_references;
///
/// let refs = extract_references("Compare @a.md with @b.md, then @a.md again");
/// assert_eq!(refs, vec!["a.md".to_string(), "b.md".to_string()]);
/// ```
pub fn extract_references(text: &str) -> Vec<String> {
    let mut seen = Vec::<String>::new();
    for reference in scan_references(text) {
        if !seen.iter().any(|name| name == reference.filename) {
            seen.push(reference.filename.to_string());
        }
    }
    seen
}

/// Whether `filename` is a legal artifact name (`name.ext`).
pub fn is_valid_artifact_filename(filename: &str) -> bool {
    FILENAME.is_match(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_reports_offsets() {
        let refs: Vec<_> = scan_references("hi @name.md!").collect();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].token, "@name.md");
        assert_eq!(refs[0].filename, "name.md");
        assert_eq!((refs[0].start, refs[0].end), (3, 11));
    }

    #[test]
    fn test_trailing_punctuation_is_not_part_of_token() {
        assert_eq!(extract_references("About @story.md."), vec!["story.md"]);
    }

    #[test]
    fn test_bare_at_sign_is_ignored() {
        assert!(extract_references("email me @ home or @name").is_empty());
    }

    #[test]
    fn test_filename_validation() {
        assert!(is_valid_artifact_filename("name.md"));
        assert!(is_valid_artifact_filename("cover_image_2.png"));
        assert!(!is_valid_artifact_filename("name"));
        assert!(!is_valid_artifact_filename("my-name.md"));
        assert!(!is_valid_artifact_filename("a.b.md"));
        assert!(!is_valid_artifact_filename("@name.md"));
    }
}
