//! Variable substitution for `@name.ext` artifact references.

use tracing::debug;
use vellum_core::{ExecutionBag, scan_references};

pub use vellum_core::extract_references;

/// Replace every `@name.ext` token whose artifact has a text value.
///
/// Tokens without a bag entry, or whose entry has no text value, are left
/// exactly as written. Every occurrence resolves against the same bag, and
/// inserted text is never scanned again, so a value containing `@other.md`
/// stays literal.
///
/// # Examples
///
/// ```
/// use vellum_core::{BagEntry, ExecutionBag};
/// use vellum_execution::substitute;
///
/// let mut bag = ExecutionBag::new();
/// bag.insert("name.md", BagEntry::text("Ana"));
///
/// assert_eq!(
///     substitute("Tell a story about @name.md and @pet.md", &bag),
///     "Tell a story about Ana and @pet.md"
/// );
/// ```
pub fn substitute(prompt: &str, bag: &ExecutionBag) -> String {
    let mut resolved = String::with_capacity(prompt.len());
    let mut cursor = 0;

    for reference in scan_references(prompt) {
        let Some(value) = bag.text_value(reference.filename) else {
            debug!(token = reference.token, "Leaving unresolved reference");
            continue;
        };
        resolved.push_str(&prompt[cursor..reference.start]);
        resolved.push_str(value);
        cursor = reference.end;
        debug!(token = reference.token, len = value.len(), "Substituted reference");
    }

    resolved.push_str(&prompt[cursor..]);
    resolved
}

/// Referenced artifacts that `substitute` would leave unresolved.
pub fn unresolved_references(prompt: &str, bag: &ExecutionBag) -> Vec<String> {
    extract_references(prompt)
        .into_iter()
        .filter(|name| !bag.has_text(name))
        .collect()
}
