//! App definition validation errors.

/// Problems found while validating an app definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ValidationErrorKind {
    /// Artifact filename does not match `name.ext`
    #[display("Invalid artifact filename: '{}'", _0)]
    InvalidFilename(String),
    /// Two artifacts share the same filename
    #[display("Duplicate artifact filename: '{}'", _0)]
    DuplicateFilename(String),
    /// An action references an artifact that no input or earlier action produces
    #[display("Action '{}' references unknown artifact '@{}'", action, reference)]
    UnknownReference {
        /// Output filename of the referencing action
        action: String,
        /// Referenced artifact filename
        reference: String,
    },
}

/// Validation error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    /// The specific validation failure
    pub kind: ValidationErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new validation error with caller location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
