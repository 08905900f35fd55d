//! Action execution error types.

/// Specific error conditions raised while executing app actions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ExecutionErrorKind {
    /// Action prompt references artifacts that are not in the bag yet
    #[display("Missing dependencies: {}", _0.join(", "))]
    MissingDependency(Vec<String>),
    /// The generation service rejected the call
    #[display("Action '{}' failed: {}", action, message)]
    GenerationFailed {
        /// Action title or output filename
        action: String,
        /// Error message
        message: String,
    },
    /// The generation service answered but the payload cannot become a bag entry
    #[display("Action '{}' returned an unusable payload: {}", action, message)]
    UnusablePayload {
        /// Action title or output filename
        action: String,
        /// Error message
        message: String,
    },
    /// Action parameters are missing or malformed
    #[display("Action '{}' has invalid configuration: {}", action, message)]
    InvalidConfig {
        /// Action title or output filename
        action: String,
        /// Error message
        message: String,
    },
    /// No action exists at the requested position
    #[display("No action at index {}", _0)]
    ActionNotFound(usize),
    /// No input field is declared with the given filename
    #[display("No input declared for '{}'", _0)]
    InputNotFound(String),
    /// No handler is registered for the action type
    #[display("No handler registered for action type '{}'", _0)]
    HandlerNotRegistered(String),
}

/// Error type for action execution.
///
/// # Examples
///
/// ```
/// use vellum_error::{ExecutionError, ExecutionErrorKind};
///
/// let kind = ExecutionErrorKind::MissingDependency(vec!["name.md".to_string()]);
/// let err = ExecutionError::new(kind);
/// assert!(format!("{}", err).contains("name.md"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Execution Error: {} at line {} in {}", kind, line, file)]
pub struct ExecutionError {
    /// The specific error condition
    pub kind: ExecutionErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ExecutionError {
    /// Create a new ExecutionError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ExecutionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
