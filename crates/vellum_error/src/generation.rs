//! Generation service error types.

/// Failure conditions reported by a generation service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GenerationErrorKind {
    /// The service refused the request (bad prompt, policy, quota)
    #[display("Request rejected: {}", _0)]
    Rejected(String),
    /// The service did not answer in time
    #[display("Request timed out: {}", _0)]
    Timeout(String),
    /// The service answered with a payload that cannot be used
    #[display("Invalid response: {}", _0)]
    InvalidResponse(String),
    /// The service could not be reached
    #[display("Service unavailable: {}", _0)]
    Unavailable(String),
}

/// Error raised by a generation service call.
///
/// # Examples
///
/// ```
/// use vellum_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::Timeout("60s".to_string()));
/// assert!(format!("{}", err).contains("timed out"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The specific error condition
    pub kind: GenerationErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
