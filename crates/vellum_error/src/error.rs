//! Top-level error wrapper types.

use crate::{
    BuilderError, ConfigError, ExecutionError, GenerationError, JsonError, StorageError,
    ValidationError,
};

/// Every error condition the Vellum crates can raise.
///
/// # Examples
///
/// ```
/// use vellum_error::{VellumError, JsonError};
///
/// let json_err = JsonError::new("expected value at line 1");
/// let err: VellumError = json_err.into();
/// assert!(format!("{}", err).contains("JSON Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum VellumErrorKind {
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
    /// Storage error (persistence failure)
    #[from(StorageError)]
    Storage(StorageError),
    /// Generation service error
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Action execution error
    #[from(ExecutionError)]
    Execution(ExecutionError),
    /// App definition validation error
    #[from(ValidationError)]
    Validation(ValidationError),
}

/// Vellum error with kind discrimination.
///
/// # Examples
///
/// ```
/// use vellum_error::{VellumError, VellumResult, ConfigError};
///
/// fn might_fail() -> VellumResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Vellum Error: {}", _0)]
pub struct VellumError(Box<VellumErrorKind>);

impl VellumError {
    /// Create a new error from a kind.
    pub fn new(kind: VellumErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &VellumErrorKind {
        &self.0
    }

    /// Short message suitable for showing next to a failed action.
    ///
    /// Strips the location suffix that the detailed `Display` output carries.
    pub fn user_message(&self) -> String {
        match self.kind() {
            VellumErrorKind::Json(e) => e.message.clone(),
            VellumErrorKind::Config(e) => e.message.clone(),
            VellumErrorKind::Builder(e) => e.kind().to_string(),
            VellumErrorKind::Storage(e) => e.kind.to_string(),
            VellumErrorKind::Generation(e) => e.kind.to_string(),
            VellumErrorKind::Execution(e) => e.kind.to_string(),
            VellumErrorKind::Validation(e) => e.kind.to_string(),
        }
    }

    /// Whether this is a storage lookup for a key that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind(), VellumErrorKind::Storage(e) if e.is_not_found())
    }
}

// Generic From implementation for any type that converts to VellumErrorKind
impl<T> From<T> for VellumError
where
    T: Into<VellumErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Vellum operations.
///
/// # Examples
///
/// ```
/// use vellum_error::{VellumResult, JsonError};
///
/// fn parse() -> VellumResult<String> {
///     Err(JsonError::new("unexpected end of input"))?
/// }
/// ```
pub type VellumResult<T> = std::result::Result<T, VellumError>;
