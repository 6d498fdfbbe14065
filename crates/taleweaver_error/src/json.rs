//! JSON error types.

/// Failure to read or write a JSON document (concept files, story packages).
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("JSON Error: {} at line {} in {}", message, line, file)]
pub struct JsonError {
    /// The underlying error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl JsonError {
    /// Creates a JSON error at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use taleweaver_error::JsonError;
    ///
    /// let err = JsonError::new("expected `characters` to be an object");
    /// assert!(err.message.contains("characters"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for JsonError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(err.to_string())
    }
}
