//! Output error types.

/// Failure writing a story package or asset file.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Output Error: {} ({}) at line {} in {}", message, path, line, file)]
pub struct OutputError {
    /// What went wrong
    pub message: String,
    /// Path being written
    pub path: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl OutputError {
    /// Creates an output error for a path.
    #[track_caller]
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            path: path.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
