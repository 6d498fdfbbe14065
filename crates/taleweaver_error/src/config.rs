//! Configuration error types.

/// Invalid or unreadable configuration.
///
/// `key` names the offending setting when the failure is tied to one.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// What went wrong
    pub message: String,
    /// Dotted path of the offending setting, if known
    pub key: Option<String>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a configuration error at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use taleweaver_error::ConfigError;
    ///
    /// let err = ConfigError::new("configuration file is not valid TOML");
    /// assert!(err.key.is_none());
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            key: None,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Creates an error about one setting.
    ///
    /// # Examples
    ///
    /// ```
    /// use taleweaver_error::ConfigError;
    ///
    /// let err = ConfigError::for_key("story.scene_count", "must be at least 1");
    /// assert_eq!(err.key.as_deref(), Some("story.scene_count"));
    /// assert!(err.message.contains("story.scene_count"));
    /// ```
    #[track_caller]
    pub fn for_key(key: impl Into<String>, message: impl AsRef<str>) -> Self {
        let key = key.into();
        let location = std::panic::Location::caller();
        Self {
            message: format!("{}: {}", key, message.as_ref()),
            key: Some(key),
            line: location.line(),
            file: location.file(),
        }
    }
}
