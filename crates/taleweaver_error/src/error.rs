//! Top-level error wrapper types.

use crate::{ConfigError, DelegationError, JsonError, OutputError, ProviderError, StoryError};

/// Every error the engine surfaces.
///
/// # Examples
///
/// ```
/// use taleweaver_error::{OutputError, TaleweaverError};
///
/// let err: TaleweaverError = OutputError::new("out/story.json", "permission denied").into();
/// assert!(format!("{}", err).contains("Output Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum TaleweaverErrorKind {
    /// Provider adapter error
    #[from(ProviderError)]
    Provider(ProviderError),
    /// Delegation exhausted or cancelled
    #[from(DelegationError)]
    Delegation(DelegationError),
    /// Story pipeline error
    #[from(StoryError)]
    Story(StoryError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Output writing error
    #[from(OutputError)]
    Output(OutputError),
}

/// Taleweaver error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Taleweaver Error: {}", _0)]
pub struct TaleweaverError(Box<TaleweaverErrorKind>);

impl TaleweaverError {
    /// Create a new error from a kind.
    pub fn new(kind: TaleweaverErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &TaleweaverErrorKind {
        &self.0
    }

    /// The story error, if this is one.
    pub fn as_story(&self) -> Option<&StoryError> {
        match self.kind() {
            TaleweaverErrorKind::Story(err) => Some(err),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to TaleweaverErrorKind
impl<T> From<T> for TaleweaverError
where
    T: Into<TaleweaverErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Taleweaver operations.
pub type TaleweaverResult<T> = std::result::Result<T, TaleweaverError>;
