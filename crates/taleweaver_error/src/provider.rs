//! Provider adapter errors and retry classification.

use taleweaver_core::{FailureKind, ProviderOutput};

/// Classified provider failure.
///
/// Every adapter maps its transport and API failures onto one of these four
/// kinds; delegation decides what to do next from the kind alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ProviderErrorKind {
    /// Provider asked us to slow down (HTTP 429)
    #[display("Rate limited: {}", _0)]
    RateLimited(String),
    /// Call exceeded its timeout
    #[display("Timed out: {}", _0)]
    Timeout(String),
    /// Provider cannot serve the request (5xx, auth, connect failure)
    #[display("Provider unavailable: {}", _0)]
    ProviderUnavailable(String),
    /// Response was unparseable, of the wrong type, or failed validation
    #[display("Invalid response: {}", _0)]
    InvalidResponse(String),
}

impl ProviderErrorKind {
    /// Failure kind recorded in the attempt history.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            ProviderErrorKind::RateLimited(_) => FailureKind::RateLimited,
            ProviderErrorKind::Timeout(_) => FailureKind::Timeout,
            ProviderErrorKind::ProviderUnavailable(_) => FailureKind::ProviderUnavailable,
            ProviderErrorKind::InvalidResponse(_) => FailureKind::InvalidResponse,
        }
    }

    /// Detail message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            ProviderErrorKind::RateLimited(m)
            | ProviderErrorKind::Timeout(m)
            | ProviderErrorKind::ProviderUnavailable(m)
            | ProviderErrorKind::InvalidResponse(m) => m,
        }
    }

    /// Check if this error type should be retried on the same provider.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ProviderErrorKind::ProviderUnavailable(_))
    }
}

/// Provider error with source location tracking.
///
/// # Examples
///
/// ```
/// use taleweaver_error::{ProviderError, ProviderErrorKind, RetryableError};
///
/// let err = ProviderError::new(ProviderErrorKind::RateLimited("HTTP 429".into()));
/// assert!(err.is_retryable());
/// assert!(format!("{}", err).contains("Rate limited"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Provider Error: {} at line {} in {}", kind, line, file)]
pub struct ProviderError {
    /// The kind of error that occurred
    pub kind: ProviderErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ProviderError {
    /// Create a new ProviderError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ProviderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for an `InvalidResponse` failure.
    #[track_caller]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::InvalidResponse(message.into()))
    }

    /// Shorthand for a `ProviderUnavailable` failure.
    #[track_caller]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::ProviderUnavailable(message.into()))
    }

    /// Failure kind recorded in the attempt history.
    pub fn failure_kind(&self) -> FailureKind {
        self.kind.failure_kind()
    }
}

/// Trait for errors that support retry logic.
///
/// Transient failures (rate limits, timeouts, malformed content) return
/// true; failures that rule out the provider for this request return false.
/// Backoff and budgets come from the delegation configuration, not the error.
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for ProviderError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

/// Result of one provider call.
pub type ProviderResult = Result<ProviderOutput, ProviderError>;
