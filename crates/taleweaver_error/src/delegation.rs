//! Delegation errors.

use taleweaver_core::{AttemptRecord, RequestClass};

/// Why a delegated request produced no value.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum DelegationErrorKind {
    /// Every candidate was tried within its budget, or the attempt ceiling was hit
    #[display("{} generation exhausted after {} attempts", class, attempts)]
    GenerationExhausted {
        /// Request class
        class: RequestClass,
        /// Attempts made
        attempts: u32,
    },
    /// No registered provider supports the class
    #[display("no eligible provider for {}", _0)]
    NoEligibleProvider(RequestClass),
    /// Cancelled between attempts
    #[display("{} generation cancelled after {} attempts", class, attempts)]
    Cancelled {
        /// Request class
        class: RequestClass,
        /// Attempts made before cancellation
        attempts: u32,
    },
}

/// Delegation failure carrying the attempt history that led to it.
///
/// # Examples
///
/// ```
/// use taleweaver_core::RequestClass;
/// use taleweaver_error::{DelegationError, DelegationErrorKind};
///
/// let err = DelegationError::new(
///     DelegationErrorKind::NoEligibleProvider(RequestClass::Audio),
///     Vec::new(),
/// );
/// assert!(format!("{}", err).contains("no eligible provider for audio"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Delegation Error: {} at line {} in {}", kind, line, file)]
pub struct DelegationError {
    /// The kind of error that occurred
    pub kind: DelegationErrorKind,
    /// Every attempt made for the request
    pub history: Vec<AttemptRecord>,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl DelegationError {
    /// Create a new DelegationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DelegationErrorKind, history: Vec<AttemptRecord>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            history,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Attempts made before giving up.
    pub fn attempts(&self) -> u32 {
        self.history.len() as u32
    }

    /// True when the request was cancelled rather than exhausted.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.kind, DelegationErrorKind::Cancelled { .. })
    }

    /// The most recent failed attempt, rendered for logs and error reasons.
    pub fn last_failure(&self) -> Option<String> {
        self.history
            .iter()
            .rev()
            .find(|attempt| !attempt.succeeded())
            .map(ToString::to_string)
    }
}
