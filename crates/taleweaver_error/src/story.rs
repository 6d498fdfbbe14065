//! Story-level errors.

use taleweaver_core::{AttemptRecord, Modality};

/// Story pipeline error conditions.
#[derive(Debug, Clone, PartialEq)]
pub enum StoryErrorKind {
    /// Concept failed validation
    InvalidConcept(String),
    /// A scene could not be generated; the story is aborted
    SceneGenerationFailed {
        /// Scene index
        index: usize,
        /// Cause
        reason: String,
        /// Provider attempts made for the scene
        history: Vec<AttemptRecord>,
    },
    /// An asset could not be generated; recorded on the asset only
    AssetGenerationFailed {
        /// Scene index
        scene_index: usize,
        /// Asset modality
        modality: Modality,
        /// Cause
        reason: String,
    },
    /// Assembled parts break a record invariant
    AssemblyInvariantViolation(String),
}

impl std::fmt::Display for StoryErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoryErrorKind::InvalidConcept(msg) => write!(f, "Invalid concept: {}", msg),
            StoryErrorKind::SceneGenerationFailed {
                index,
                reason,
                history,
            } => {
                write!(f, "Scene {} generation failed: {}", index, reason)?;
                if !history.is_empty() {
                    let providers: Vec<&str> = history.iter().map(|a| a.provider.as_str()).collect();
                    write!(f, " (attempts: {})", providers.join(", "))?;
                }
                Ok(())
            }
            StoryErrorKind::AssetGenerationFailed {
                scene_index,
                modality,
                reason,
            } => write!(
                f,
                "Scene {} {} generation failed: {}",
                scene_index, modality, reason
            ),
            StoryErrorKind::AssemblyInvariantViolation(msg) => {
                write!(f, "Assembly invariant violated: {}", msg)
            }
        }
    }
}

/// Story error with source location tracking.
///
/// # Examples
///
/// ```
/// use taleweaver_error::{StoryError, StoryErrorKind};
///
/// let err = StoryError::new(StoryErrorKind::InvalidConcept("plot is too short".into()));
/// assert!(err.is_fatal());
/// assert!(format!("{}", err).contains("plot is too short"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Story Error: {} at line {} in {}", kind, line, file)]
pub struct StoryError {
    /// The kind of error that occurred
    pub kind: StoryErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StoryError {
    /// Create a new StoryError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoryErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether the error aborts the story.
    pub fn is_fatal(&self) -> bool {
        !matches!(self.kind, StoryErrorKind::AssetGenerationFailed { .. })
    }
}
