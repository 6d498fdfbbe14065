//! Provider attempt history.

use crate::RequestClass;
use serde::{Deserialize, Serialize};

/// Classified reason a provider attempt failed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    /// Provider asked us to slow down.
    RateLimited,
    /// Call exceeded its timeout.
    Timeout,
    /// Provider cannot serve the request.
    ProviderUnavailable,
    /// Content failed format or schema checks.
    InvalidResponse,
}

/// Result of one attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// Provider answered and the answer was accepted.
    Succeeded,
    /// Attempt failed.
    Failed {
        /// Failure classification
        kind: FailureKind,
        /// Failure detail
        message: String,
    },
}

/// One provider attempt made on behalf of a logical request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    /// Request class.
    pub class: RequestClass,
    /// What was being generated (e.g. `scene 2`, `scene 0 image`).
    pub target: String,
    /// Provider name.
    pub provider: String,
    /// Outcome.
    pub outcome: AttemptOutcome,
    /// Wall-clock duration of the attempt.
    pub elapsed_ms: u64,
}

impl AttemptRecord {
    /// True when the attempt succeeded.
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, AttemptOutcome::Succeeded)
    }

    /// Failure kind, if the attempt failed.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match &self.outcome {
            AttemptOutcome::Failed { kind, .. } => Some(*kind),
            AttemptOutcome::Succeeded => None,
        }
    }
}

impl std::fmt::Display for AttemptRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.outcome {
            AttemptOutcome::Succeeded => write!(f, "{} via {}: ok", self.target, self.provider),
            AttemptOutcome::Failed { kind, message } => {
                write!(f, "{} via {}: {} ({})", self.target, self.provider, kind, message)
            }
        }
    }
}
