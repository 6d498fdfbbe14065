//! Per-request delegation state.

use crate::Candidate;
use std::time::Duration;
use taleweaver_core::{FailureKind, RequestClass};
use taleweaver_rate_limit::BackoffSchedule;
use tracing::trace;

/// Attempts allowed on one candidate after timeouts, regardless of budget.
const TIMEOUT_ATTEMPTS: u32 = 2;

/// What to do next for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextStep {
    /// Call `provider` after waiting `delay`.
    Attempt {
        /// Provider name
        provider: String,
        /// Backoff to wait first
        delay: Duration,
    },
    /// No attempts remain.
    Exhausted,
}

/// Fallback state of one logical request.
///
/// Every call to [`next`](Self::next) that returns an attempt counts against
/// the candidate's budget and the request's attempt limit, whether or not a
/// failure is recorded for it afterwards.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use taleweaver_core::{FailureKind, RequestClass};
/// use taleweaver_delegation::{Candidate, DelegationPlan, NextStep};
/// use taleweaver_rate_limit::BackoffSchedule;
///
/// let mut plan = DelegationPlan::new(
///     RequestClass::Image,
///     vec![Candidate::new("painter", 2), Candidate::new("sketcher", 1)],
///     8,
///     BackoffSchedule::none(),
/// );
///
/// assert!(matches!(plan.next(), NextStep::Attempt { provider, .. } if provider == "painter"));
/// plan.record_failure(FailureKind::ProviderUnavailable);
/// assert!(matches!(plan.next(), NextStep::Attempt { provider, .. } if provider == "sketcher"));
/// plan.record_failure(FailureKind::InvalidResponse);
/// assert_eq!(plan.next(), NextStep::Exhausted);
/// ```
#[derive(Debug, Clone)]
pub struct DelegationPlan {
    class: RequestClass,
    candidates: Vec<Candidate>,
    limit: u32,
    backoff: BackoffSchedule,
    current: usize,
    attempts_on_current: u32,
    transient_streak: u32,
    total_attempts: u32,
    pending_delay: Duration,
}

impl DelegationPlan {
    /// Creates a plan over already-filtered candidates.
    pub fn new(
        class: RequestClass,
        candidates: Vec<Candidate>,
        limit: u32,
        backoff: BackoffSchedule,
    ) -> Self {
        Self {
            class,
            candidates,
            limit,
            backoff,
            current: 0,
            attempts_on_current: 0,
            transient_streak: 0,
            total_attempts: 0,
            pending_delay: Duration::ZERO,
        }
    }

    /// Request class the plan serves.
    pub fn class(&self) -> RequestClass {
        self.class
    }

    /// True when no candidate was eligible at all.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Attempts handed out so far.
    pub fn total_attempts(&self) -> u32 {
        self.total_attempts
    }

    /// Candidate currently being tried.
    pub fn current(&self) -> Option<&Candidate> {
        self.candidates.get(self.current)
    }

    /// Next provider to try, or exhaustion.
    pub fn next(&mut self) -> NextStep {
        if self.total_attempts >= self.limit {
            trace!(class = %self.class, limit = self.limit, "Attempt limit reached");
            return NextStep::Exhausted;
        }
        let Some(candidate) = self.candidates.get(self.current) else {
            return NextStep::Exhausted;
        };
        let provider = candidate.name.clone();
        self.attempts_on_current += 1;
        self.total_attempts += 1;
        NextStep::Attempt {
            provider,
            delay: std::mem::take(&mut self.pending_delay),
        }
    }

    /// Records the outcome of the last attempt as a failure.
    pub fn record_failure(&mut self, kind: FailureKind) {
        let Some(budget) = self.current().map(|c| c.budget) else {
            return;
        };
        match kind {
            FailureKind::RateLimited => {
                self.schedule_backoff();
                if self.attempts_on_current >= budget {
                    self.advance();
                }
            }
            FailureKind::Timeout => {
                self.schedule_backoff();
                if self.attempts_on_current >= budget.min(TIMEOUT_ATTEMPTS) {
                    self.advance();
                }
            }
            FailureKind::InvalidResponse => {
                self.transient_streak = 0;
                self.pending_delay = Duration::ZERO;
                if self.attempts_on_current >= budget {
                    self.advance();
                }
            }
            FailureKind::ProviderUnavailable => {
                self.pending_delay = Duration::ZERO;
                self.advance();
            }
        }
    }

    fn schedule_backoff(&mut self) {
        self.pending_delay = self.backoff.delay(self.transient_streak);
        self.transient_streak += 1;
    }

    fn advance(&mut self) {
        self.current += 1;
        self.attempts_on_current = 0;
        self.transient_streak = 0;
        trace!(
            class = %self.class,
            next = ?self.current().map(|c| c.name.as_str()),
            "Advancing to next candidate"
        );
    }
}
