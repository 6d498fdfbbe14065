//! Capped exponential backoff.

use std::time::Duration;

/// Delay schedule between consecutive transient failures on one candidate.
///
/// The n-th delay (0-based) is `min(base × 2^n, cap)`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use taleweaver_rate_limit::BackoffSchedule;
///
/// let schedule = BackoffSchedule::new(Duration::from_millis(500), Duration::from_secs(8));
/// assert_eq!(schedule.delay(0), Duration::from_millis(500));
/// assert_eq!(schedule.delay(2), Duration::from_millis(2000));
/// assert_eq!(schedule.delay(10), Duration::from_secs(8));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffSchedule {
    base: Duration,
    cap: Duration,
}

impl BackoffSchedule {
    /// Creates a schedule. A cap below the base is raised to the base.
    pub fn new(base: Duration, cap: Duration) -> Self {
        Self {
            base,
            cap: cap.max(base),
        }
    }

    /// Schedule with no delay at all.
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Delay before the attempt following the `n`-th consecutive failure.
    pub fn delay(&self, n: u32) -> Duration {
        let factor = 1u32.checked_shl(n).unwrap_or(u32::MAX);
        self.base
            .checked_mul(factor)
            .map_or(self.cap, |delay| delay.min(self.cap))
    }

    /// Initial delay.
    pub fn base(&self) -> Duration {
        self.base
    }

    /// Maximum delay.
    pub fn cap(&self) -> Duration {
        self.cap
    }
}
