//! Provider fallback, retry budgets and backoff.
//!
//! A [`DelegationPolicy`] holds the static preference table: for every
//! request class, an ordered list of candidate providers with per-candidate
//! retry budgets, plus a global attempt ceiling and a backoff schedule. Each
//! logical request gets a fresh [`DelegationPlan`] from the policy, which
//! answers "which provider next?" from the failures recorded so far.
//!
//! The [`Delegator`] drives a plan against live adapters: it waits out
//! backoff delays and provider throttles, enforces per-call timeouts, runs the
//! caller's validator, and records every attempt.
//!
//! # Failure handling
//!
//! | Failure | Same candidate? | Delay before next attempt |
//! |---|---|---|
//! | `RateLimited` | while attempts < budget | `min(base × 2^n, cap)` |
//! | `Timeout` | while attempts < min(budget, 2) | `min(base × 2^n, cap)` |
//! | `InvalidResponse` | while attempts < budget | none |
//! | `ProviderUnavailable` | never | none |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod delegator;
mod metrics;
mod plan;
mod policy;

pub use delegator::{Delegated, Delegator};
pub use metrics::DelegationMetrics;
pub use plan::{DelegationPlan, NextStep};
pub use policy::{Candidate, DelegationPolicy};
