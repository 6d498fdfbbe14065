//! Static preference table.

use crate::DelegationPlan;
use std::collections::BTreeMap;
use taleweaver_core::RequestClass;
use taleweaver_interface::ProviderRegistry;
use taleweaver_rate_limit::{BackoffSchedule, TaleweaverConfig};
use tracing::{debug, warn};

/// A provider eligible for a request class, with its attempt budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Provider name
    pub name: String,
    /// Attempts allowed on this provider per request
    pub budget: u32,
}

impl Candidate {
    /// Creates a candidate. A zero budget is raised to one.
    pub fn new(name: impl Into<String>, budget: u32) -> Self {
        Self {
            name: name.into(),
            budget: budget.max(1),
        }
    }
}

/// Ordered, budgeted fallback strategy per request class.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use taleweaver_core::RequestClass;
/// use taleweaver_delegation::{Candidate, DelegationPolicy};
/// use taleweaver_rate_limit::BackoffSchedule;
///
/// let policy = DelegationPolicy::new(8, BackoffSchedule::none())
///     .with_candidates(RequestClass::SceneText, vec![Candidate::new("primary", 2)]);
/// assert_eq!(policy.candidates(RequestClass::SceneText).len(), 1);
/// assert!(policy.candidates(RequestClass::Audio).is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct DelegationPolicy {
    preferences: BTreeMap<RequestClass, Vec<Candidate>>,
    ceiling: u32,
    backoff: BackoffSchedule,
}

impl DelegationPolicy {
    /// Creates a policy with no candidates.
    pub fn new(ceiling: u32, backoff: BackoffSchedule) -> Self {
        Self {
            preferences: BTreeMap::new(),
            ceiling: ceiling.max(1),
            backoff,
        }
    }

    /// Sets the candidate list for a class.
    pub fn with_candidates(mut self, class: RequestClass, candidates: Vec<Candidate>) -> Self {
        self.preferences.insert(class, candidates);
        self
    }

    /// Builds the policy from `[delegation]` and per-provider retry budgets.
    pub fn from_config(config: &TaleweaverConfig) -> Self {
        let mut policy = Self::new(
            config.delegation.global_attempt_ceiling,
            config.delegation.backoff(),
        );
        for class in [RequestClass::SceneText, RequestClass::Image, RequestClass::Audio] {
            let candidates = config
                .delegation
                .preferences
                .for_class(class)
                .iter()
                .map(|name| Candidate::new(name.clone(), config.retry_budget(name)))
                .collect();
            policy = policy.with_candidates(class, candidates);
        }
        policy
    }

    /// Configured candidates for a class, most preferred first.
    pub fn candidates(&self, class: RequestClass) -> &[Candidate] {
        self.preferences
            .get(&class)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Global attempt ceiling.
    pub fn ceiling(&self) -> u32 {
        self.ceiling
    }

    /// Backoff schedule.
    pub fn backoff(&self) -> BackoffSchedule {
        self.backoff
    }

    /// Creates a fresh plan for one request.
    ///
    /// Candidates that are not registered, or whose profile does not support
    /// the class, are skipped. A name listed twice keeps its first position.
    /// The plan stops after `min(ceiling, max_attempts)` attempts.
    pub fn plan(
        &self,
        class: RequestClass,
        registry: &ProviderRegistry,
        max_attempts: u32,
    ) -> DelegationPlan {
        let mut eligible: Vec<Candidate> = Vec::new();
        for candidate in self.candidates(class) {
            if eligible.iter().any(|c| c.name == candidate.name) {
                debug!(provider = %candidate.name, %class, "Duplicate candidate ignored");
                continue;
            }
            match registry.get(&candidate.name) {
                Some(provider) if provider.supports(class) => eligible.push(candidate.clone()),
                Some(_) => {
                    warn!(provider = %candidate.name, %class, "Candidate does not support class, skipping")
                }
                None => warn!(provider = %candidate.name, %class, "Candidate not registered, skipping"),
            }
        }
        let limit = self.ceiling.min(max_attempts.max(1));
        DelegationPlan::new(class, eligible, limit, self.backoff)
    }
}
