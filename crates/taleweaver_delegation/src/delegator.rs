//! Executes requests through a delegation plan.

use crate::{DelegationMetrics, DelegationPolicy, NextStep};
use std::time::Instant;
use taleweaver_core::{
    AttemptOutcome, AttemptRecord, FailureKind, GenerationRequest, ProviderOutput, RequestClass,
};
use taleweaver_error::{DelegationError, DelegationErrorKind, ProviderError, ProviderErrorKind};
use taleweaver_interface::ProviderRegistry;
use taleweaver_rate_limit::{TaleweaverConfig, ThrottleSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

/// A validated value and how it was obtained.
#[derive(Debug, Clone)]
pub struct Delegated<T> {
    /// Validated value
    pub value: T,
    /// Provider that produced it
    pub provider: String,
    /// Every attempt made, the successful one last
    pub history: Vec<AttemptRecord>,
}

/// Runs generation requests against registered providers with fallback.
///
/// Holds no per-request state; one instance serves every request of a run,
/// concurrently.
#[derive(Debug, Clone)]
pub struct Delegator {
    registry: ProviderRegistry,
    policy: DelegationPolicy,
    throttles: ThrottleSet,
}

impl Delegator {
    /// Creates a delegator without request throttles.
    pub fn new(registry: ProviderRegistry, policy: DelegationPolicy) -> Self {
        Self {
            registry,
            policy,
            throttles: ThrottleSet::default(),
        }
    }

    /// Builds policy and throttles from configuration.
    pub fn from_config(config: &TaleweaverConfig, registry: ProviderRegistry) -> Self {
        Self::new(registry, DelegationPolicy::from_config(config))
            .with_throttles(ThrottleSet::from_config(config))
    }

    /// Replaces the per-provider throttles.
    pub fn with_throttles(mut self, throttles: ThrottleSet) -> Self {
        self.throttles = throttles;
        self
    }

    /// Registered providers.
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Preference table.
    pub fn policy(&self) -> &DelegationPolicy {
        &self.policy
    }

    /// Generates a value for `request`, falling back across providers.
    ///
    /// `validate` turns raw output into the caller's value; a rejection is
    /// recorded as `InvalidResponse` and its message is attached to the next
    /// attempt as the repair hint. Cancellation is observed between attempts
    /// only; a call in flight runs until it returns or times out.
    #[instrument(skip_all, fields(class = %request.class, target = %request.target()))]
    pub async fn delegate<T, F>(
        &self,
        mut request: GenerationRequest,
        validate: F,
        cancel: &CancellationToken,
    ) -> Result<Delegated<T>, DelegationError>
    where
        F: Fn(ProviderOutput) -> Result<T, String>,
    {
        let class = request.class;
        let mut plan = self
            .policy
            .plan(class, &self.registry, request.budget.max_attempts);
        let mut history: Vec<AttemptRecord> = Vec::new();

        if plan.is_empty() {
            warn!("No eligible provider");
            return Err(DelegationError::new(
                DelegationErrorKind::NoEligibleProvider(class),
                history,
            ));
        }

        loop {
            if cancel.is_cancelled() {
                return Err(cancelled(class, history));
            }

            let (provider_name, delay) = match plan.next() {
                NextStep::Attempt { provider, delay } => (provider, delay),
                NextStep::Exhausted => {
                    warn!(attempts = history.len(), "Delegation exhausted");
                    DelegationMetrics::get().record_exhausted(class);
                    let attempts = history.len() as u32;
                    return Err(DelegationError::new(
                        DelegationErrorKind::GenerationExhausted { class, attempts },
                        history,
                    ));
                }
            };

            if !delay.is_zero() {
                debug!(provider = %provider_name, ?delay, "Backing off");
                tokio::select! {
                    _ = cancel.cancelled() => return Err(cancelled(class, history)),
                    _ = tokio::time::sleep(delay) => {}
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => return Err(cancelled(class, history)),
                _ = self.throttles.until_ready(&provider_name) => {}
            }

            debug!(
                provider = %provider_name,
                attempt = plan.total_attempts(),
                "Attempting"
            );
            let started = Instant::now();
            let result = match self.registry.get(&provider_name) {
                Some(provider) => {
                    let timeout = request.budget.call_timeout(*provider.profile().call_timeout());
                    match tokio::time::timeout(timeout, provider.generate(&request)).await {
                        Ok(result) => result,
                        Err(_) => Err(ProviderError::new(ProviderErrorKind::Timeout(format!(
                            "no response within {} ms",
                            timeout.as_millis()
                        )))),
                    }
                }
                None => Err(ProviderError::unavailable("provider is not registered")),
            };
            let result =
                result.and_then(|output| validate(output).map_err(ProviderError::invalid_response));
            let elapsed = started.elapsed();
            DelegationMetrics::get().record_attempt(&provider_name, class, elapsed.as_secs_f64());

            match result {
                Ok(value) => {
                    debug!(provider = %provider_name, elapsed_ms = elapsed.as_millis() as u64, "Attempt succeeded");
                    history.push(AttemptRecord {
                        class,
                        target: request.target().to_string(),
                        provider: provider_name.clone(),
                        outcome: AttemptOutcome::Succeeded,
                        elapsed_ms: elapsed.as_millis() as u64,
                    });
                    return Ok(Delegated {
                        value,
                        provider: provider_name,
                        history,
                    });
                }
                Err(err) => {
                    let kind = err.failure_kind();
                    let message = err.kind.message().to_string();
                    warn!(provider = %provider_name, %kind, %message, "Attempt failed");
                    DelegationMetrics::get().record_failure(&provider_name, class, kind);
                    history.push(AttemptRecord {
                        class,
                        target: request.target().to_string(),
                        provider: provider_name,
                        outcome: AttemptOutcome::Failed {
                            kind,
                            message: message.clone(),
                        },
                        elapsed_ms: elapsed.as_millis() as u64,
                    });
                    if kind == FailureKind::InvalidResponse {
                        request.payload.repair_hint = Some(message);
                    }
                    plan.record_failure(kind);
                }
            }
        }
    }
}

fn cancelled(class: RequestClass, history: Vec<AttemptRecord>) -> DelegationError {
    debug!(attempts = history.len(), "Delegation cancelled");
    let attempts = history.len() as u32;
    DelegationError::new(DelegationErrorKind::Cancelled { class, attempts }, history)
}
