//! Per-provider request pacing using governor (GCRA).

use crate::TaleweaverConfig;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::{debug, trace};

type DirectRateLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Requests-per-minute throttle for one provider.
///
/// Clones share the same quota state.
#[derive(Clone)]
pub struct RequestThrottle {
    limiter: Arc<DirectRateLimiter>,
    per_minute: NonZeroU32,
}

impl RequestThrottle {
    /// Creates a throttle; `None` when `rpm` is zero (unlimited).
    pub fn per_minute(rpm: u32) -> Option<Self> {
        let per_minute = NonZeroU32::new(rpm)?;
        Some(Self {
            limiter: Arc::new(GovernorRateLimiter::direct(Quota::per_minute(per_minute))),
            per_minute,
        })
    }

    /// Waits until the quota allows one more request.
    pub async fn until_ready(&self) {
        self.limiter.until_ready().await;
    }

    /// Consumes one request if the quota allows it right now.
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }

    /// Configured requests per minute.
    pub fn rpm(&self) -> u32 {
        self.per_minute.get()
    }
}

impl std::fmt::Debug for RequestThrottle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestThrottle")
            .field("per_minute", &self.per_minute)
            .finish()
    }
}

/// Throttles for every provider that configures `requests_per_minute`.
#[derive(Debug, Clone, Default)]
pub struct ThrottleSet {
    throttles: BTreeMap<String, RequestThrottle>,
}

impl ThrottleSet {
    /// Builds throttles from the provider sections of a configuration.
    pub fn from_config(config: &TaleweaverConfig) -> Self {
        let throttles: BTreeMap<String, RequestThrottle> = config
            .providers
            .iter()
            .filter_map(|(name, provider)| {
                let throttle = RequestThrottle::per_minute(provider.requests_per_minute?)?;
                debug!(provider = %name, rpm = throttle.rpm(), "Configured request throttle");
                Some((name.clone(), throttle))
            })
            .collect();
        Self { throttles }
    }

    /// Adds or replaces a provider's throttle.
    pub fn insert(&mut self, provider: impl Into<String>, throttle: RequestThrottle) {
        self.throttles.insert(provider.into(), throttle);
    }

    /// Throttle for a provider, if it has one.
    pub fn get(&self, provider: &str) -> Option<&RequestThrottle> {
        self.throttles.get(provider)
    }

    /// Waits for the provider's quota. Unthrottled providers pass immediately.
    pub async fn until_ready(&self, provider: &str) {
        if let Some(throttle) = self.throttles.get(provider) {
            trace!(provider, "Waiting for request quota");
            throttle.until_ready().await;
        }
    }

    /// Number of throttled providers.
    pub fn len(&self) -> usize {
        self.throttles.len()
    }

    /// True when no provider is throttled.
    pub fn is_empty(&self) -> bool {
        self.throttles.is_empty()
    }
}
