//! Metrics for delegated provider attempts.
//!
//! Instruments come from the OpenTelemetry global meter; without an installed
//! meter provider they are no-ops.

use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram, Meter},
};
use std::sync::OnceLock;
use taleweaver_core::{FailureKind, RequestClass};

static METRICS: OnceLock<DelegationMetrics> = OnceLock::new();

/// Attempt, failure and exhaustion counters plus attempt latency.
///
/// Labeled with provider name and request class.
#[derive(Clone)]
pub struct DelegationMetrics {
    /// Meter handle kept alive for metric instruments
    _meter: Meter,
    /// Provider attempts
    pub attempts: Counter<u64>,
    /// Failed provider attempts
    pub failures: Counter<u64>,
    /// Requests that ran out of candidates or attempts
    pub exhausted: Counter<u64>,
    /// Attempt duration in seconds
    pub latency: Histogram<f64>,
}

impl DelegationMetrics {
    fn init() -> Self {
        let meter = global::meter("taleweaver_delegation");

        Self {
            _meter: meter.clone(),
            attempts: meter
                .u64_counter("delegation.attempts")
                .with_description("Provider attempts")
                .build(),
            failures: meter
                .u64_counter("delegation.failures")
                .with_description("Failed provider attempts")
                .build(),
            exhausted: meter
                .u64_counter("delegation.exhausted")
                .with_description("Requests that exhausted every candidate")
                .build(),
            latency: meter
                .f64_histogram("delegation.latency")
                .with_unit("seconds")
                .with_description("Provider attempt duration")
                .build(),
        }
    }

    /// Get the global delegation metrics instance.
    pub fn get() -> &'static Self {
        METRICS.get_or_init(Self::init)
    }

    /// Record an attempt and its duration.
    pub fn record_attempt(&self, provider: &str, class: RequestClass, duration_secs: f64) {
        let labels = &[
            KeyValue::new("provider", provider.to_string()),
            KeyValue::new("class", class.to_string()),
        ];
        self.attempts.add(1, labels);
        self.latency.record(duration_secs, labels);
    }

    /// Record a failed attempt.
    pub fn record_failure(&self, provider: &str, class: RequestClass, kind: FailureKind) {
        let labels = &[
            KeyValue::new("provider", provider.to_string()),
            KeyValue::new("class", class.to_string()),
            KeyValue::new("kind", kind.to_string()),
        ];
        self.failures.add(1, labels);
    }

    /// Record an exhausted request.
    pub fn record_exhausted(&self, class: RequestClass) {
        self.exhausted
            .add(1, &[KeyValue::new("class", class.to_string())]);
    }
}
