//! Provider profile types.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use taleweaver_core::RequestClass;

/// Relative cost of calling a provider.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CostClass {
    /// Cheapest tier
    Economy,
    /// Default tier
    #[default]
    Standard,
    /// Most expensive tier
    Premium,
}

/// Typical response latency of a provider.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LatencyClass {
    /// Seconds
    Fast,
    /// Tens of seconds
    #[default]
    Moderate,
    /// A minute or more
    Slow,
}

/// What a provider can do and how it should be treated.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use taleweaver_core::RequestClass;
/// use taleweaver_interface::{CostClass, ProviderProfile};
///
/// let profile = ProviderProfile::builder()
///     .name("openai")
///     .classes(vec![RequestClass::SceneText, RequestClass::Image])
///     .cost_class(CostClass::Premium)
///     .call_timeout(Duration::from_secs(60))
///     .build()
///     .unwrap();
///
/// assert!(profile.supports(RequestClass::Image));
/// assert!(!profile.supports(RequestClass::Audio));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_builder::Builder, derive_getters::Getters)]
#[builder(setter(into))]
pub struct ProviderProfile {
    /// Registered provider name
    name: String,
    /// Request classes the provider can serve
    classes: Vec<RequestClass>,
    /// Cost tier
    #[builder(default)]
    cost_class: CostClass,
    /// Latency tier
    #[builder(default)]
    latency_class: LatencyClass,
    /// Hard per-call timeout
    #[builder(default = "Duration::from_secs(60)")]
    call_timeout: Duration,
}

impl ProviderProfile {
    /// Create a new builder.
    pub fn builder() -> ProviderProfileBuilder {
        ProviderProfileBuilder::default()
    }

    /// Whether the provider can serve a request class.
    pub fn supports(&self, class: RequestClass) -> bool {
        self.classes.contains(&class)
    }
}
