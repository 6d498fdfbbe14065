//! Configuration, admission control and request throttling.
//!
//! [`TaleweaverConfig`] is the single configuration surface of the engine. It
//! is layered from a bundled `taleweaver.toml`, optional user files, and
//! `TALEWEAVER__*` environment variables, then validated once.
//!
//! The pacing primitives built from it:
//! - [`AdmissionGate`] bounds how many asset requests run at once
//! - [`RequestThrottle`] / [`ThrottleSet`] pace calls per provider (GCRA via governor)
//! - [`BackoffSchedule`] computes capped exponential delays between attempts

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod backoff;
mod config;
mod gate;
mod limiter;

pub use backoff::BackoffSchedule;
pub use config::{
    AssetsConfig, DelegationConfig, FailureMode, PreferencesConfig, ProviderConfig, ProviderKind,
    StoryConfig, TaleweaverConfig, ValidationConfig,
};
pub use gate::{AdmissionGate, AdmissionPermit};
pub use limiter::{RequestThrottle, ThrottleSet};
