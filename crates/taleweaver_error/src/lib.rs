//! Error types for the Taleweaver story generation engine.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - Constructors use `#[track_caller]` for automatic location capture
//!
//! Provider failures ([`ProviderError`]) are absorbed by delegation until a
//! request is exhausted ([`DelegationError`]); story-level failures
//! ([`StoryError`]) are either fatal (scene generation, assembly invariants)
//! or recorded on the asset they belong to.
//!
//! # Examples
//!
//! ```
//! use taleweaver_error::{ConfigError, TaleweaverResult};
//!
//! fn load() -> TaleweaverResult<()> {
//!     Err(ConfigError::new("scene_count must be positive"))?
//! }
//!
//! assert!(load().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod delegation;
mod error;
mod json;
mod output;
mod provider;
mod story;

pub use config::ConfigError;
pub use delegation::{DelegationError, DelegationErrorKind};
pub use error::{TaleweaverError, TaleweaverErrorKind, TaleweaverResult};
pub use json::JsonError;
pub use output::OutputError;
pub use provider::{ProviderError, ProviderErrorKind, ProviderResult, RetryableError};
pub use story::{StoryError, StoryErrorKind};
