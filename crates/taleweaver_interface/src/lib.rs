//! Provider adapter contract for the Taleweaver story generation engine.
//!
//! Every text, image, or speech backend implements [`StoryProvider`] and
//! describes itself with a [`ProviderProfile`]. A [`ProviderRegistry`] maps
//! configured provider names to shared adapter handles; delegation looks
//! candidates up by name and class.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod registry;
mod traits;
mod types;

pub use registry::ProviderRegistry;
pub use traits::StoryProvider;
pub use types::{
    CostClass, LatencyClass, ProviderProfile, ProviderProfileBuilder, ProviderProfileBuilderError,
};
