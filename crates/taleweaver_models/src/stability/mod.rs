//! Stability AI text-to-image integration.

mod client;
mod dto;

pub use client::StabilityClient;
pub use dto::{StabilityArtifact, StabilityRequest, StabilityResponse, StabilityTextPrompt};
