//! Stability AI API data transfer objects.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Weighted prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityTextPrompt {
    /// Prompt text
    pub text: String,
    /// Prompt weight; negative weights steer away
    pub weight: f32,
}

/// `POST /v1/generation/{engine}/text-to-image` body.
#[derive(Debug, Clone, PartialEq, Serialize, Builder, Getters)]
#[builder(setter(into))]
pub struct StabilityRequest {
    /// Prompts
    text_prompts: Vec<StabilityTextPrompt>,
    /// Prompt adherence
    #[builder(default = "7.0")]
    cfg_scale: f32,
    /// Image height in pixels
    #[builder(default = "1024")]
    height: u32,
    /// Image width in pixels
    #[builder(default = "1024")]
    width: u32,
    /// Number of images
    #[builder(default = "1")]
    samples: u32,
    /// Diffusion steps
    #[builder(default = "30")]
    steps: u32,
}

impl StabilityRequest {
    /// Creates a new builder for `StabilityRequest`.
    pub fn builder() -> StabilityRequestBuilder {
        StabilityRequestBuilder::default()
    }
}

/// Generated image.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StabilityArtifact {
    /// Base64 PNG
    pub base64: String,
    /// `SUCCESS`, `CONTENT_FILTERED` or `ERROR`
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Text-to-image response.
#[derive(Debug, Clone, Deserialize, Getters)]
pub struct StabilityResponse {
    /// Generated images
    artifacts: Vec<StabilityArtifact>,
}
