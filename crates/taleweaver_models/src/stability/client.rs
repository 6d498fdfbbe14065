//! Stability AI text-to-image client.

use crate::classify::{ensure_success, read_json, truncate_chars, unsupported_class};
use crate::{StabilityRequest, StabilityResponse, StabilityTextPrompt, classify_transport};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use reqwest::header::ACCEPT;
use taleweaver_core::{GenerationRequest, ProviderOutput, RequestClass};
use taleweaver_error::{ProviderError, ProviderResult};
use taleweaver_interface::{ProviderProfile, StoryProvider};
use taleweaver_rate_limit::ProviderConfig;
use tracing::{debug, instrument, warn};

const STABILITY_API_URL: &str = "https://api.stability.ai";
const DEFAULT_ENGINE: &str = "stable-diffusion-xl-1024-v1-0";
const MAX_PROMPT_CHARS: usize = 2000;

/// Stability AI client serving scene images.
#[derive(Debug, Clone)]
pub struct StabilityClient {
    client: Client,
    api_key: String,
    base_url: String,
    profile: ProviderProfile,
    engine: String,
}

impl StabilityClient {
    /// Creates a client from a provider section.
    pub fn new(profile: ProviderProfile, api_key: impl Into<String>, config: &ProviderConfig) -> Self {
        debug!(provider = %profile.name(), "Creating new Stability client");
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| STABILITY_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            profile,
            engine: config
                .image_model
                .clone()
                .unwrap_or_else(|| DEFAULT_ENGINE.to_string()),
        }
    }
}

#[async_trait]
impl StoryProvider for StabilityClient {
    #[instrument(skip(self, req), fields(provider = %self.profile.name(), engine = %self.engine))]
    async fn generate(&self, req: &GenerationRequest) -> ProviderResult {
        let name = self.profile.name();
        if req.class != RequestClass::Image {
            return Err(unsupported_class(name, req.class));
        }

        let body = StabilityRequest::builder()
            .text_prompts(vec![StabilityTextPrompt {
                text: truncate_chars(&req.payload.prompt, MAX_PROMPT_CHARS).to_string(),
                weight: 1.0,
            }])
            .build()
            .map_err(|e| {
                ProviderError::unavailable(format!("{} request could not be built: {}", name, e))
            })?;
        let response = self
            .client
            .post(format!(
                "{}/v1/generation/{}/text-to-image",
                self.base_url, self.engine
            ))
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_transport(name, &e))?;
        let response = ensure_success(name, response).await?;
        let parsed: StabilityResponse = read_json(name, response).await?;

        let Some(artifact) = parsed.artifacts().first() else {
            return Err(ProviderError::invalid_response(format!(
                "{}: response contained no artifacts",
                name
            )));
        };
        if artifact.finish_reason.as_deref() == Some("CONTENT_FILTERED") {
            warn!("Image was content filtered");
            return Err(ProviderError::invalid_response(format!(
                "{}: image was content filtered",
                name
            )));
        }
        let data = STANDARD.decode(&artifact.base64).map_err(|e| {
            ProviderError::invalid_response(format!("{}: bad base64 image: {}", name, e))
        })?;
        debug!(bytes = data.len(), "Received image");
        Ok(ProviderOutput::Image {
            mime: "image/png".to_string(),
            data,
        })
    }

    fn profile(&self) -> &ProviderProfile {
        &self.profile
    }
}
