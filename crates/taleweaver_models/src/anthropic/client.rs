//! Anthropic messages client for scene text.

use crate::classify::{ensure_success, read_json, unsupported_class};
use crate::{AnthropicMessage, AnthropicRequest, AnthropicResponse, classify_transport};
use async_trait::async_trait;
use reqwest::Client;
use taleweaver_core::{GenerationRequest, ProviderOutput, RequestClass};
use taleweaver_error::{ProviderError, ProviderResult};
use taleweaver_interface::{ProviderProfile, StoryProvider};
use taleweaver_rate_limit::ProviderConfig;
use tracing::{debug, instrument, warn};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-3-5-sonnet-latest";
const DEFAULT_MAX_TOKENS: u32 = 1500;
const SYSTEM_PROMPT: &str =
    "You write scenes for illustrated, narrated stories. Reply with a single JSON object and nothing else.";

/// Anthropic client serving scene text.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    base_url: String,
    profile: ProviderProfile,
    model: String,
    max_tokens: u32,
    temperature: Option<f32>,
}

impl AnthropicClient {
    /// Creates a client from a provider section.
    pub fn new(profile: ProviderProfile, api_key: impl Into<String>, config: &ProviderConfig) -> Self {
        debug!(provider = %profile.name(), "Creating new Anthropic client");
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| ANTHROPIC_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            profile,
            model: config
                .text_model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens: config.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: config.temperature,
        }
    }

    /// Builds the messages body for a scene text request.
    pub fn messages_request(
        &self,
        req: &GenerationRequest,
    ) -> Result<AnthropicRequest, ProviderError> {
        let build_error = |e: &dyn std::fmt::Display| {
            ProviderError::unavailable(format!(
                "{} request could not be built: {}",
                self.profile.name(),
                e
            ))
        };
        let message = AnthropicMessage::builder()
            .role("user")
            .content(req.payload.prompt_with_repair())
            .build()
            .map_err(|e| build_error(&e))?;
        AnthropicRequest::builder()
            .model(self.model.clone())
            .max_tokens(self.max_tokens)
            .system(Some(SYSTEM_PROMPT.to_string()))
            .messages(vec![message])
            .temperature(self.temperature)
            .build()
            .map_err(|e| build_error(&e))
    }
}

#[async_trait]
impl StoryProvider for AnthropicClient {
    #[instrument(skip(self, req), fields(provider = %self.profile.name(), model = %self.model, class = %req.class))]
    async fn generate(&self, req: &GenerationRequest) -> ProviderResult {
        let name = self.profile.name();
        if req.class != RequestClass::SceneText {
            return Err(unsupported_class(name, req.class));
        }

        let body = self.messages_request(req)?;
        debug!(max_tokens = self.max_tokens, "Sending request to Anthropic API");
        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_transport(name, &e))?;
        let response = ensure_success(name, response).await?;
        let parsed: AnthropicResponse = read_json(name, response).await?;

        let text = parsed.text();
        if text.trim().is_empty() {
            return Err(ProviderError::invalid_response(format!(
                "{}: response contained no text",
                name
            )));
        }
        if parsed.stop_reason().as_deref() == Some("max_tokens") {
            warn!("Response was cut off at the token limit");
        }
        debug!(chars = text.len(), "Received response");
        Ok(ProviderOutput::Text(text))
    }

    fn profile(&self) -> &ProviderProfile {
        &self.profile
    }
}
