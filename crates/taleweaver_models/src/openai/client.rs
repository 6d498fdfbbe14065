//! OpenAI client for chat, image and speech generation.

use crate::classify::{ensure_success, read_json, truncate_chars, unsupported_class};
use crate::{
    OpenAiChatRequest, OpenAiChatResponse, OpenAiImageRequest, OpenAiImageResponse, OpenAiMessage,
    OpenAiSpeechRequest, classify_transport, ssml_to_plain,
};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use taleweaver_core::{GenerationRequest, ProviderOutput, RequestClass};
use taleweaver_error::{ProviderError, ProviderResult};
use taleweaver_interface::{ProviderProfile, StoryProvider};
use taleweaver_rate_limit::ProviderConfig;
use tracing::{debug, instrument};

const OPENAI_API_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TEXT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";
const DEFAULT_SPEECH_MODEL: &str = "tts-1";
const DEFAULT_VOICE: &str = "alloy";
const MAX_IMAGE_PROMPT_CHARS: usize = 4000;
const MAX_SPEECH_INPUT_CHARS: usize = 4096;
const SYSTEM_PROMPT: &str =
    "You write scenes for illustrated, narrated stories. Reply with a single JSON object only.";

/// OpenAI client serving scene text, images and speech.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    profile: ProviderProfile,
    text_model: String,
    image_model: String,
    speech_model: String,
    voice: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl OpenAiClient {
    /// Creates a client from a provider section.
    pub fn new(profile: ProviderProfile, api_key: impl Into<String>, config: &ProviderConfig) -> Self {
        debug!(provider = %profile.name(), "Creating new OpenAI client");
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| OPENAI_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            profile,
            text_model: config
                .text_model
                .clone()
                .unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            image_model: config
                .image_model
                .clone()
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            speech_model: config
                .speech_model
                .clone()
                .unwrap_or_else(|| DEFAULT_SPEECH_MODEL.to_string()),
            voice: config.voice.clone().unwrap_or_else(|| DEFAULT_VOICE.to_string()),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    fn name(&self) -> &str {
        self.profile.name()
    }

    fn build_error(&self, err: impl std::fmt::Display) -> ProviderError {
        ProviderError::unavailable(format!("{} request could not be built: {}", self.name(), err))
    }

    /// Builds the chat body for a scene text request.
    pub fn chat_request(&self, req: &GenerationRequest) -> Result<OpenAiChatRequest, ProviderError> {
        let messages = vec![
            OpenAiMessage::builder()
                .role("system")
                .content(SYSTEM_PROMPT)
                .build()
                .map_err(|e| self.build_error(e))?,
            OpenAiMessage::builder()
                .role("user")
                .content(req.payload.prompt_with_repair())
                .build()
                .map_err(|e| self.build_error(e))?,
        ];
        OpenAiChatRequest::builder()
            .model(self.text_model.clone())
            .messages(messages)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .response_format(Some(serde_json::json!({ "type": "json_object" })))
            .build()
            .map_err(|e| self.build_error(e))
    }

    #[instrument(skip(self, req), fields(provider = %self.name(), model = %self.text_model))]
    async fn generate_text(&self, req: &GenerationRequest) -> ProviderResult {
        let body = self.chat_request(req)?;
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_transport(self.name(), &e))?;
        let response = ensure_success(self.name(), response).await?;
        let parsed: OpenAiChatResponse = read_json(self.name(), response).await?;

        if let Some(text) = parsed.first_text() {
            debug!(chars = text.len(), "Received completion");
            return Ok(ProviderOutput::Text(text.to_string()));
        }
        let reason = parsed.refusal().unwrap_or("completion had no content");
        Err(ProviderError::invalid_response(format!("{}: {}", self.name(), reason)))
    }

    #[instrument(skip(self, req), fields(provider = %self.name(), model = %self.image_model))]
    async fn generate_image(&self, req: &GenerationRequest) -> ProviderResult {
        let body = OpenAiImageRequest::builder()
            .model(self.image_model.clone())
            .prompt(truncate_chars(&req.payload.prompt, MAX_IMAGE_PROMPT_CHARS))
            .build()
            .map_err(|e| self.build_error(e))?;
        let response = self
            .client
            .post(format!("{}/images/generations", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_transport(self.name(), &e))?;
        let response = ensure_success(self.name(), response).await?;
        let parsed: OpenAiImageResponse = read_json(self.name(), response).await?;

        let Some(image) = parsed.data().first() else {
            return Err(ProviderError::invalid_response(format!(
                "{}: image response contained no images",
                self.name()
            )));
        };
        if let Some(encoded) = &image.b64_json {
            let data = STANDARD.decode(encoded).map_err(|e| {
                ProviderError::invalid_response(format!("{}: bad base64 image: {}", self.name(), e))
            })?;
            debug!(bytes = data.len(), "Received image");
            return Ok(ProviderOutput::Image {
                mime: "image/png".to_string(),
                data,
            });
        }
        match &image.url {
            Some(url) => Ok(ProviderOutput::Url {
                mime: Some("image/png".to_string()),
                url: url.clone(),
            }),
            None => Err(ProviderError::invalid_response(format!(
                "{}: image carried neither data nor URL",
                self.name()
            ))),
        }
    }

    #[instrument(skip(self, req), fields(provider = %self.name(), model = %self.speech_model))]
    async fn generate_speech(&self, req: &GenerationRequest) -> ProviderResult {
        let plain = ssml_to_plain(&req.payload.prompt);
        let body = OpenAiSpeechRequest::builder()
            .model(self.speech_model.clone())
            .input(truncate_chars(&plain, MAX_SPEECH_INPUT_CHARS))
            .voice(self.voice.clone())
            .build()
            .map_err(|e| self.build_error(e))?;
        let response = self
            .client
            .post(format!("{}/audio/speech", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_transport(self.name(), &e))?;
        let response = ensure_success(self.name(), response).await?;
        let data = response
            .bytes()
            .await
            .map_err(|e| classify_transport(self.name(), &e))?;
        if data.is_empty() {
            return Err(ProviderError::invalid_response(format!(
                "{}: speech response was empty",
                self.name()
            )));
        }
        debug!(bytes = data.len(), "Received speech");
        Ok(ProviderOutput::Audio {
            mime: "audio/mpeg".to_string(),
            data: data.to_vec(),
        })
    }
}

#[async_trait]
impl StoryProvider for OpenAiClient {
    async fn generate(&self, req: &GenerationRequest) -> ProviderResult {
        if !self.profile.supports(req.class) {
            return Err(unsupported_class(self.name(), req.class));
        }
        match req.class {
            RequestClass::SceneText => self.generate_text(req).await,
            RequestClass::Image => self.generate_image(req).await,
            RequestClass::Audio => self.generate_speech(req).await,
        }
    }

    fn profile(&self) -> &ProviderProfile {
        &self.profile
    }
}
