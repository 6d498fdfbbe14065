//! OpenAI API data transfer objects.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct OpenAiMessage {
    /// `system`, `user` or `assistant`
    role: String,
    /// Message text
    content: String,
}

impl OpenAiMessage {
    /// Creates a new builder for `OpenAiMessage`.
    pub fn builder() -> OpenAiMessageBuilder {
        OpenAiMessageBuilder::default()
    }
}

/// `POST /chat/completions` body.
#[derive(Debug, Clone, PartialEq, Serialize, Builder, Getters)]
#[builder(setter(into))]
pub struct OpenAiChatRequest {
    /// Model identifier
    model: String,
    /// Conversation
    messages: Vec<OpenAiMessage>,
    /// Sampling temperature
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Output token limit
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    /// Structured output mode, e.g. `{"type": "json_object"}`
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<serde_json::Value>,
}

impl OpenAiChatRequest {
    /// Creates a new builder for `OpenAiChatRequest`.
    pub fn builder() -> OpenAiChatRequestBuilder {
        OpenAiChatRequestBuilder::default()
    }
}

/// One completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiChoice {
    /// Generated message
    pub message: OpenAiResponseMessage,
}

/// Generated message; content may be null for refusals.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiResponseMessage {
    /// Generated text
    #[serde(default)]
    pub content: Option<String>,
    /// Refusal explanation
    #[serde(default)]
    pub refusal: Option<String>,
}

/// `POST /chat/completions` response.
#[derive(Debug, Clone, Deserialize, Getters)]
pub struct OpenAiChatResponse {
    /// Completion choices
    choices: Vec<OpenAiChoice>,
}

impl OpenAiChatResponse {
    /// Text of the first choice, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .filter(|text| !text.trim().is_empty())
    }

    /// Refusal of the first choice, if any.
    pub fn refusal(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.refusal.as_deref())
    }
}

/// `POST /images/generations` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Builder, Getters)]
#[builder(setter(into))]
pub struct OpenAiImageRequest {
    /// Model identifier
    model: String,
    /// Image prompt
    prompt: String,
    /// Number of images
    #[builder(default = "1")]
    n: u32,
    /// Image dimensions
    #[builder(default = "\"1024x1024\".to_string()")]
    size: String,
    /// `b64_json` or `url`
    #[builder(default = "\"b64_json\".to_string()")]
    response_format: String,
}

impl OpenAiImageRequest {
    /// Creates a new builder for `OpenAiImageRequest`.
    pub fn builder() -> OpenAiImageRequestBuilder {
        OpenAiImageRequestBuilder::default()
    }
}

/// One generated image.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiImageData {
    /// Base64 PNG
    #[serde(default)]
    pub b64_json: Option<String>,
    /// Hosted image
    #[serde(default)]
    pub url: Option<String>,
}

/// `POST /images/generations` response.
#[derive(Debug, Clone, Deserialize, Getters)]
pub struct OpenAiImageResponse {
    /// Generated images
    data: Vec<OpenAiImageData>,
}

/// `POST /audio/speech` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Builder, Getters)]
#[builder(setter(into))]
pub struct OpenAiSpeechRequest {
    /// Model identifier
    model: String,
    /// Text to speak
    input: String,
    /// Voice name
    voice: String,
    /// Audio container
    #[builder(default = "\"mp3\".to_string()")]
    response_format: String,
}

impl OpenAiSpeechRequest {
    /// Creates a new builder for `OpenAiSpeechRequest`.
    pub fn builder() -> OpenAiSpeechRequestBuilder {
        OpenAiSpeechRequestBuilder::default()
    }
}
