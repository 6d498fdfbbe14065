//! Anthropic API data transfer objects.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Conversation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct AnthropicMessage {
    /// `user` or `assistant`
    role: String,
    /// Message text
    content: String,
}

impl AnthropicMessage {
    /// Creates a new builder for `AnthropicMessage`.
    pub fn builder() -> AnthropicMessageBuilder {
        AnthropicMessageBuilder::default()
    }
}

/// `POST /messages` body.
#[derive(Debug, Clone, PartialEq, Serialize, Builder, Getters)]
#[builder(setter(into))]
pub struct AnthropicRequest {
    /// Model identifier
    model: String,
    /// Output token limit
    max_tokens: u32,
    /// System prompt
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// Conversation
    messages: Vec<AnthropicMessage>,
    /// Sampling temperature
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl AnthropicRequest {
    /// Creates a new builder for `AnthropicRequest`.
    pub fn builder() -> AnthropicRequestBuilder {
        AnthropicRequestBuilder::default()
    }
}

/// Response content block.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicContent {
    /// Text output
    Text {
        /// Generated text
        text: String,
    },
    /// Any block type this client does not consume
    #[serde(other)]
    Other,
}

/// `POST /messages` response.
#[derive(Debug, Clone, Deserialize, Getters)]
pub struct AnthropicResponse {
    /// Content blocks
    content: Vec<AnthropicContent>,
    /// Why generation stopped
    #[serde(default)]
    stop_reason: Option<String>,
}

impl AnthropicResponse {
    /// Concatenated text blocks.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                AnthropicContent::Text { text } => Some(text.as_str()),
                AnthropicContent::Other => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }
}
