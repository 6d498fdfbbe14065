//! Anthropic messages API integration.

mod client;
mod dto;

pub use client::AnthropicClient;
pub use dto::{AnthropicContent, AnthropicMessage, AnthropicRequest, AnthropicResponse};
