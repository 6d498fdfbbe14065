//! OpenAI chat, image and speech integration.

mod client;
mod dto;

pub use client::OpenAiClient;
pub use dto::{
    OpenAiChatRequest, OpenAiChatResponse, OpenAiChoice, OpenAiImageData, OpenAiImageRequest,
    OpenAiImageResponse, OpenAiMessage, OpenAiResponseMessage, OpenAiSpeechRequest,
};
