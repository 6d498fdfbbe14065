//! Text, image and speech provider integrations for Taleweaver.
//!
//! Each provider lives behind its own feature flag:
//!
//! - **OpenAI** (`openai`) - chat completions for scene text, image generation, speech
//! - **Anthropic** (`anthropic`) - messages API for scene text
//! - **Stability AI** (`stability`) - text-to-image
//!
//! Every adapter implements [`taleweaver_interface::StoryProvider`] and maps
//! HTTP and transport failures onto the four provider failure kinds (see
//! [`classify_status`] and [`classify_transport`]).
//!
//! # Example
//!
//! ```no_run
//! use taleweaver_models::build_registry;
//! use taleweaver_rate_limit::TaleweaverConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TaleweaverConfig::load()?;
//! let registry = build_registry(&config)?;
//! println!("{} providers available", registry.len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod classify;
mod factory;
mod ssml;

pub use classify::{classify_status, classify_transport};
pub use factory::{build_provider, build_registry};
pub use ssml::ssml_to_plain;

#[cfg(feature = "openai")]
mod openai;

#[cfg(feature = "anthropic")]
mod anthropic;

#[cfg(feature = "stability")]
mod stability;

#[cfg(feature = "openai")]
pub use openai::{
    OpenAiChatRequest, OpenAiChatResponse, OpenAiChoice, OpenAiClient, OpenAiImageData,
    OpenAiImageRequest, OpenAiImageResponse, OpenAiMessage, OpenAiResponseMessage,
    OpenAiSpeechRequest,
};

#[cfg(feature = "anthropic")]
pub use anthropic::{
    AnthropicClient, AnthropicContent, AnthropicMessage, AnthropicRequest, AnthropicResponse,
};

#[cfg(feature = "stability")]
pub use stability::{
    StabilityArtifact, StabilityClient, StabilityRequest, StabilityResponse, StabilityTextPrompt,
};
