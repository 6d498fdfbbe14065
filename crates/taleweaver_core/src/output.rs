//! Provider outputs.

use serde::{Deserialize, Serialize};

/// Successful payload of one provider attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ProviderOutput {
    /// Generated text.
    Text(String),

    /// Generated image bytes.
    Image {
        /// MIME type of the image
        mime: String,
        /// Binary image data
        data: Vec<u8>,
    },

    /// Generated audio bytes.
    Audio {
        /// MIME type of the audio
        mime: String,
        /// Binary audio data
        data: Vec<u8>,
    },

    /// Remote reference to generated media.
    Url {
        /// MIME type if known
        mime: Option<String>,
        /// Location of the media
        url: String,
    },
}

impl ProviderOutput {
    /// Short name of the variant, used in validation messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ProviderOutput::Text(_) => "text",
            ProviderOutput::Image { .. } => "image",
            ProviderOutput::Audio { .. } => "audio",
            ProviderOutput::Url { .. } => "url",
        }
    }

    /// Text content, if this is a text output.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ProviderOutput::Text(text) => Some(text),
            _ => None,
        }
    }
}
