//! Multi-modal assets attached to scenes.

use crate::RequestClass;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Asset modality.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Modality {
    /// Scene illustration.
    Image,
    /// Scene narration audio.
    Audio,
}

impl Modality {
    /// Request class used to generate this modality.
    pub fn request_class(&self) -> RequestClass {
        match self {
            Modality::Image => RequestClass::Image,
            Modality::Audio => RequestClass::Audio,
        }
    }
}

/// Outcome of an asset's generation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AssetStatus {
    /// Generated successfully.
    Ok,
    /// Generation exhausted; a placeholder reference stands in.
    Placeholder,
    /// Generation exhausted or cancelled; no reference.
    Failed,
}

/// Where an asset's content lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssetRef {
    /// Content embedded as base64.
    Inline {
        /// MIME type
        mime: String,
        /// Base64-encoded bytes
        base64: String,
    },
    /// Content hosted remotely.
    Url {
        /// MIME type if known
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mime: Option<String>,
        /// Location
        url: String,
    },
    /// Stand-in for content that could not be generated.
    Placeholder {
        /// Placeholder URI
        uri: String,
    },
}

impl AssetRef {
    /// Embeds raw bytes.
    pub fn inline(mime: impl Into<String>, data: &[u8]) -> Self {
        AssetRef::Inline {
            mime: mime.into(),
            base64: STANDARD.encode(data),
        }
    }

    /// Decodes inline content. Returns `None` for non-inline references.
    pub fn decode_inline(&self) -> Option<Result<Vec<u8>, base64::DecodeError>> {
        match self {
            AssetRef::Inline { base64, .. } => Some(STANDARD.decode(base64)),
            _ => None,
        }
    }

    /// MIME type, when known.
    pub fn mime(&self) -> Option<&str> {
        match self {
            AssetRef::Inline { mime, .. } => Some(mime),
            AssetRef::Url { mime, .. } => mime.as_deref(),
            AssetRef::Placeholder { .. } => None,
        }
    }
}

/// One generated (or failed) asset for a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Scene the asset belongs to.
    scene_index: usize,
    /// Asset modality.
    modality: Modality,
    /// Generation outcome.
    status: AssetStatus,
    /// Content reference. Absent when generation failed.
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    reference: Option<AssetRef>,
    /// Provider that produced the content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    provider: Option<String>,
    /// Attempts spent on this asset.
    attempts: u32,
    /// Failure reason when the status is not `ok`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Asset {
    /// A successfully generated asset.
    pub fn ok(
        scene_index: usize,
        modality: Modality,
        reference: AssetRef,
        provider: impl Into<String>,
        attempts: u32,
    ) -> Self {
        Self {
            scene_index,
            modality,
            status: AssetStatus::Ok,
            reference: Some(reference),
            provider: Some(provider.into()),
            attempts,
            error: None,
        }
    }

    /// An asset whose generation was exhausted and replaced by a placeholder.
    pub fn placeholder(
        scene_index: usize,
        modality: Modality,
        uri: impl Into<String>,
        attempts: u32,
        error: impl Into<String>,
    ) -> Self {
        Self {
            scene_index,
            modality,
            status: AssetStatus::Placeholder,
            reference: Some(AssetRef::Placeholder { uri: uri.into() }),
            provider: None,
            attempts,
            error: Some(error.into()),
        }
    }

    /// An asset that could not be generated.
    pub fn failed(
        scene_index: usize,
        modality: Modality,
        attempts: u32,
        error: impl Into<String>,
    ) -> Self {
        Self {
            scene_index,
            modality,
            status: AssetStatus::Failed,
            reference: None,
            provider: None,
            attempts,
            error: Some(error.into()),
        }
    }

    /// Sort and uniqueness key.
    pub fn key(&self) -> (usize, Modality) {
        (self.scene_index, self.modality)
    }
}
