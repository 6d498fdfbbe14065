//! Generation requests handed to providers.

use crate::{Continuity, Tone};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Category of generation work. Governs which providers are eligible.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RequestClass {
    /// Narrative text for one scene.
    SceneText,
    /// Illustration for one scene.
    Image,
    /// Narrated audio for one scene.
    Audio,
}

/// Structured context that travels alongside the prompt.
///
/// Adapters may ignore it; test doubles and prompt-aware adapters read it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayloadContext {
    /// Human-readable label of what is being generated (e.g. `scene 2 image`).
    pub target: String,
    /// Scene index the request belongs to.
    pub scene_index: Option<usize>,
    /// Total number of scenes in the story.
    pub scene_count: Option<usize>,
    /// Carry-over state from the previous scene.
    pub continuity: Option<Continuity>,
    /// Tones the response may use.
    pub allowed_tones: Vec<Tone>,
}

/// Prompt plus context for one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    /// Opaque prompt text.
    pub prompt: String,
    /// Structured context.
    pub context: PayloadContext,
    /// Feedback from the previous rejected attempt, if any.
    pub repair_hint: Option<String>,
}

impl Payload {
    /// Creates a payload from a prompt and context.
    pub fn new(prompt: impl Into<String>, context: PayloadContext) -> Self {
        Self {
            prompt: prompt.into(),
            context,
            repair_hint: None,
        }
    }

    /// Prompt text with the repair hint appended when present.
    pub fn prompt_with_repair(&self) -> String {
        match &self.repair_hint {
            Some(hint) => format!(
                "{}\n\nYour previous answer was rejected: {}\nReturn a corrected answer.",
                self.prompt, hint
            ),
            None => self.prompt.clone(),
        }
    }
}

/// Attempt and time budget for one logical request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestBudget {
    /// Maximum attempts across every provider.
    pub max_attempts: u32,
    /// Per-call timeout. When unset, each provider's profile timeout governs.
    pub timeout: Option<Duration>,
}

impl RequestBudget {
    /// Timeout for a call to a provider whose own limit is `profile_timeout`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use taleweaver_core::RequestBudget;
    ///
    /// let open = RequestBudget::default();
    /// assert_eq!(open.call_timeout(Duration::from_secs(180)), Duration::from_secs(180));
    ///
    /// let tight = RequestBudget { timeout: Some(Duration::from_secs(30)), ..open };
    /// assert_eq!(tight.call_timeout(Duration::from_secs(180)), Duration::from_secs(30));
    /// ```
    pub fn call_timeout(&self, profile_timeout: Duration) -> Duration {
        match self.timeout {
            Some(limit) => profile_timeout.min(limit),
            None => profile_timeout,
        }
    }
}

impl Default for RequestBudget {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            timeout: None,
        }
    }
}

/// One logical generation request.
///
/// # Examples
///
/// ```
/// use taleweaver_core::{GenerationRequest, Payload, PayloadContext, RequestClass};
///
/// let request = GenerationRequest::builder()
///     .class(RequestClass::SceneText)
///     .payload(Payload::new("Write scene 1", PayloadContext::default()))
///     .build()
///     .unwrap();
///
/// assert_eq!(request.class, RequestClass::SceneText);
/// assert_eq!(request.budget.max_attempts, 8);
/// ```
#[derive(Debug, Clone, PartialEq, derive_builder::Builder)]
#[builder(setter(into))]
pub struct GenerationRequest {
    /// Request class.
    pub class: RequestClass,
    /// Prompt and context.
    pub payload: Payload,
    /// Attempt and time budget.
    #[builder(default)]
    pub budget: RequestBudget,
}

impl GenerationRequest {
    /// Creates a new request builder.
    pub fn builder() -> GenerationRequestBuilder {
        GenerationRequestBuilder::default()
    }

    /// Label of the generation target, used in attempt history.
    pub fn target(&self) -> &str {
        &self.payload.context.target
    }
}
