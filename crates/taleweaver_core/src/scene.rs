//! Validated scenes and the continuity carried between them.

use crate::Tone;
use serde::{Deserialize, Serialize};

/// Speaking rate used to estimate narration length.
const WORDS_PER_SECOND: f64 = 2.5;

/// Shortest runtime a scene is estimated to take.
const MIN_SCENE_SECS: f64 = 5.0;

/// Carry-over state derived from an accepted scene and passed into the next
/// scene's request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Continuity {
    /// Index of the scene this summary was derived from.
    pub from_index: usize,
    /// Closing sentences of that scene's narration.
    pub recap: String,
    /// Where that scene left off visually.
    pub setting: String,
    /// Characters present in that scene.
    pub characters: Vec<String>,
    /// Tone the scene ended on.
    pub tone: Tone,
}

/// One validated scene in a story.
///
/// Scenes are immutable once validated; the orchestrator creates them and the
/// assembler owns them afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Position in the story, starting at 0.
    index: usize,
    /// Narration text.
    text: String,
    /// Emotional tone tag.
    tone: Tone,
    /// Short description of what happens.
    summary: String,
    /// Visual description used for illustration.
    visual_description: String,
    /// Continuity this scene was generated from. `None` for the first scene.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    continuity: Option<Continuity>,
}

impl Scene {
    /// Creates a scene from validated parts.
    pub fn new(
        index: usize,
        text: impl Into<String>,
        tone: Tone,
        summary: impl Into<String>,
        visual_description: impl Into<String>,
        continuity: Option<Continuity>,
    ) -> Self {
        Self {
            index,
            text: text.into(),
            tone,
            summary: summary.into(),
            visual_description: visual_description.into(),
            continuity,
        }
    }

    /// Estimated narration runtime in seconds.
    ///
    /// # Examples
    ///
    /// ```
    /// use taleweaver_core::{Scene, Tone};
    ///
    /// let short = Scene::new(0, "Once upon a time.", Tone::Calm, "opening", "a meadow", None);
    /// assert_eq!(short.estimated_duration_secs(), 5.0);
    /// ```
    pub fn estimated_duration_secs(&self) -> f64 {
        let words = self.text.split_whitespace().count() as f64;
        (words / WORDS_PER_SECOND).max(MIN_SCENE_SECS)
    }
}
