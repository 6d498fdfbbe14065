//! The assembled story record.

use crate::{Asset, AttemptRecord, Scene, StoryConcept};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How a story was generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct GenerationMetadata {
    /// Providers that produced accepted content, sorted.
    providers_used: Vec<String>,
    /// Attempts beyond the first for every logical request.
    retries: u32,
    /// Wall-clock generation time.
    duration_ms: u64,
    /// Estimated narration runtime of the whole story.
    estimated_runtime_secs: f64,
    /// Every provider attempt, in the order it was made.
    attempts: Vec<AttemptRecord>,
}

impl GenerationMetadata {
    /// Summarizes an attempt history.
    ///
    /// Each distinct attempt target counts as one logical request; every
    /// attempt past the first for a target is a retry.
    ///
    /// # Examples
    ///
    /// ```
    /// use taleweaver_core::GenerationMetadata;
    ///
    /// let metadata = GenerationMetadata::new(Vec::new(), 1200);
    /// assert_eq!(*metadata.retries(), 0);
    /// assert!(metadata.providers_used().is_empty());
    /// ```
    pub fn new(attempts: Vec<AttemptRecord>, duration_ms: u64) -> Self {
        let providers_used: BTreeSet<String> = attempts
            .iter()
            .filter(|attempt| attempt.succeeded())
            .map(|attempt| attempt.provider.clone())
            .collect();
        let targets: BTreeSet<&str> = attempts.iter().map(|a| a.target.as_str()).collect();
        let retries = attempts.len().saturating_sub(targets.len()) as u32;

        Self {
            providers_used: providers_used.into_iter().collect(),
            retries,
            duration_ms,
            estimated_runtime_secs: 0.0,
            attempts,
        }
    }

    /// Sets the estimated runtime.
    pub fn with_estimated_runtime(mut self, secs: f64) -> Self {
        self.estimated_runtime_secs = secs;
        self
    }

    /// Attempts made against one provider.
    pub fn attempts_for<'a>(&'a self, provider: &'a str) -> impl Iterator<Item = &'a AttemptRecord> {
        self.attempts.iter().filter(move |a| a.provider == provider)
    }
}

/// The complete, ordered story handed to serialization.
///
/// Only the story assembler creates records; it checks the scene ordering and
/// asset uniqueness invariants first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct StoryRecord {
    /// The input concept.
    concept: StoryConcept,
    /// Scenes in index order.
    scenes: Vec<Scene>,
    /// Assets sorted by scene index, then modality.
    assets: Vec<Asset>,
    /// Generation metadata.
    metadata: GenerationMetadata,
}

impl StoryRecord {
    /// Builds a record from checked parts.
    pub fn from_parts(
        concept: StoryConcept,
        scenes: Vec<Scene>,
        assets: Vec<Asset>,
        metadata: GenerationMetadata,
    ) -> Self {
        Self {
            concept,
            scenes,
            assets,
            metadata,
        }
    }

    /// Assets for one scene.
    pub fn assets_for(&self, scene_index: usize) -> impl Iterator<Item = &Asset> {
        self.assets
            .iter()
            .filter(move |asset| *asset.scene_index() == scene_index)
    }
}
