//! Final story assembly.

use std::collections::BTreeSet;
use taleweaver_core::{Asset, AssetStatus, GenerationMetadata, Scene, StoryConcept, StoryRecord};
use taleweaver_error::{StoryError, StoryErrorKind};

/// Checks record invariants and produces the immutable [`StoryRecord`].
///
/// Pure: the same inputs always produce the same record.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoryAssembler;

impl StoryAssembler {
    /// Assembles a record.
    ///
    /// # Errors
    ///
    /// `AssemblyInvariantViolation` when the scene list is empty or not densely
    /// indexed from zero, an asset points at a missing scene, a (scene,
    /// modality) pair appears twice, or an `ok` asset has no reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use taleweaver_core::{GenerationMetadata, Scene, StoryConcept, Tone};
    /// use taleweaver_narrative::StoryAssembler;
    ///
    /// let concept = StoryConcept::builder()
    ///     .character("Mia", "a red fox")
    ///     .plot("two friends search the forest for a lost star")
    ///     .moral("friends make you brave")
    ///     .build();
    /// let scenes = vec![Scene::new(0, "Mia ran.", Tone::Excited, "run", "snow", None)];
    ///
    /// let record = StoryAssembler::assemble(concept, scenes, Vec::new(), GenerationMetadata::new(Vec::new(), 5))?;
    /// assert_eq!(record.scenes().len(), 1);
    /// assert_eq!(*record.metadata().estimated_runtime_secs(), 5.0);
    /// # Ok::<(), taleweaver_error::StoryError>(())
    /// ```
    #[tracing::instrument(skip_all, fields(scenes = scenes.len(), assets = assets.len()))]
    pub fn assemble(
        concept: StoryConcept,
        scenes: Vec<Scene>,
        mut assets: Vec<Asset>,
        metadata: GenerationMetadata,
    ) -> Result<StoryRecord, StoryError> {
        if scenes.is_empty() {
            return Err(violation("story has no scenes".to_string()));
        }
        for (position, scene) in scenes.iter().enumerate() {
            if *scene.index() != position {
                return Err(violation(format!(
                    "scene at position {} has index {}",
                    position,
                    scene.index()
                )));
            }
        }

        let mut seen = BTreeSet::new();
        for asset in &assets {
            if *asset.scene_index() >= scenes.len() {
                return Err(violation(format!(
                    "{} asset references missing scene {}",
                    asset.modality(),
                    asset.scene_index()
                )));
            }
            if !seen.insert(asset.key()) {
                return Err(violation(format!(
                    "duplicate {} asset for scene {}",
                    asset.modality(),
                    asset.scene_index()
                )));
            }
            if *asset.status() == AssetStatus::Ok && asset.reference().is_none() {
                return Err(violation(format!(
                    "ok {} asset for scene {} has no reference",
                    asset.modality(),
                    asset.scene_index()
                )));
            }
        }
        assets.sort_by_key(Asset::key);

        let runtime: f64 = scenes.iter().map(Scene::estimated_duration_secs).sum();
        let metadata = metadata.with_estimated_runtime(runtime);
        tracing::debug!(runtime_secs = runtime, "Story assembled");

        Ok(StoryRecord::from_parts(concept, scenes, assets, metadata))
    }
}

#[track_caller]
fn violation(message: String) -> StoryError {
    tracing::error!(%message, "Assembly invariant violated");
    StoryError::new(StoryErrorKind::AssemblyInvariantViolation(message))
}
