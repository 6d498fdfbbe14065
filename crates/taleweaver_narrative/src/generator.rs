//! The concept → scenes → assets → record pipeline.

use crate::{AssetCoordinator, SceneOrchestrator, ScenePrompter, StoryAssembler};
use std::sync::Arc;
use std::time::{Duration, Instant};
use taleweaver_core::{GenerationMetadata, StoryConcept, StoryRecord};
use taleweaver_delegation::Delegator;
use taleweaver_error::{ConfigError, StoryError, StoryErrorKind, TaleweaverResult};
use taleweaver_interface::ProviderRegistry;
use taleweaver_rate_limit::{FailureMode, TaleweaverConfig};
use tokio_util::sync::CancellationToken;

/// Generates complete stories.
///
/// Each call to [`generate`](Self::generate) builds its own delegation plans
/// and attempt history; a generator can serve concurrent runs.
///
/// # Examples
///
/// ```no_run
/// use taleweaver_core::StoryConcept;
/// use taleweaver_interface::ProviderRegistry;
/// use taleweaver_narrative::StoryGenerator;
/// use taleweaver_rate_limit::TaleweaverConfig;
///
/// # async fn run(registry: ProviderRegistry, concept: StoryConcept) -> Result<(), Box<dyn std::error::Error>> {
/// let config = TaleweaverConfig::load()?;
/// let generator = StoryGenerator::from_config(&config, registry);
/// let record = generator.generate(&concept).await?;
/// println!("{} scenes", record.scenes().len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct StoryGenerator {
    scenes: SceneOrchestrator,
    assets: AssetCoordinator,
    story_timeout: Duration,
}

impl StoryGenerator {
    /// Creates a generator from its stages.
    pub fn new(scenes: SceneOrchestrator, assets: AssetCoordinator, story_timeout: Duration) -> Self {
        Self {
            scenes,
            assets,
            story_timeout,
        }
    }

    /// Generator for `config`, delegating to `registry`.
    pub fn from_config(config: &TaleweaverConfig, registry: ProviderRegistry) -> Self {
        Self::with_delegator(config, Delegator::from_config(config, registry))
    }

    /// Generator for `config` sharing an existing delegator.
    pub fn with_delegator(config: &TaleweaverConfig, delegator: Delegator) -> Self {
        Self::new(
            SceneOrchestrator::from_config(config, delegator.clone()),
            AssetCoordinator::from_config(config, delegator),
            config.story.story_timeout(),
        )
    }

    /// Replaces the scene prompt wording.
    pub fn with_prompter(mut self, prompter: Arc<dyn ScenePrompter>) -> Self {
        self.scenes = self.scenes.with_prompter(prompter);
        self
    }

    /// Overrides the number of scenes.
    pub fn with_scene_count(mut self, scene_count: usize) -> Self {
        self.scenes = self.scenes.with_scene_count(scene_count);
        self
    }

    /// Overrides the asset failure mode.
    pub fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.assets = self.assets.with_failure_mode(mode);
        self
    }

    /// Overrides the per-story deadline.
    pub fn with_story_timeout(mut self, story_timeout: Duration) -> Self {
        self.story_timeout = story_timeout;
        self
    }

    /// Generates a story under the configured deadline.
    pub async fn generate(&self, concept: &StoryConcept) -> TaleweaverResult<StoryRecord> {
        self.generate_with_cancel(concept, CancellationToken::new())
            .await
    }

    /// Generates a story; cancelling `cancel` behaves like the deadline firing.
    ///
    /// # Errors
    ///
    /// - `Config` when the scene count is zero, before any provider is called
    /// - `InvalidConcept` before any provider is called
    /// - `SceneGenerationFailed` when a scene is exhausted or the deadline
    ///   passes during the scene phase
    /// - `AssemblyInvariantViolation` on internal inconsistencies
    ///
    /// Asset failures never fail the story.
    #[tracing::instrument(skip_all, fields(title = %concept.display_title(), timeout_ms = self.story_timeout.as_millis() as u64))]
    pub async fn generate_with_cancel(
        &self,
        concept: &StoryConcept,
        cancel: CancellationToken,
    ) -> TaleweaverResult<StoryRecord> {
        if self.scenes.scene_count() == 0 {
            return Err(ConfigError::for_key("story.scene_count", "must be at least 1").into());
        }
        concept.validate().map_err(|reason| {
            tracing::error!(%reason, "Concept rejected");
            StoryError::new(StoryErrorKind::InvalidConcept(reason))
        })?;

        let started = Instant::now();
        let deadline = spawn_deadline(cancel.clone(), self.story_timeout);
        tracing::info!("Story generation started");

        let result = self.run(concept, &cancel, started).await;
        deadline.abort();
        result
    }

    async fn run(
        &self,
        concept: &StoryConcept,
        cancel: &CancellationToken,
        started: Instant,
    ) -> TaleweaverResult<StoryRecord> {
        let scene_run = self.scenes.run(concept, cancel).await?;
        tracing::info!(scenes = scene_run.scenes.len(), "Scene phase complete");

        let asset_run = self.assets.generate(concept, &scene_run.scenes, cancel).await;

        let mut history = scene_run.history;
        history.extend(asset_run.history);
        let metadata = GenerationMetadata::new(history, started.elapsed().as_millis() as u64);

        let record = StoryAssembler::assemble(
            concept.clone(),
            scene_run.scenes,
            asset_run.assets,
            metadata,
        )?;
        tracing::info!(
            scenes = record.scenes().len(),
            assets = record.assets().len(),
            retries = *record.metadata().retries(),
            duration_ms = *record.metadata().duration_ms(),
            "Story complete"
        );
        Ok(record)
    }
}

/// Cancels `token` once `timeout` elapses.
fn spawn_deadline(token: CancellationToken, timeout: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = token.cancelled() => {}
            _ = tokio::time::sleep(timeout) => {
                tracing::warn!(timeout_ms = timeout.as_millis() as u64, "Story deadline reached, cancelling");
                token.cancel();
            }
        }
    })
}
