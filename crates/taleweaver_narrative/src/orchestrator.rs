//! Sequential scene generation.

use crate::{SceneBrief, SceneDraft, ScenePrompter, SceneValidator, StandardPrompter, derive_continuity};
use std::sync::Arc;
use taleweaver_core::{
    AttemptRecord, Continuity, GenerationRequest, Payload, PayloadContext, RequestBudget,
    RequestClass, Scene, StoryConcept,
};
use taleweaver_delegation::Delegator;
use taleweaver_error::{DelegationError, StoryError, StoryErrorKind};
use taleweaver_rate_limit::TaleweaverConfig;
use tokio_util::sync::CancellationToken;

/// Orchestrator state; every transition is logged at `debug`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneState {
    /// Nothing generated yet
    Init,
    /// Waiting on providers for scene `i`
    GeneratingScene(usize),
    /// Checking a response for scene `i`
    ValidatingScene(usize),
    /// Every scene accepted
    Complete,
    /// Scene `i` could not be generated
    Failed(usize),
}

impl std::fmt::Display for SceneState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneState::Init => write!(f, "init"),
            SceneState::GeneratingScene(i) => write!(f, "generating scene {}", i),
            SceneState::ValidatingScene(i) => write!(f, "validating scene {}", i),
            SceneState::Complete => write!(f, "complete"),
            SceneState::Failed(i) => write!(f, "failed at scene {}", i),
        }
    }
}

/// Accepted scenes and the attempts spent on them.
#[derive(Debug, Clone)]
pub struct SceneRun {
    /// Scenes in index order
    pub scenes: Vec<Scene>,
    /// Every scene text attempt, in order
    pub history: Vec<AttemptRecord>,
}

/// Generates a story's scenes one after another.
///
/// Scene `i + 1` is requested only after scene `i` was accepted, and carries
/// the continuity derived from it. A scene whose delegation is exhausted
/// aborts the whole run; scenes are never skipped.
#[derive(Clone)]
pub struct SceneOrchestrator {
    delegator: Delegator,
    validator: SceneValidator,
    prompter: Arc<dyn ScenePrompter>,
    scene_count: usize,
    budget: RequestBudget,
}

impl std::fmt::Debug for SceneOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneOrchestrator")
            .field("validator", &self.validator)
            .field("scene_count", &self.scene_count)
            .field("budget", &self.budget)
            .finish_non_exhaustive()
    }
}

impl SceneOrchestrator {
    /// Creates an orchestrator with the standard prompt wording.
    pub fn new(delegator: Delegator, validator: SceneValidator, scene_count: usize) -> Self {
        Self {
            delegator,
            validator,
            prompter: Arc::new(StandardPrompter),
            scene_count,
            budget: RequestBudget::default(),
        }
    }

    /// Orchestrator configured from `[story]`, `[validation]` and `[delegation]`.
    pub fn from_config(config: &TaleweaverConfig, delegator: Delegator) -> Self {
        Self::new(
            delegator,
            SceneValidator::from_config(config),
            config.story.scene_count,
        )
        .with_budget(RequestBudget {
            max_attempts: config.delegation.global_attempt_ceiling,
            ..RequestBudget::default()
        })
    }

    /// Replaces the prompt wording.
    pub fn with_prompter(mut self, prompter: Arc<dyn ScenePrompter>) -> Self {
        self.prompter = prompter;
        self
    }

    /// Sets the per-request budget.
    pub fn with_budget(mut self, budget: RequestBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Sets the number of scenes.
    pub fn with_scene_count(mut self, scene_count: usize) -> Self {
        self.scene_count = scene_count;
        self
    }

    /// Number of scenes generated per story.
    pub fn scene_count(&self) -> usize {
        self.scene_count
    }

    /// Generates every scene for `concept`.
    ///
    /// # Errors
    ///
    /// `SceneGenerationFailed` naming the first scene whose delegation was
    /// exhausted or cancelled, with that scene's attempt history.
    #[tracing::instrument(skip_all, fields(scene_count = self.scene_count))]
    pub async fn run(
        &self,
        concept: &StoryConcept,
        cancel: &CancellationToken,
    ) -> Result<SceneRun, StoryError> {
        let mut state = SceneState::Init;
        tracing::debug!(%state, "Scene orchestration started");

        let mut scenes: Vec<Scene> = Vec::with_capacity(self.scene_count);
        let mut history: Vec<AttemptRecord> = Vec::new();
        let mut continuity: Option<Continuity> = None;

        for index in 0..self.scene_count {
            state = transition(state, SceneState::GeneratingScene(index));
            let request = self.scene_request(concept, index, continuity.as_ref());

            let validator = &self.validator;
            let validating = SceneState::ValidatingScene(index);
            let outcome = self
                .delegator
                .delegate(
                    request,
                    |output| {
                        tracing::debug!(state = %validating, "Validating response");
                        validator.validate(output)
                    },
                    cancel,
                )
                .await;

            match outcome {
                Ok(delegated) => {
                    history.extend(delegated.history);
                    let scene = build_scene(index, delegated.value, continuity.take());
                    continuity = Some(derive_continuity(&scene, concept));
                    tracing::info!(
                        index,
                        tone = %scene.tone(),
                        provider = %delegated.provider,
                        "Scene accepted"
                    );
                    scenes.push(scene);
                }
                Err(e) => {
                    transition(state, SceneState::Failed(index));
                    return Err(scene_failed(index, e));
                }
            }
        }

        transition(state, SceneState::Complete);
        Ok(SceneRun { scenes, history })
    }

    fn scene_request(
        &self,
        concept: &StoryConcept,
        index: usize,
        continuity: Option<&Continuity>,
    ) -> GenerationRequest {
        let brief = SceneBrief {
            concept,
            index,
            scene_count: self.scene_count,
            continuity,
            tones: self.validator.tones(),
        };
        let context = PayloadContext {
            target: format!("scene {}", index),
            scene_index: Some(index),
            scene_count: Some(self.scene_count),
            continuity: continuity.cloned(),
            allowed_tones: self.validator.tones().to_vec(),
        };
        GenerationRequest {
            class: RequestClass::SceneText,
            payload: Payload::new(self.prompter.scene_prompt(&brief), context),
            budget: self.budget,
        }
    }
}

fn transition(from: SceneState, to: SceneState) -> SceneState {
    tracing::debug!(%from, %to, "Scene state transition");
    to
}

fn build_scene(index: usize, draft: SceneDraft, continuity: Option<Continuity>) -> Scene {
    Scene::new(
        index,
        draft.narration,
        draft.tone,
        draft.summary,
        draft.visual_description,
        continuity,
    )
}

#[track_caller]
fn scene_failed(index: usize, err: DelegationError) -> StoryError {
    let reason = match err.last_failure() {
        Some(last) => format!("{}; last failure: {}", err.kind, last),
        None => err.kind.to_string(),
    };
    tracing::error!(index, attempts = err.attempts(), %reason, "Scene generation failed");
    StoryError::new(StoryErrorKind::SceneGenerationFailed {
        index,
        reason,
        history: err.history,
    })
}
