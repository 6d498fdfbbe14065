//! Concurrent, admission-gated asset generation.

use crate::{ImagePrompter, SsmlBuilder};
use std::collections::BTreeMap;
use taleweaver_core::{
    Asset, AssetRef, AssetStatus, AttemptRecord, GenerationRequest, Modality, Payload, PayloadContext,
    ProviderOutput, RequestBudget, Scene, StoryConcept,
};
use taleweaver_delegation::Delegator;
use taleweaver_error::{StoryError, StoryErrorKind};
use taleweaver_rate_limit::{AdmissionGate, AssetsConfig, FailureMode, TaleweaverConfig};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Reason recorded for pairs the deadline stopped before admission.
pub const NOT_ADMITTED: &str = "cancelled before admission";

/// Every asset of a story and the attempts spent on them.
#[derive(Debug, Clone)]
pub struct AssetRun {
    /// One asset per (scene, modality), sorted
    pub assets: Vec<Asset>,
    /// Attempts, grouped per asset in (scene, modality) order
    pub history: Vec<AttemptRecord>,
}

struct AssetOutcome {
    asset: Asset,
    history: Vec<AttemptRecord>,
}

/// Generates images and narration for accepted scenes.
///
/// Every (scene, modality) pair runs as its own task; a task must pass the
/// shared [`AdmissionGate`] before calling any provider, so at most
/// `max_in_flight` asset requests are outstanding for the whole story.
/// Failures never propagate: an exhausted pair becomes a `failed` or
/// `placeholder` asset.
#[derive(Debug, Clone)]
pub struct AssetCoordinator {
    delegator: Delegator,
    gate: AdmissionGate,
    modalities: Vec<Modality>,
    assets: AssetsConfig,
    images: ImagePrompter,
    budget: RequestBudget,
}

impl AssetCoordinator {
    /// Creates a coordinator with its own admission gate.
    pub fn new(delegator: Delegator, modalities: Vec<Modality>, assets: AssetsConfig) -> Self {
        let gate = AdmissionGate::new(assets.max_in_flight);
        let images = ImagePrompter::new(assets.image_style.clone());
        Self {
            delegator,
            gate,
            modalities,
            assets,
            images,
            budget: RequestBudget::default(),
        }
    }

    /// Coordinator configured from `[story]`, `[assets]` and `[delegation]`.
    pub fn from_config(config: &TaleweaverConfig, delegator: Delegator) -> Self {
        Self::new(delegator, config.story.modalities.clone(), config.assets.clone()).with_budget(
            RequestBudget {
                max_attempts: config.delegation.global_attempt_ceiling,
                ..RequestBudget::default()
            },
        )
    }

    /// Shares an existing gate instead of the coordinator's own.
    pub fn with_gate(mut self, gate: AdmissionGate) -> Self {
        self.gate = gate;
        self
    }

    /// Sets the per-request budget.
    pub fn with_budget(mut self, budget: RequestBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Records exhausted assets as placeholders instead of failures.
    pub fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.assets.failure_mode = mode;
        self
    }

    /// The admission gate.
    pub fn gate(&self) -> &AdmissionGate {
        &self.gate
    }

    /// Generates every configured modality for every scene.
    ///
    /// Returns once every spawned task has resolved. After `cancel` fires,
    /// pairs still waiting for admission are recorded as failed.
    #[tracing::instrument(skip_all, fields(scenes = scenes.len(), modalities = ?self.modalities))]
    pub async fn generate(
        &self,
        concept: &StoryConcept,
        scenes: &[Scene],
        cancel: &CancellationToken,
    ) -> AssetRun {
        let mut tasks = JoinSet::new();
        let mut expected = Vec::new();

        for scene in scenes {
            for &modality in &self.modalities {
                let index = *scene.index();
                expected.push((index, modality));
                let request = self.asset_request(scene, concept, modality);
                let delegator = self.delegator.clone();
                let gate = self.gate.clone();
                let cancel = cancel.clone();
                let mode = self.assets.failure_mode;
                let placeholder = self.assets.placeholder_for(modality).to_string();

                tasks.spawn(async move {
                    generate_asset(
                        index,
                        modality,
                        request,
                        delegator,
                        gate,
                        cancel,
                        mode,
                        placeholder,
                    )
                    .await
                });
            }
        }
        tracing::debug!(tasks = expected.len(), "Asset tasks spawned");

        let mut outcomes: BTreeMap<(usize, Modality), AssetOutcome> = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => {
                    outcomes.insert(outcome.asset.key(), outcome);
                }
                Err(e) => tracing::error!(error = %e, "Asset task failed to complete"),
            }
        }

        for key in expected {
            outcomes.entry(key).or_insert_with(|| AssetOutcome {
                asset: Asset::failed(key.0, key.1, 0, "asset task panicked"),
                history: Vec::new(),
            });
        }

        let mut assets = Vec::with_capacity(outcomes.len());
        let mut history = Vec::new();
        for (_, outcome) in outcomes {
            assets.push(outcome.asset);
            history.extend(outcome.history);
        }
        tracing::info!(
            ok = assets.iter().filter(|a| *a.status() == AssetStatus::Ok).count(),
            total = assets.len(),
            "Assets generated"
        );
        AssetRun { assets, history }
    }

    fn asset_request(
        &self,
        scene: &Scene,
        concept: &StoryConcept,
        modality: Modality,
    ) -> GenerationRequest {
        let prompt = match modality {
            Modality::Image => self.images.prompt(scene, concept),
            Modality::Audio => SsmlBuilder::build(scene),
        };
        let context = PayloadContext {
            target: format!("scene {} {}", scene.index(), modality),
            scene_index: Some(*scene.index()),
            scene_count: None,
            continuity: None,
            allowed_tones: Vec::new(),
        };
        GenerationRequest {
            class: modality.request_class(),
            payload: Payload::new(prompt, context),
            budget: self.budget,
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn generate_asset(
    index: usize,
    modality: Modality,
    request: GenerationRequest,
    delegator: Delegator,
    gate: AdmissionGate,
    cancel: CancellationToken,
    mode: FailureMode,
    placeholder: String,
) -> AssetOutcome {
    let permit = tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        permit = gate.acquire() => permit,
    };
    let Some(_permit) = permit else {
        tracing::warn!(scene = index, %modality, "Asset not admitted before cancellation");
        return AssetOutcome {
            asset: Asset::failed(index, modality, 0, NOT_ADMITTED),
            history: Vec::new(),
        };
    };

    match delegator
        .delegate(request, |output| accept(modality, output), &cancel)
        .await
    {
        Ok(delegated) => {
            let attempts = delegated.history.len() as u32;
            tracing::debug!(scene = index, %modality, provider = %delegated.provider, attempts, "Asset generated");
            AssetOutcome {
                asset: Asset::ok(index, modality, delegated.value, delegated.provider, attempts),
                history: delegated.history,
            }
        }
        Err(e) => {
            let attempts = e.attempts();
            let reason = match e.last_failure() {
                Some(last) => format!("{}; last failure: {}", e.kind, last),
                None => e.kind.to_string(),
            };
            let error = StoryError::new(StoryErrorKind::AssetGenerationFailed {
                scene_index: index,
                modality,
                reason,
            });
            let message = error.kind.to_string();
            tracing::warn!(scene = index, %modality, attempts, error = %message, "Asset degraded");
            let asset = match mode {
                FailureMode::Placeholder if !e.is_cancelled() => {
                    Asset::placeholder(index, modality, placeholder, attempts, message)
                }
                _ => Asset::failed(index, modality, attempts, message),
            };
            AssetOutcome {
                asset,
                history: e.history,
            }
        }
    }
}

/// Accepts outputs of the right medium.
fn accept(modality: Modality, output: ProviderOutput) -> Result<AssetRef, String> {
    match (modality, output) {
        (Modality::Image, ProviderOutput::Image { mime, data })
        | (Modality::Audio, ProviderOutput::Audio { mime, data }) => {
            if data.is_empty() {
                Err(format!("{} output was empty", modality))
            } else {
                Ok(AssetRef::inline(mime, &data))
            }
        }
        (_, ProviderOutput::Url { mime, url }) => Ok(AssetRef::Url { mime, url }),
        (modality, other) => Err(format!(
            "expected {} output, got {}",
            modality,
            other.kind_name()
        )),
    }
}
