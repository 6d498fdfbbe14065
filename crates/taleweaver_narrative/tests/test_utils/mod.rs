//! Provider doubles and fixtures for pipeline tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use taleweaver_core::{
    GenerationRequest, ProviderOutput, RequestClass, StoryConcept, TargetAge, Tone,
};
use taleweaver_delegation::{Candidate, DelegationPolicy, Delegator};
use taleweaver_error::{ProviderError, ProviderErrorKind, ProviderResult};
use taleweaver_interface::{ProviderProfile, ProviderRegistry, StoryProvider};
use taleweaver_rate_limit::BackoffSchedule;

type Responder = dyn Fn(&GenerationRequest, usize) -> ProviderResult + Send + Sync;

/// Provider answering through a closure, with call counters and an
/// in-flight gauge.
pub struct FakeProvider {
    profile: ProviderProfile,
    responder: Box<Responder>,
    delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    seen: Mutex<Vec<GenerationRequest>>,
}

impl FakeProvider {
    pub fn new<F>(name: &str, classes: Vec<RequestClass>, responder: F) -> Self
    where
        F: Fn(&GenerationRequest, usize) -> ProviderResult + Send + Sync + 'static,
    {
        Self {
            profile: ProviderProfile::builder()
                .name(name)
                .classes(classes)
                .call_timeout(Duration::from_secs(30))
                .build()
                .expect("valid profile"),
            responder: Box::new(responder),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Writes a valid scene for whatever index is requested.
    pub fn writer(name: &str) -> Self {
        Self::new(name, vec![RequestClass::SceneText], |req, _| {
            let index = req.payload.context.scene_index.unwrap_or(0);
            Ok(ProviderOutput::Text(scene_json(index, "calm")))
        })
    }

    /// Serves images and audio with small fixed payloads.
    pub fn media(name: &str) -> Self {
        Self::new(
            name,
            vec![RequestClass::Image, RequestClass::Audio],
            |req, _| match req.class {
                RequestClass::Image => Ok(ProviderOutput::Image {
                    mime: "image/png".to_string(),
                    data: vec![137, 80, 78, 71],
                }),
                _ => Ok(ProviderOutput::Audio {
                    mime: "audio/mpeg".to_string(),
                    data: vec![255, 251],
                }),
            },
        )
    }

    /// Fails every call with the given kind.
    pub fn failing(name: &str, classes: Vec<RequestClass>, kind: ProviderErrorKind) -> Self {
        Self::new(name, classes, move |_, _| Err(ProviderError::new(kind.clone())))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl StoryProvider for FakeProvider {
    async fn generate(&self, req: &GenerationRequest) -> ProviderResult {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(req.clone());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let result = (self.responder)(req, call);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn profile(&self) -> &ProviderProfile {
        &self.profile
    }
}

/// A scene response that passes the default validation bounds.
pub fn scene_json(index: usize, tone: &str) -> String {
    serde_json::json!({
        "narration": format!(
            "Mia crept along the frozen river, scene {} of her search for the lost star. Leo followed close behind.",
            index
        ),
        "tone": tone,
        "summary": format!("Mia searches, part {}", index),
        "visual_description": format!(
            "A red fox and a small owl on a frozen river at dusk, part {}. Snow falls softly.",
            index
        ),
    })
    .to_string()
}

pub fn concept() -> StoryConcept {
    StoryConcept::builder()
        .character("Mia", "a red fox with a green scarf")
        .character("Leo", "a shy grey owl")
        .plot("two friends search the winter forest for a fallen star")
        .moral("courage grows when it is shared")
        .target_age(TargetAge::Child)
        .title("The Fallen Star")
        .build()
}

pub fn all_tones() -> Vec<Tone> {
    Tone::all()
}

pub fn fast_backoff() -> BackoffSchedule {
    BackoffSchedule::new(Duration::from_millis(1), Duration::from_millis(4))
}

/// Delegator preferring providers in the given order, budget 2 each.
pub fn delegator(
    providers: &[Arc<FakeProvider>],
    scene_text: &[&str],
    image: &[&str],
    audio: &[&str],
) -> Delegator {
    let mut registry = ProviderRegistry::new();
    for provider in providers {
        registry.register(provider.clone());
    }
    let candidates =
        |names: &[&str]| names.iter().map(|name| Candidate::new(*name, 2)).collect::<Vec<_>>();
    let policy = DelegationPolicy::new(8, fast_backoff())
        .with_candidates(RequestClass::SceneText, candidates(scene_text))
        .with_candidates(RequestClass::Image, candidates(image))
        .with_candidates(RequestClass::Audio, candidates(audio));
    Delegator::new(registry, policy)
}
