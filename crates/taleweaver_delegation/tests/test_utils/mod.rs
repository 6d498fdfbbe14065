//! Scripted provider doubles for delegation tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use taleweaver_core::{GenerationRequest, Payload, PayloadContext, ProviderOutput, RequestClass};
use taleweaver_error::{ProviderError, ProviderErrorKind, ProviderResult};
use taleweaver_interface::{ProviderProfile, StoryProvider};

/// One scripted reply.
#[derive(Clone)]
pub enum Reply {
    Text(String),
    Image,
    RateLimited,
    Timeout,
    Unavailable,
    Invalid,
    /// Sleeps before answering with text.
    Slow(Duration, String),
}

impl Reply {
    fn into_result(self) -> ProviderResult {
        match self {
            Reply::Text(text) | Reply::Slow(_, text) => Ok(ProviderOutput::Text(text)),
            Reply::Image => Ok(ProviderOutput::Image {
                mime: "image/png".to_string(),
                data: vec![137, 80, 78, 71],
            }),
            Reply::RateLimited => Err(ProviderError::new(ProviderErrorKind::RateLimited(
                "HTTP 429".to_string(),
            ))),
            Reply::Timeout => Err(ProviderError::new(ProviderErrorKind::Timeout(
                "upstream timeout".to_string(),
            ))),
            Reply::Unavailable => Err(ProviderError::unavailable("HTTP 503")),
            Reply::Invalid => Err(ProviderError::invalid_response("garbled")),
        }
    }
}

/// Provider that replays a script, then repeats a fallback reply.
pub struct ScriptedProvider {
    profile: ProviderProfile,
    script: Mutex<VecDeque<Reply>>,
    fallback: Reply,
    calls: AtomicUsize,
    seen: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedProvider {
    pub fn new(name: &str, classes: Vec<RequestClass>, fallback: Reply) -> Self {
        Self::with_timeout(name, classes, fallback, Duration::from_secs(30))
    }

    pub fn with_timeout(
        name: &str,
        classes: Vec<RequestClass>,
        fallback: Reply,
        call_timeout: Duration,
    ) -> Self {
        Self {
            profile: ProviderProfile::builder()
                .name(name)
                .classes(classes)
                .call_timeout(call_timeout)
                .build()
                .expect("valid profile"),
            script: Mutex::new(VecDeque::new()),
            fallback,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn text(name: &str, fallback: Reply) -> Self {
        Self::new(name, vec![RequestClass::SceneText], fallback)
    }

    pub fn then(self, reply: Reply) -> Self {
        self.script.lock().unwrap().push_back(reply);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn repair_hints(&self) -> Vec<Option<String>> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|req| req.payload.repair_hint.clone())
            .collect()
    }
}

#[async_trait]
impl StoryProvider for ScriptedProvider {
    async fn generate(&self, req: &GenerationRequest) -> ProviderResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(req.clone());
        let reply = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        if let Reply::Slow(delay, _) = &reply {
            tokio::time::sleep(*delay).await;
        }
        reply.into_result()
    }

    fn profile(&self) -> &ProviderProfile {
        &self.profile
    }
}

/// A scene-text request labelled `scene 0`.
pub fn text_request() -> GenerationRequest {
    request(RequestClass::SceneText)
}

pub fn request(class: RequestClass) -> GenerationRequest {
    let context = PayloadContext {
        target: "scene 0".to_string(),
        scene_index: Some(0),
        ..Default::default()
    };
    GenerationRequest::builder()
        .class(class)
        .payload(Payload::new("write a scene", context))
        .build()
        .expect("valid request")
}

/// Accepts any text output.
pub fn accept_text(output: ProviderOutput) -> Result<String, String> {
    output
        .as_text()
        .map(str::to_string)
        .ok_or_else(|| format!("expected text, got {}", output.kind_name()))
}
