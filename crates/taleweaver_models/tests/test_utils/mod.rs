//! Local HTTP stub standing in for provider APIs.

#![allow(dead_code)]

use axum::Router;
use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode, Uri, header};
use std::sync::{Arc, Mutex};
use taleweaver_core::{GenerationRequest, Payload, PayloadContext, RequestClass};
use taleweaver_rate_limit::{ProviderConfig, ProviderKind};

/// One request the stub received.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or(serde_json::Value::Null)
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    }
}

/// A running stub that answers every request with one canned response.
pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl StubServer {
    pub async fn start(status: StatusCode, content_type: &'static str, body: Vec<u8>) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();
        let app = Router::new().fallback(move |uri: Uri, headers: HeaderMap, payload: Bytes| {
            let recorded = recorded.clone();
            let body = body.clone();
            async move {
                recorded.lock().unwrap().push(Recorded {
                    path: uri.path().to_string(),
                    headers,
                    body: payload.to_vec(),
                });
                (status, [(header::CONTENT_TYPE, content_type)], body)
            }
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    pub async fn json(status: StatusCode, body: serde_json::Value) -> Self {
        Self::start(status, "application/json", body.to_string().into_bytes()).await
    }

    pub async fn raw(status: StatusCode, body: &str) -> Self {
        Self::start(status, "text/plain", body.as_bytes().to_vec()).await
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> Recorded {
        self.requests().pop().expect("stub received a request")
    }
}

/// Provider section pointing at a stub.
pub fn stub_config(kind: ProviderKind, classes: Vec<RequestClass>, base_url: &str) -> ProviderConfig {
    let mut config = ProviderConfig::new(kind, classes);
    config.base_url = Some(base_url.to_string());
    config
}

pub fn request(class: RequestClass, prompt: &str) -> GenerationRequest {
    GenerationRequest::builder()
        .class(class)
        .payload(Payload::new(
            prompt,
            PayloadContext {
                target: "scene 0".to_string(),
                ..Default::default()
            },
        ))
        .build()
        .expect("valid request")
}
