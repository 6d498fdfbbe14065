#![cfg(feature = "stability")]

mod test_utils;

use axum::http::StatusCode;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;
use taleweaver_core::{FailureKind, ProviderOutput, RequestClass};
use taleweaver_models::build_provider;
use taleweaver_rate_limit::ProviderKind;
use test_utils::{StubServer, request, stub_config};

#[tokio::test]
async fn text_to_image_decodes_first_artifact() -> anyhow::Result<()> {
    let png = b"\x89PNG stability";
    let server = StubServer::json(
        StatusCode::OK,
        json!({"artifacts": [{"base64": STANDARD.encode(png), "seed": 7, "finishReason": "SUCCESS"}]}),
    )
    .await;
    let config = stub_config(ProviderKind::Stability, vec![RequestClass::Image], &server.base_url);
    let provider = build_provider("stability", &config, "test-key")?;

    let output = provider
        .generate(&request(RequestClass::Image, "A lighthouse at dusk"))
        .await?;

    assert_eq!(
        output,
        ProviderOutput::Image {
            mime: "image/png".to_string(),
            data: png.to_vec()
        }
    );
    let sent = server.last();
    assert_eq!(
        sent.path,
        "/v1/generation/stable-diffusion-xl-1024-v1-0/text-to-image"
    );
    let body = sent.json();
    assert_eq!(body["text_prompts"][0]["text"], "A lighthouse at dusk");
    assert_eq!(body["samples"], 1);
    assert_eq!(body["width"], 1024);
    Ok(())
}

#[tokio::test]
async fn filtered_image_is_invalid_response() -> anyhow::Result<()> {
    let server = StubServer::json(
        StatusCode::OK,
        json!({"artifacts": [{"base64": "", "finishReason": "CONTENT_FILTERED"}]}),
    )
    .await;
    let config = stub_config(ProviderKind::Stability, vec![RequestClass::Image], &server.base_url);
    let provider = build_provider("stability", &config, "test-key")?;

    let err = provider
        .generate(&request(RequestClass::Image, "A lighthouse"))
        .await
        .unwrap_err();

    assert_eq!(err.failure_kind(), FailureKind::InvalidResponse);
    Ok(())
}

#[tokio::test]
async fn missing_artifacts_is_invalid_response() -> anyhow::Result<()> {
    let server = StubServer::json(StatusCode::OK, json!({"artifacts": []})).await;
    let config = stub_config(ProviderKind::Stability, vec![RequestClass::Image], &server.base_url);
    let provider = build_provider("stability", &config, "test-key")?;

    let err = provider
        .generate(&request(RequestClass::Image, "A lighthouse"))
        .await
        .unwrap_err();

    assert_eq!(err.failure_kind(), FailureKind::InvalidResponse);
    Ok(())
}

#[tokio::test]
async fn bad_prompt_is_invalid_response() -> anyhow::Result<()> {
    let server = StubServer::json(
        StatusCode::BAD_REQUEST,
        json!({"name": "invalid_prompts", "message": "prompt rejected"}),
    )
    .await;
    let config = stub_config(ProviderKind::Stability, vec![RequestClass::Image], &server.base_url);
    let provider = build_provider("stability", &config, "test-key")?;

    let err = provider
        .generate(&request(RequestClass::Image, "A lighthouse"))
        .await
        .unwrap_err();

    assert_eq!(err.failure_kind(), FailureKind::InvalidResponse);
    Ok(())
}
