#![cfg(feature = "openai")]

mod test_utils;

use axum::http::StatusCode;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;
use taleweaver_core::{FailureKind, ProviderOutput, RequestClass};
use taleweaver_interface::StoryProvider;
use taleweaver_models::build_provider;
use taleweaver_rate_limit::ProviderKind;
use test_utils::{StubServer, request, stub_config};

const ALL_CLASSES: [RequestClass; 3] = [RequestClass::SceneText, RequestClass::Image, RequestClass::Audio];

async fn openai(server: &StubServer) -> anyhow::Result<std::sync::Arc<dyn StoryProvider>> {
    let mut config = stub_config(ProviderKind::Openai, ALL_CLASSES.to_vec(), &server.base_url);
    config.temperature = Some(0.8);
    config.max_tokens = Some(1500);
    Ok(build_provider("openai", &config, "test-key")?)
}

#[tokio::test]
async fn chat_completion_returns_text() -> anyhow::Result<()> {
    let server = StubServer::json(
        StatusCode::OK,
        json!({"choices": [{"message": {"role": "assistant", "content": "{\"text\": \"Once\"}"}}]}),
    )
    .await;
    let provider = openai(&server).await?;

    let output = provider
        .generate(&request(RequestClass::SceneText, "Write scene 1"))
        .await?;

    assert_eq!(output, ProviderOutput::Text("{\"text\": \"Once\"}".to_string()));
    let sent = server.last();
    assert_eq!(sent.path, "/chat/completions");
    assert_eq!(sent.header("authorization").as_deref(), Some("Bearer test-key"));
    let body = sent.json();
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["messages"][1]["content"], "Write scene 1");
    assert_eq!(body["response_format"]["type"], "json_object");
    assert_eq!(body["max_tokens"], 1500);
    Ok(())
}

#[tokio::test]
async fn repair_hint_is_appended_to_user_message() -> anyhow::Result<()> {
    let server = StubServer::json(
        StatusCode::OK,
        json!({"choices": [{"message": {"content": "{}"}}]}),
    )
    .await;
    let provider = openai(&server).await?;
    let mut req = request(RequestClass::SceneText, "Write scene 1");
    req.payload.repair_hint = Some("summary too short".to_string());

    provider.generate(&req).await?;

    let body = server.last().json();
    let content = body["messages"][1]["content"].as_str().unwrap_or_default();
    assert!(content.starts_with("Write scene 1"));
    assert!(content.contains("summary too short"));
    Ok(())
}

#[tokio::test]
async fn image_generation_decodes_base64() -> anyhow::Result<()> {
    let png = b"\x89PNG fake";
    let server = StubServer::json(
        StatusCode::OK,
        json!({"data": [{"b64_json": STANDARD.encode(png)}]}),
    )
    .await;
    let provider = openai(&server).await?;

    let output = provider
        .generate(&request(RequestClass::Image, "A fox in the snow"))
        .await?;

    assert_eq!(
        output,
        ProviderOutput::Image {
            mime: "image/png".to_string(),
            data: png.to_vec()
        }
    );
    let sent = server.last();
    assert_eq!(sent.path, "/images/generations");
    assert_eq!(sent.json()["response_format"], "b64_json");
    Ok(())
}

#[tokio::test]
async fn image_url_is_passed_through() -> anyhow::Result<()> {
    let server = StubServer::json(
        StatusCode::OK,
        json!({"data": [{"url": "https://cdn.example/fox.png"}]}),
    )
    .await;
    let provider = openai(&server).await?;

    let output = provider
        .generate(&request(RequestClass::Image, "A fox"))
        .await?;

    assert_eq!(
        output,
        ProviderOutput::Url {
            mime: Some("image/png".to_string()),
            url: "https://cdn.example/fox.png".to_string()
        }
    );
    Ok(())
}

#[tokio::test]
async fn speech_strips_ssml_and_returns_audio() -> anyhow::Result<()> {
    let server = StubServer::start(StatusCode::OK, "audio/mpeg", vec![0xFF, 0xFB, 0x90]).await;
    let provider = openai(&server).await?;

    let output = provider
        .generate(&request(
            RequestClass::Audio,
            r#"<speak><prosody rate="slow">Good night.</prosody></speak>"#,
        ))
        .await?;

    assert_eq!(
        output,
        ProviderOutput::Audio {
            mime: "audio/mpeg".to_string(),
            data: vec![0xFF, 0xFB, 0x90]
        }
    );
    let body = server.last().json();
    assert_eq!(body["input"], "Good night.");
    assert_eq!(body["voice"], "alloy");
    assert_eq!(body["model"], "tts-1");
    Ok(())
}

#[tokio::test]
async fn rate_limit_is_classified() -> anyhow::Result<()> {
    let server = StubServer::json(
        StatusCode::TOO_MANY_REQUESTS,
        json!({"error": {"message": "Rate limit reached"}}),
    )
    .await;
    let provider = openai(&server).await?;

    let err = provider
        .generate(&request(RequestClass::SceneText, "Write"))
        .await
        .unwrap_err();

    assert_eq!(err.failure_kind(), FailureKind::RateLimited);
    Ok(())
}

#[tokio::test]
async fn server_error_is_unavailable() -> anyhow::Result<()> {
    let server = StubServer::raw(StatusCode::SERVICE_UNAVAILABLE, "overloaded").await;
    let provider = openai(&server).await?;

    let err = provider
        .generate(&request(RequestClass::Image, "A fox"))
        .await
        .unwrap_err();

    assert_eq!(err.failure_kind(), FailureKind::ProviderUnavailable);
    Ok(())
}

#[tokio::test]
async fn malformed_body_is_invalid_response() -> anyhow::Result<()> {
    let server = StubServer::raw(StatusCode::OK, "not json").await;
    let provider = openai(&server).await?;

    let err = provider
        .generate(&request(RequestClass::SceneText, "Write"))
        .await
        .unwrap_err();

    assert_eq!(err.failure_kind(), FailureKind::InvalidResponse);
    Ok(())
}

#[tokio::test]
async fn empty_completion_is_invalid_response() -> anyhow::Result<()> {
    let server = StubServer::json(
        StatusCode::OK,
        json!({"choices": [{"message": {"content": null, "refusal": "I can't help"}}]}),
    )
    .await;
    let provider = openai(&server).await?;

    let err = provider
        .generate(&request(RequestClass::SceneText, "Write"))
        .await
        .unwrap_err();

    assert_eq!(err.failure_kind(), FailureKind::InvalidResponse);
    assert!(err.kind.message().contains("I can't help"));
    Ok(())
}

#[tokio::test]
async fn unserved_class_is_unavailable_without_a_call() -> anyhow::Result<()> {
    let server = StubServer::raw(StatusCode::OK, "").await;
    let config = stub_config(
        ProviderKind::Openai,
        vec![RequestClass::SceneText],
        &server.base_url,
    );
    let provider = build_provider("openai", &config, "test-key")?;

    let err = provider
        .generate(&request(RequestClass::Audio, "Hello"))
        .await
        .unwrap_err();

    assert_eq!(err.failure_kind(), FailureKind::ProviderUnavailable);
    assert!(server.requests().is_empty());
    Ok(())
}
