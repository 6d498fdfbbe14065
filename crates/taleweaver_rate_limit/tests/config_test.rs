use std::io::Write;
use std::time::Duration;
use taleweaver_core::{Modality, RequestClass, Tone};
use taleweaver_rate_limit::{FailureMode, ProviderKind, TaleweaverConfig};

#[test]
fn bundled_defaults_load_and_validate() -> anyhow::Result<()> {
    let config = TaleweaverConfig::bundled()?;

    assert_eq!(config.story.scene_count, 6);
    assert_eq!(config.story.story_timeout(), Duration::from_secs(900));
    assert_eq!(config.story.modalities, vec![Modality::Image, Modality::Audio]);
    assert_eq!(config.story.tones.len(), 16);
    assert_eq!(config.delegation.global_attempt_ceiling, 8);
    assert_eq!(config.assets.max_in_flight, 3);
    assert_eq!(config.assets.failure_mode, FailureMode::Failed);
    assert_eq!(
        config.delegation.preferences.for_class(RequestClass::Image),
        &["openai".to_string(), "stability".to_string()]
    );
    assert_eq!(config.providers["anthropic"].kind, ProviderKind::Anthropic);
    assert_eq!(config.providers["stability"].requests_per_minute, Some(150));
    Ok(())
}

#[test]
fn overrides_replace_only_named_keys() -> anyhow::Result<()> {
    let config = TaleweaverConfig::from_toml_str(
        r#"
        [story]
        scene_count = 3
        tones = ["calm", "hopeful"]

        [assets]
        failure_mode = "placeholder"

        [providers.anthropic]
        kind = "anthropic"
        classes = ["scene_text"]
        retry_budget = 4
        "#,
    )?;

    assert_eq!(config.story.scene_count, 3);
    assert_eq!(config.story.tones, vec![Tone::Calm, Tone::Hopeful]);
    assert_eq!(config.story.story_timeout_ms, 900_000);
    assert_eq!(config.assets.failure_mode, FailureMode::Placeholder);
    assert_eq!(config.assets.placeholder_for(Modality::Audio), "placeholder://audio");
    assert_eq!(config.retry_budget("anthropic"), 4);
    assert_eq!(config.retry_budget("openai"), 2);
    Ok(())
}

#[test]
fn zero_scene_count_is_rejected() {
    let err = TaleweaverConfig::from_toml_str("[story]\nscene_count = 0\n").unwrap_err();
    assert!(err.to_string().contains("story.scene_count"));
}

#[test]
fn zero_concurrency_is_rejected() {
    let err = TaleweaverConfig::from_toml_str("[assets]\nmax_in_flight = 0\n").unwrap_err();
    assert!(err.to_string().contains("assets.max_in_flight"));
}

#[test]
fn inverted_bounds_are_rejected() {
    let mut config = TaleweaverConfig::bundled().unwrap();
    config.validation.summary_min = 400;
    let err = config.validate().unwrap_err();
    assert_eq!(err.key.as_deref(), Some("validation.summary"));
}

#[test]
fn undefined_preference_is_rejected() {
    let err = TaleweaverConfig::from_toml_str(
        "[delegation.preferences]\naudio = [\"openai\", \"elevenlabs\"]\n",
    )
    .unwrap_err();
    assert!(err.to_string().contains("elevenlabs"));
}

#[test]
fn empty_tone_list_is_rejected() {
    let mut config = TaleweaverConfig::bundled().unwrap();
    config.story.tones.clear();
    assert!(config.validate().is_err());
}

#[test]
fn explicit_file_must_exist() {
    let missing = std::path::Path::new("/nonexistent/taleweaver-test.toml");
    assert!(TaleweaverConfig::load_with(Some(missing)).is_err());
}

#[test]
fn explicit_file_overrides_defaults() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(file, "[delegation]\nbackoff_base_ms = 100\nbackoff_cap_ms = 400")?;

    let config = TaleweaverConfig::load_with(Some(file.path()))?;
    let backoff = config.delegation.backoff();

    assert_eq!(backoff.delay(0), Duration::from_millis(100));
    assert_eq!(backoff.delay(5), Duration::from_millis(400));
    Ok(())
}

#[test]
fn rendered_toml_parses_back() -> anyhow::Result<()> {
    let config = TaleweaverConfig::bundled()?;
    let rendered = config.to_toml_string()?;
    assert!(rendered.contains("[story]"));

    let reparsed = TaleweaverConfig::from_toml_str(&rendered)?;
    assert_eq!(reparsed.story, config.story);
    assert_eq!(reparsed.delegation, config.delegation);
    Ok(())
}
