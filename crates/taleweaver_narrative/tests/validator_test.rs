use taleweaver_core::{ProviderOutput, Tone};
use taleweaver_narrative::SceneValidator;
use taleweaver_rate_limit::ValidationConfig;

mod test_utils;
use test_utils::scene_json;

fn validator() -> SceneValidator {
    SceneValidator::new(ValidationConfig::default(), vec![Tone::Calm, Tone::Awe])
}

#[test]
fn accepts_fenced_json() {
    let response = format!("Here you go:\n```json\n{}\n```", scene_json(0, "awe"));
    let draft = validator().validate_text(&response).unwrap();
    assert_eq!(draft.tone, Tone::Awe);
    assert!(draft.narration.starts_with("Mia crept"));
}

#[test]
fn tone_is_matched_case_insensitively() {
    let draft = validator().validate_text(&scene_json(0, "Calm")).unwrap();
    assert_eq!(draft.tone, Tone::Calm);
}

#[test]
fn missing_field_is_named() {
    let err = validator()
        .validate_text(r#"{"narration": "x", "tone": "calm", "summary": "y"}"#)
        .unwrap_err();
    assert_eq!(err, "missing required field 'visual_description'");
}

#[test]
fn non_string_field_is_rejected() {
    let err = validator()
        .validate_text(r#"{"narration": 3, "tone": "calm", "summary": "y", "visual_description": "z"}"#)
        .unwrap_err();
    assert!(err.contains("must be a string, got a number"));
}

#[test]
fn summary_over_bound_is_rejected() {
    let mut value: serde_json::Value = serde_json::from_str(&scene_json(0, "calm")).unwrap();
    value["summary"] = serde_json::Value::String("s".repeat(301));
    let err = validator().validate_text(&value.to_string()).unwrap_err();
    assert_eq!(err, "summary must be 10-300 characters, got 301");
}

#[test]
fn non_text_output_is_rejected() {
    let output = ProviderOutput::Audio {
        mime: "audio/mpeg".into(),
        data: vec![1],
    };
    let err = validator().validate(output).unwrap_err();
    assert!(err.contains("expected a text response"));
}
