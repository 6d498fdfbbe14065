use taleweaver_core::{AttemptOutcome, AttemptRecord, FailureKind, Modality, RequestClass};
use taleweaver_error::{
    DelegationError, DelegationErrorKind, ProviderError, ProviderErrorKind, RetryableError,
    StoryError, StoryErrorKind, TaleweaverError, TaleweaverErrorKind,
};

fn failed_attempt(provider: &str) -> AttemptRecord {
    AttemptRecord {
        class: RequestClass::SceneText,
        target: "scene 1".to_string(),
        provider: provider.to_string(),
        outcome: AttemptOutcome::Failed {
            kind: FailureKind::Timeout,
            message: "no answer".to_string(),
        },
        elapsed_ms: 30_000,
    }
}

#[test]
fn provider_kinds_map_to_failure_kinds() {
    let cases = [
        (ProviderErrorKind::RateLimited("429".into()), FailureKind::RateLimited, true),
        (ProviderErrorKind::Timeout("slow".into()), FailureKind::Timeout, true),
        (
            ProviderErrorKind::ProviderUnavailable("503".into()),
            FailureKind::ProviderUnavailable,
            false,
        ),
        (
            ProviderErrorKind::InvalidResponse("not json".into()),
            FailureKind::InvalidResponse,
            true,
        ),
    ];

    for (kind, expected, retryable) in cases {
        let err = ProviderError::new(kind);
        assert_eq!(err.failure_kind(), expected);
        assert_eq!(err.is_retryable(), retryable);
    }
}

#[test]
fn provider_error_records_caller_location() {
    let err = ProviderError::unavailable("connection refused");
    assert!(err.file.ends_with("error_test.rs"));
    assert_eq!(err.kind.message(), "connection refused");
}

#[test]
fn delegation_error_reports_last_failure() {
    let err = DelegationError::new(
        DelegationErrorKind::GenerationExhausted {
            class: RequestClass::SceneText,
            attempts: 2,
        },
        vec![failed_attempt("primary"), failed_attempt("secondary")],
    );

    assert_eq!(err.attempts(), 2);
    assert!(!err.is_cancelled());
    let last = err.last_failure().unwrap();
    assert!(last.contains("secondary"));
    assert!(format!("{}", err).contains("scene_text generation exhausted after 2 attempts"));
}

#[test]
fn scene_failure_lists_attempted_providers() {
    let err = StoryError::new(StoryErrorKind::SceneGenerationFailed {
        index: 1,
        reason: "exhausted".to_string(),
        history: vec![failed_attempt("primary"), failed_attempt("secondary")],
    });
    let rendered = format!("{}", err);
    assert!(rendered.contains("Scene 1 generation failed"));
    assert!(rendered.contains("primary, secondary"));
    assert!(err.is_fatal());
}

#[test]
fn asset_failures_are_not_fatal() {
    let err = StoryError::new(StoryErrorKind::AssetGenerationFailed {
        scene_index: 0,
        modality: Modality::Image,
        reason: "all providers failed".to_string(),
    });
    assert!(!err.is_fatal());
    assert!(format!("{}", err).contains("Scene 0 image generation failed"));
}

#[test]
fn story_errors_convert_into_top_level_error() {
    let err: TaleweaverError =
        StoryError::new(StoryErrorKind::AssemblyInvariantViolation("gap".into())).into();
    assert!(matches!(err.kind(), TaleweaverErrorKind::Story(_)));
    assert!(err.as_story().is_some());
    assert!(format!("{}", err).starts_with("Taleweaver Error:"));
}
