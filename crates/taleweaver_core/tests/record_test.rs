use taleweaver_core::{
    Asset, AssetRef, AttemptOutcome, AttemptRecord, FailureKind, GenerationMetadata, Modality,
    RequestClass, Scene, StoryConcept, StoryRecord, Tone,
};

fn attempt(target: &str, provider: &str, outcome: AttemptOutcome) -> AttemptRecord {
    AttemptRecord {
        class: RequestClass::SceneText,
        target: target.to_string(),
        provider: provider.to_string(),
        outcome,
        elapsed_ms: 5,
    }
}

fn failed(kind: FailureKind) -> AttemptOutcome {
    AttemptOutcome::Failed {
        kind,
        message: "boom".to_string(),
    }
}

#[test]
fn metadata_counts_retries_per_target() {
    let history = vec![
        attempt("scene 0", "primary", failed(FailureKind::InvalidResponse)),
        attempt("scene 0", "primary", failed(FailureKind::InvalidResponse)),
        attempt("scene 0", "secondary", AttemptOutcome::Succeeded),
        attempt("scene 1", "secondary", AttemptOutcome::Succeeded),
    ];

    let metadata = GenerationMetadata::new(history, 42);

    assert_eq!(*metadata.retries(), 2);
    assert_eq!(metadata.providers_used(), &vec!["secondary".to_string()]);
    assert_eq!(metadata.attempts_for("primary").count(), 2);
    assert_eq!(*metadata.duration_ms(), 42);
}

#[test]
fn record_serializes_in_stable_shape() -> anyhow::Result<()> {
    let concept = StoryConcept::builder()
        .character("hero", "explorer")
        .plot("find the lost crystal")
        .moral("friends make you brave")
        .build();
    let scene = Scene::new(0, "The hero set out.", Tone::Hopeful, "departure", "a trail", None);
    let asset = Asset::ok(0, Modality::Image, AssetRef::inline("image/png", b"png"), "painter", 1);
    let failed = Asset::failed(0, Modality::Audio, 3, "all providers failed");
    let metadata = GenerationMetadata::new(Vec::new(), 10);

    let record = StoryRecord::from_parts(concept, vec![scene], vec![asset, failed], metadata);
    let value = serde_json::to_value(&record)?;

    assert_eq!(value["scenes"][0]["index"], 0);
    assert_eq!(value["scenes"][0]["tone"], "hopeful");
    assert_eq!(value["assets"][0]["sceneIndex"], 0);
    assert_eq!(value["assets"][0]["modality"], "image");
    assert_eq!(value["assets"][0]["status"], "ok");
    assert_eq!(value["assets"][0]["ref"]["type"], "inline");
    assert_eq!(value["assets"][1]["status"], "failed");
    assert!(value["assets"][1].get("ref").is_none());
    assert_eq!(value["metadata"]["providersUsed"], serde_json::json!([]));
    assert_eq!(value["metadata"]["durationMs"], 10);
    Ok(())
}

#[test]
fn inline_reference_decodes_original_bytes() {
    let reference = AssetRef::inline("audio/mpeg", &[1, 2, 3, 250]);
    let decoded = reference.decode_inline().unwrap().unwrap();
    assert_eq!(decoded, vec![1, 2, 3, 250]);
    assert_eq!(reference.mime(), Some("audio/mpeg"));
}

#[test]
fn scene_duration_scales_with_words() {
    let words = vec!["word"; 50].join(" ");
    let scene = Scene::new(0, words, Tone::Calm, "summary", "visual", None);
    assert_eq!(scene.estimated_duration_secs(), 20.0);
}
