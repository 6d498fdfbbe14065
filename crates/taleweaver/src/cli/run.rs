//! Command handlers.

use super::GenerateArgs;
use std::path::Path;
use taleweaver::{
    FailureMode, StoryError, StoryErrorKind, StoryGenerator, StoryPackage, TaleweaverConfig,
    TaleweaverResult, build_registry, default_output_dir, load_concept,
};
use tokio_util::sync::CancellationToken;

/// Generates a story and writes its package.
#[tracing::instrument(skip_all, fields(concept = %args.concept.display()))]
pub async fn generate_story(args: GenerateArgs) -> TaleweaverResult<()> {
    let config = TaleweaverConfig::load_with(args.config.as_deref())?;
    let concept = load_concept(&args.concept)?;

    let registry = build_registry(&config)?;
    if registry.is_empty() {
        tracing::warn!("No providers available; set the API key variables named in the configuration");
    }

    let mut generator = StoryGenerator::from_config(&config, registry);
    if let Some(scenes) = args.scenes {
        generator = generator.with_scene_count(usize::from(scenes));
    }
    if args.placeholders {
        generator = generator.with_failure_mode(FailureMode::Placeholder);
    }

    let cancel = CancellationToken::new();
    let interrupt = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted, cancelling generation");
                cancel.cancel();
            }
        }
    });
    let result = generator.generate_with_cancel(&concept, cancel).await;
    interrupt.abort();
    let record = result?;

    let package = StoryPackage::new(args.out.unwrap_or_else(default_output_dir))
        .with_asset_files(!args.no_asset_files);
    let files = package.write(&record)?;

    let metadata = record.metadata();
    println!(
        "Wrote \"{}\" to {} ({} scenes, {} files, {} retries, {:.0}s narration)",
        record.concept().display_title(),
        package.dir().display(),
        record.scenes().len(),
        files.len(),
        metadata.retries(),
        metadata.estimated_runtime_secs()
    );
    Ok(())
}

/// Validates a concept file.
pub fn check_concept(path: &Path) -> TaleweaverResult<()> {
    let concept = load_concept(path)?;
    concept
        .validate()
        .map_err(|reason| StoryError::new(StoryErrorKind::InvalidConcept(reason)))?;
    println!(
        "Concept \"{}\" is valid ({} characters)",
        concept.display_title(),
        concept.characters().len()
    );
    Ok(())
}

/// Prints the effective configuration.
pub fn show_config(path: Option<&Path>) -> TaleweaverResult<()> {
    let config = TaleweaverConfig::load_with(path)?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}
