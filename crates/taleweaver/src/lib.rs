//! Taleweaver - illustrated, narrated stories from a single concept
//!
//! Taleweaver turns a [`StoryConcept`] (characters, plot, moral, audience) into a
//! multi-scene story with an illustration and a narration track per scene. Scene
//! text is written sequentially so each scene continues the last; images and
//! audio are then generated concurrently under a bounded admission gate. Every
//! logical request is delegated across an ordered list of providers with
//! per-provider retry budgets, backoff and a global attempt ceiling.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use taleweaver::{StoryConcept, StoryGenerator, TaleweaverConfig, build_registry};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TaleweaverConfig::load()?;
//!     let registry = build_registry(&config)?;
//!     let generator = StoryGenerator::from_config(&config, registry);
//!
//!     let concept = StoryConcept::builder()
//!         .character("Mia", "a red fox with a green scarf")
//!         .plot("two friends search the winter forest for a fallen star")
//!         .moral("courage grows when it is shared")
//!         .build();
//!
//!     let record = generator.generate(&concept).await?;
//!     println!("{}", serde_json::to_string_pretty(&record)?);
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `openai` - OpenAI chat, image and speech adapters
//! - `anthropic` - Anthropic messages adapter (scene text)
//! - `stability` - Stability AI text-to-image adapter
//! - `all-providers` - All of the above (default)
//!
//! # Architecture
//!
//! - `taleweaver_core` - Story data types (concept, scene, asset, record)
//! - `taleweaver_error` - Error types
//! - `taleweaver_interface` - `StoryProvider` trait and registry
//! - `taleweaver_rate_limit` - Configuration, backoff, throttles, admission gate
//! - `taleweaver_delegation` - Provider fallback and retry
//! - `taleweaver_models` - Provider adapters
//! - `taleweaver_narrative` - Scene orchestration, assets and assembly
//!
//! This crate re-exports everything for convenience and ships the `taleweaver`
//! binary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod observability;
mod package;

pub use package::{StoryPackage, asset_extension, default_output_dir, load_concept};

// Re-export workspace crates
pub use taleweaver_core::*;
pub use taleweaver_delegation::*;
pub use taleweaver_error::*;
pub use taleweaver_interface::*;
pub use taleweaver_models::*;
pub use taleweaver_narrative::{
    AssetCoordinator, AssetRun, ImagePrompter, Prosody, SceneBrief, SceneDraft,
    SceneOrchestrator, ScenePrompter, SceneRun, SceneState, SceneValidator, SsmlBuilder,
    StandardPrompter, StoryAssembler, StoryGenerator, derive_continuity,
};
pub use taleweaver_rate_limit::*;
