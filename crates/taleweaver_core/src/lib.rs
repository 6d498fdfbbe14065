//! Core data types for the Taleweaver story generation engine.
//!
//! This crate provides the data model shared by every stage of the pipeline:
//! the immutable [`StoryConcept`] input, the per-invocation
//! [`GenerationRequest`], the ordered [`Scene`] list, multi-modal [`Asset`]s,
//! the provider attempt history, and the assembled [`StoryRecord`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod asset;
mod attempt;
mod concept;
mod output;
mod record;
mod request;
mod scene;
mod tone;

pub use asset::{Asset, AssetRef, AssetStatus, Modality};
pub use attempt::{AttemptOutcome, AttemptRecord, FailureKind};
pub use concept::{StoryConcept, StoryConceptBuilder, TargetAge};
pub use output::ProviderOutput;
pub use record::{GenerationMetadata, StoryRecord};
pub use request::{
    GenerationRequest, GenerationRequestBuilder, GenerationRequestBuilderError, Payload,
    PayloadContext, RequestBudget, RequestClass,
};
pub use scene::{Continuity, Scene};
pub use tone::Tone;
