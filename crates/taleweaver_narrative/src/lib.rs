//! Story generation pipeline for Taleweaver.
//!
//! A story runs in three stages:
//!
//! 1. [`SceneOrchestrator`] generates scenes strictly in order. Each response
//!    is extracted ([`extract_json`]), checked by [`SceneValidator`], and
//!    summarized into the [`taleweaver_core::Continuity`] that feeds the next
//!    scene ([`derive_continuity`]).
//! 2. [`AssetCoordinator`] generates an illustration ([`ImagePrompter`]) and
//!    SSML narration ([`SsmlBuilder`]) per scene, concurrently, behind one
//!    shared admission gate. Asset failures are recorded, never fatal.
//! 3. [`StoryAssembler`] checks the record invariants and produces the
//!    immutable [`taleweaver_core::StoryRecord`].
//!
//! [`StoryGenerator`] runs the stages under a per-story deadline.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assembler;
mod assets;
mod continuity;
mod extraction;
mod generator;
mod orchestrator;
mod prompt;
mod validator;

pub use assembler::StoryAssembler;
pub use assets::{AssetCoordinator, AssetRun, NOT_ADMITTED};
pub use continuity::{MAX_RECAP_CHARS, derive_continuity, sentences};
pub use extraction::{extract_json, parse_json};
pub use generator::StoryGenerator;
pub use orchestrator::{SceneOrchestrator, SceneRun, SceneState};
pub use prompt::{
    ImagePrompter, Prosody, SCENE_BREAK, SENTENCE_BREAK, SceneBrief, ScenePrompter, SsmlBuilder,
    StandardPrompter,
};
pub use validator::{SceneDraft, SceneValidator};
