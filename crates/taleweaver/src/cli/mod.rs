//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the taleweaver binary.

mod commands;
mod run;

pub use commands::{Cli, Commands, GenerateArgs};
pub use run::{check_concept, generate_story, show_config};
