//! CLI command definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Taleweaver - illustrated, narrated stories from a single concept
#[derive(Parser, Debug)]
#[command(name = "taleweaver")]
#[command(about = "Generate illustrated, narrated stories across multiple AI providers", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a story package from a concept file
    Generate(GenerateArgs),

    /// Validate a concept file without calling any provider
    Check {
        /// Path to the concept file (JSON or TOML)
        #[arg(long)]
        concept: PathBuf,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Additional configuration file layered over the defaults
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Arguments for `generate`
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Path to the concept file (JSON or TOML)
    #[arg(long)]
    pub concept: PathBuf,

    /// Number of scenes (overrides the configuration)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub scenes: Option<u16>,

    /// Output directory (defaults to a timestamped directory)
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Additional configuration file layered over the defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Record placeholder references for assets that could not be generated
    #[arg(long)]
    pub placeholders: bool,

    /// Only write story.json; keep asset payloads inline
    #[arg(long)]
    pub no_asset_files: bool,
}
