//! Taleweaver CLI binary.
//!
//! This binary provides command-line access to Taleweaver:
//! - Generate a story package from a concept file
//! - Validate a concept file
//! - Print the effective configuration

use clap::Parser;
use taleweaver::observability::{ObservabilityConfig, init_observability_with_config};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, check_concept, generate_story, show_config};

    // API keys usually live in .env during development
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut logging = ObservabilityConfig::new().with_json_logs(cli.json_logs);
    if cli.verbose {
        logging = logging.with_log_level("debug");
    }
    init_observability_with_config(logging)?;

    match cli.command {
        Commands::Generate(args) => generate_story(args).await?,
        Commands::Check { concept } => check_concept(&concept)?,
        Commands::Config { config } => show_config(config.as_deref())?,
    }

    Ok(())
}
