//! Collage CLI: command-line interface for building grid collages.
//!
//! Usage:
//!   collage compose <IMAGES>... --rows R --cols C   Build and encode a collage
//!   collage plan <IMAGES>... --rows R --cols C      Preview the layout without decoding pixels
//!   collage config show|init                        Inspect or create the config file

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use collage_common::config::{AppConfig, LoggingConfig};
use collage_common::CollageError;
use collage_model::LayoutError;

mod commands;

#[derive(Parser)]
#[command(
    name = "collage",
    about = "Arrange images into a uniform grid collage",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/collage/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose images into a collage and write it to disk
    Compose(commands::compose::ComposeArgs),

    /// Show cell size, canvas size, and placements without decoding pixels
    Plan(commands::plan::PlanArgs),

    /// Show or initialize configuration
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

const EXIT_FAILURE: u8 = 1;
/// Exit status for a request the input itself made impossible.
const EXIT_INPUT: u8 = 2;

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

/// Bad grids, missing or undecodable images, and undersupply exit with 2.
fn exit_code(err: &anyhow::Error) -> u8 {
    let input = err.chain().any(|cause| {
        cause
            .downcast_ref::<CollageError>()
            .is_some_and(CollageError::is_input_error)
            || cause.downcast_ref::<LayoutError>().is_some()
    });
    if input {
        EXIT_INPUT
    } else {
        EXIT_FAILURE
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display()))?,
        None => AppConfig::load(),
    };

    // Initialize logging
    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    collage_common::logging::init_logging(&LoggingConfig {
        level,
        ..config.logging.clone()
    })?;
    tracing::debug!(?config, "Loaded configuration");

    match cli.command {
        Commands::Compose(args) => commands::compose::run(args, &config),
        Commands::Plan(args) => commands::plan::run(args, &config),
        Commands::Config { action } => commands::config::run(action, &config),
    }
}
