//! Show or initialize configuration.

use std::path::PathBuf;

use clap::Subcommand;
use collage_common::config::{config_file_path, AppConfig};

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as JSON
    Show,

    /// Write a default config file
    Init {
        /// Destination (defaults to the standard config location)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(action: ConfigAction, config: &AppConfig) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            println!("# {}", config_file_path().display());
            println!("{}", serde_json::to_string_pretty(config)?);
            Ok(())
        }
        ConfigAction::Init { path, force } => {
            let path = path.unwrap_or_else(config_file_path);
            init(&path, force)?;
            println!("Wrote default config to {}", path.display());
            Ok(())
        }
    }
}

fn init(path: &std::path::Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    AppConfig::default().save_to(path)?;
    Ok(())
}
