//! CLI commands.

mod mint;
mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::error::Result;

pub use mint::{MintCommand, MintSubcommand};
pub use status::{OutputFormat, StatusCommand};

/// noid - mint short, opaque identifiers from a template.
#[derive(Debug, Parser)]
#[command(name = "noid")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the minter state file.
    #[arg(long, global = true, env = "NOID_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Controls minting of noids.
    Mint(MintCommand),

    /// Show the persisted minter's template and position.
    Status(StatusCommand),
}

impl Cli {
    /// Apply command-line overrides to the loaded configuration.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.data_dir {
            config.storage.file.data_dir.clone_from(dir);
        }
    }

    /// Run the selected command, writing its output to stdout.
    ///
    /// # Errors
    ///
    /// Returns the command's error; nothing has been printed for it yet.
    pub async fn run(self, config: &AppConfig) -> Result<()> {
        match self.command {
            Commands::Mint(cmd) => cmd.run(config).await,
            Commands::Status(cmd) => cmd.run(config).await,
        }
    }
}
