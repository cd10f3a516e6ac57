//! Mint commands.

use clap::{Args, Subcommand};

use crate::config::AppConfig;
use crate::error::Result;
use crate::service::MintService;
use crate::storage::create_storage;

#[derive(Debug, Args)]
pub struct MintCommand {
    #[command(subcommand)]
    pub command: MintSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum MintSubcommand {
    /// Mint the identifier at SEQUENCE without any persistence.
    ///
    /// Example: noid mint immediate reedeek 27
    Immediate {
        /// Template string, e.g. `foo.reedeek`.
        template: String,

        /// Counter value to mint.
        sequence: u64,
    },

    /// Create a persisted minter in the data directory.
    ///
    /// Fails if a minter already exists there.
    Init {
        /// Template string, e.g. `foo.reedeek`.
        template: String,
    },

    /// Mint from the persisted minter and save its advanced state.
    Next {
        /// Number of identifiers to mint.
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u32,
    },
}

impl MintCommand {
    pub async fn run(self, config: &AppConfig) -> Result<()> {
        match self.command {
            MintSubcommand::Immediate { template, sequence } => {
                let minted = MintService::immediate(&template, sequence)?;
                println!("{minted}");
            }
            MintSubcommand::Init { template } => {
                let service = MintService::new(create_storage(&config.storage)?);
                let state = service.init(&template).await?;
                eprintln!("Created minter for template {:?}", state.template);
            }
            MintSubcommand::Next { count } => {
                let service = MintService::new(create_storage(&config.storage)?);
                let batch = service.next(count).await?;
                for id in &batch.ids {
                    println!("{id}");
                }
                if batch.exhausted {
                    eprintln!("Minter exhausted: that was the last identifier.");
                }
            }
        }

        Ok(())
    }
}
