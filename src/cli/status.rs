//! Status command.

use clap::{Args, ValueEnum};

use crate::config::AppConfig;
use crate::error::{AppError, Result, StorageError};
use crate::service::MintService;
use crate::storage::create_storage;

/// Output format for status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl StatusCommand {
    pub async fn run(self, config: &AppConfig) -> Result<()> {
        let service = MintService::new(create_storage(&config.storage)?);
        let status = service.status().await?;

        match self.format {
            OutputFormat::Text => println!("{status}"),
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&status)
                    .map_err(|e| AppError::Storage(StorageError::from(e)))?;
                println!("{json}");
            }
        }

        Ok(())
    }
}
