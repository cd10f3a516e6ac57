//! # noid
//!
//! Mints short, opaque identifiers ("noids") from a counter and a compact
//! template such as `foo.reedeek`:
//!
//! - **Template**: prefix, ordering mode, mask of `d`/`e` positions, optional check digit
//! - **Suffix generator**: packs the counter into mask positions, optionally through a
//!   fixed bit permutation, and detects exhaustion
//! - **Minter**: joins prefix, suffix and check digit, then advances the counter
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                              noid CLI                              │
//! ├───────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐  ┌──────────────┐  ┌─────────────┐  ┌──────────┐ │
//! │  │   Commands  │  │ MintService  │  │   Storage   │  │  Minter  │ │
//! │  │   (clap)    │→ │ (lock, load, │→ │ (JSON file, │  │  (pure,  │ │
//! │  │             │  │  mint, save) │  │   flock)    │  │   sync)  │ │
//! │  └─────────────┘  └──────────────┘  └─────────────┘  └──────────┘ │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ```
//! use noid::Minter;
//!
//! let mut minter = Minter::new("foo.seedeek").unwrap();
//! assert_eq!(minter.mint().unwrap().as_str(), "foo.00000f");
//! assert_eq!(minter.sequence(), 1);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod storage;

pub use domain::{MinterState, Ordering, Template};
pub use error::NoidError;
pub use service::{Minted, Minter, SuffixGenerator};

use tracing::debug;

use crate::cli::Cli;
use crate::config::{AppConfig, LogFormat};
use crate::error::AppError;

/// Run the noid command line.
///
/// This function:
/// 1. Loads configuration from files and environment
/// 2. Applies command-line overrides
/// 3. Initializes logging
/// 4. Dispatches the command
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded or the command fails.
/// The error wraps an [`AppError`] when one is available, so callers can
/// recover its code with [`error::exit_code`].
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::load().map_err(AppError::Config)?;
    cli.apply_overrides(&mut config);

    init_logging(&config);

    debug!(
        version = env!("CARGO_PKG_VERSION"),
        data_dir = %config.storage.file.data_dir.display(),
        backend = %config.storage.backend,
        "Starting noid"
    );

    cli.run(&config).await?;
    Ok(())
}

/// Initialize logging based on configuration.
///
/// Logs go to stderr; stdout is reserved for minted identifiers.
fn init_logging(config: &AppConfig) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.observability.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    match config.observability.log_format {
        LogFormat::Json => subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => subscriber
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
