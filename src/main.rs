//! noid command line entry point.
//!
//! Parses arguments, runs the selected command, and turns failures into a
//! message on stderr plus a non-zero exit code.

use clap::Parser;
use noid::cli::Cli;
use noid::error::{exit_code, render_error};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(err) = noid::run(cli).await {
        eprintln!("{}", render_error(&err));
        std::process::exit(exit_code(&err));
    }

    Ok(())
}
