//! Market Agent CLI
//!
//! Provides commands for:
//! - `run`: Start the periodic ingestion loop
//! - `once`: Execute a single ingestion cycle
//! - `db`: Database operations

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use market_agent::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("market_agent=info".parse()?))
        .init();

    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Execute command
    match cli.command {
        Commands::Run(args) => {
            market_agent::cli::run::execute(args).await?;
        }
        Commands::Once(args) => {
            market_agent::cli::once::execute(args).await?;
        }
        Commands::Db(cmd) => {
            market_agent::cli::db::execute(cmd).await?;
        }
    }

    Ok(())
}
