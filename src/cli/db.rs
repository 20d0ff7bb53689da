//! Database management commands

use anyhow::Result;
use clap::{Args, Subcommand};
use tracing::info;

use crate::config::Settings;
use crate::storage::{run_migrations, TradeWriter, SCHEMA_SQL};

/// Database subcommands
#[derive(Subcommand)]
pub enum DbCommands {
    /// Create the schema if it does not exist
    Init(InitArgs),
    /// Print the schema DDL without touching the database
    Schema,
}

/// Arguments for init command
#[derive(Args)]
pub struct InitArgs {}

/// Execute database commands
pub async fn execute(cmd: DbCommands) -> Result<()> {
    match cmd {
        DbCommands::Init(args) => execute_init(args).await,
        DbCommands::Schema => {
            println!("{}", SCHEMA_SQL.trim());
            Ok(())
        }
    }
}

async fn execute_init(_args: InitArgs) -> Result<()> {
    let settings = Settings::load()?;
    let writer = TradeWriter::from_settings(&settings.database).await?;

    info!("Initializing database schema...");
    run_migrations(writer.pool()).await?;

    info!("Database schema ready");
    println!("Database schema ready");
    Ok(())
}
