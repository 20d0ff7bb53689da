//! Command-line interface
//!
//! Provides CLI commands for the market agent.

pub mod db;
pub mod once;
pub mod run;

use clap::{Parser, Subcommand};

/// Market Agent CLI
#[derive(Parser)]
#[command(name = "market-agent")]
#[command(about = "Periodic market data ingestion into PostgreSQL")]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the ingestion loop until interrupted
    Run(run::RunArgs),
    /// Execute a single fetch-validate-write cycle and exit
    Once(once::OnceArgs),
    /// Database operations
    #[command(subcommand)]
    Db(db::DbCommands),
}
