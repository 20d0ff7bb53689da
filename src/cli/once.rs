//! Once command - a single ingestion cycle

use anyhow::Result;
use clap::Args;
use tracing::info;

use crate::config::Settings;
use crate::provider::create_provider;
use crate::scheduler::IngestScheduler;
use crate::storage::{run_migrations, TradeWriter};

/// Arguments for the once command
#[derive(Args)]
pub struct OnceArgs {
    /// Symbols to ingest (comma-separated), overriding configuration
    #[arg(long, short)]
    pub symbols: Option<String>,

    /// Seconds between consecutive provider requests, overriding configuration
    #[arg(long)]
    pub request_delay: Option<f64>,
}

/// Execute the once command
pub async fn execute(args: OnceArgs) -> Result<()> {
    let mut settings = Settings::load()?;
    if let Some(ref symbols) = args.symbols {
        settings.ingest.symbols = symbols.clone();
    }
    if let Some(delay) = args.request_delay {
        settings.ingest.request_delay_secs = delay;
    }

    let provider = create_provider(&settings.provider)?;

    let writer = TradeWriter::from_settings(&settings.database).await?;
    run_migrations(writer.pool()).await?;

    let scheduler = IngestScheduler::new(
        provider,
        Box::new(writer),
        settings.ingest.symbol_list(),
        settings.ingest.request_delay(),
        settings.ingest.interval(),
    );

    let written = scheduler.run_once().await?;
    info!("Cycle completed: {} records written", written);
    println!("Wrote {} records", written);

    Ok(())
}
