//! Run command - start the ingestion loop

use anyhow::Result;
use clap::Args;
use tokio::sync::broadcast;
use tracing::info;

use crate::config::Settings;
use crate::provider::create_provider;
use crate::scheduler::IngestScheduler;
use crate::storage::{run_migrations, TradeWriter};

/// Arguments for the run command
#[derive(Args)]
pub struct RunArgs {
    /// Symbols to ingest (comma-separated), overriding configuration
    #[arg(long, short)]
    pub symbols: Option<String>,

    /// Seconds between cycles, overriding configuration
    #[arg(long)]
    pub interval: Option<u64>,

    /// Seconds between consecutive provider requests, overriding configuration
    #[arg(long)]
    pub request_delay: Option<f64>,

    /// Skip applying schema migrations on startup
    #[arg(long)]
    pub skip_migrations: bool,
}

/// Execute the run command
pub async fn execute(args: RunArgs) -> Result<()> {
    let mut settings = Settings::load()?;
    apply_overrides(&mut settings, &args);

    let symbols = settings.ingest.symbol_list();
    info!("Starting market agent");
    info!("  Provider: {}", settings.provider.name);
    info!("  Symbols: {:?}", symbols);
    info!("  Interval: {}s", settings.ingest.interval_secs);

    let provider = create_provider(&settings.provider)?;

    info!("Connecting to database...");
    let writer = TradeWriter::from_settings(&settings.database).await?;
    if args.skip_migrations {
        info!("Skipping migrations");
    } else {
        run_migrations(writer.pool()).await?;
    }
    info!("Database connected");

    // Handle Ctrl+C
    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received shutdown signal");
            let _ = shutdown_tx.send(());
        }
    });

    let scheduler = IngestScheduler::new(
        provider,
        Box::new(writer),
        symbols,
        settings.ingest.request_delay(),
        settings.ingest.interval(),
    );

    scheduler.run_forever(shutdown_rx).await;

    info!("Market agent stopped");
    Ok(())
}

fn apply_overrides(settings: &mut Settings, args: &RunArgs) {
    if let Some(ref symbols) = args.symbols {
        settings.ingest.symbols = symbols.clone();
    }
    if let Some(interval) = args.interval {
        settings.ingest.interval_secs = interval;
    }
    if let Some(delay) = args.request_delay {
        settings.ingest.request_delay_secs = delay;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_configured_values() {
        let mut settings = Settings::default_settings();
        let args = RunArgs {
            symbols: Some("TSLA,NVDA".to_string()),
            interval: Some(15),
            request_delay: Some(0.5),
            skip_migrations: false,
        };

        apply_overrides(&mut settings, &args);

        assert_eq!(settings.ingest.symbol_list(), vec!["TSLA", "NVDA"]);
        assert_eq!(settings.ingest.interval_secs, 15);
        assert_eq!(settings.ingest.request_delay_secs, 0.5);
    }

    #[test]
    fn test_absent_overrides_keep_configured_values() {
        let mut settings = Settings::default_settings();
        let before = settings.ingest.clone();
        let args = RunArgs {
            symbols: None,
            interval: None,
            request_delay: None,
            skip_migrations: true,
        };

        apply_overrides(&mut settings, &args);

        assert_eq!(settings.ingest.symbols, before.symbols);
        assert_eq!(settings.ingest.interval_secs, before.interval_secs);
    }
}
