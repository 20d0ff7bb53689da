//! Ingestion scheduler

use std::time::Duration;

use thiserror::Error;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::fetcher::fetch_all;
use crate::provider::{MarketDataProvider, ProviderError};
use crate::storage::{RecordSink, WriterError};
use crate::validation::{validate, ValidationError};

/// Error from a single ingest cycle, tagged by the stage that failed.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum IngestError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Writer(#[from] WriterError),
}

/// Fixed-cadence ingestion scheduler.
///
/// Owns the loop and error containment; the pipeline stages it drives are
/// pure request/response. One cycle fully completes (or fails) before the
/// next begins.
pub struct IngestScheduler {
    provider: Box<dyn MarketDataProvider>,
    sink: Box<dyn RecordSink>,
    symbols: Vec<String>,
    request_delay: Duration,
    interval: Duration,
}

impl IngestScheduler {
    pub fn new(
        provider: Box<dyn MarketDataProvider>,
        sink: Box<dyn RecordSink>,
        symbols: Vec<String>,
        request_delay: Duration,
        interval: Duration,
    ) -> Self {
        Self {
            provider,
            sink,
            symbols,
            request_delay,
            interval,
        }
    }

    /// Execute exactly one fetch -> validate -> write cycle.
    ///
    /// Any stage failure propagates to the caller unmodified; no recovery
    /// happens at this level.
    pub async fn run_once(&self) -> Result<usize, IngestError> {
        debug!("Starting ingest cycle");

        let records = fetch_all(self.provider.as_ref(), &self.symbols, self.request_delay).await?;
        debug!("Fetched {} raw records", records.len());

        let validated = validate(records)?;
        debug!("Validated {} records", validated.len());

        let written = self.sink.write(&validated).await?;
        Ok(written)
    }

    /// Run cycles forever at a fixed interval until a shutdown signal.
    ///
    /// A failing cycle is logged and abandoned, never retried; the loop
    /// persists. The end-of-cycle sleep is `interval - elapsed`, clamped at
    /// zero: an overrunning cycle re-enters immediately, with no catch-up
    /// bursting and no skipped cycles.
    pub async fn run_forever(&self, mut shutdown_rx: broadcast::Receiver<()>) {
        info!(
            "Scheduler started with interval {}s",
            self.interval.as_secs()
        );

        loop {
            let cycle_start = Instant::now();

            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Scheduler stopped");
                    return;
                }
                result = self.run_once() => match result {
                    Ok(written) => info!("Ingest cycle completed: {} records written", written),
                    Err(e) => error!("Ingest cycle failed: {}", e),
                }
            }

            let elapsed = cycle_start.elapsed();
            if elapsed < self.interval {
                let pause = self.interval - elapsed;
                debug!("Sleeping {:.1}s until next cycle", pause.as_secs_f64());
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("Scheduler stopped");
                        return;
                    }
                    _ = tokio::time::sleep(pause) => {}
                }
            } else {
                warn!(
                    "Cycle took {:.1}s, exceeding the {}s interval; starting next cycle immediately",
                    elapsed.as_secs_f64(),
                    self.interval.as_secs()
                );
            }
        }
    }
}
