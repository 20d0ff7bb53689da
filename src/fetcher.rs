//! Batch fetcher
//!
//! Iterates the configured symbol list and calls the active provider once per
//! symbol, pacing consecutive requests with a fixed delay to respect upstream
//! rate limits. Fetches are sequential by design; concurrent fetches would
//! defeat the pacing.

use std::time::Duration;

use tracing::debug;

use crate::provider::{MarketDataProvider, ProviderResult};
use crate::schema::TradeRecord;

/// Fetch one record per symbol, in declared order.
///
/// The first provider error aborts the remaining symbols (fail-fast, not
/// partial). The pacing delay runs between consecutive calls, not after the
/// last one; an empty symbol list yields an empty batch with zero calls.
pub async fn fetch_all(
    provider: &dyn MarketDataProvider,
    symbols: &[String],
    delay: Duration,
) -> ProviderResult<Vec<TradeRecord>> {
    let mut records = Vec::with_capacity(symbols.len());

    for (i, symbol) in symbols.iter().enumerate() {
        let record = provider.fetch(symbol).await?;
        debug!("Fetched {} at {}", record.symbol, record.price);
        records.push(record);

        if i < symbols.len() - 1 {
            tokio::time::sleep(delay).await;
        }
    }

    Ok(records)
}
