//! Mock data provider for testing
//!
//! Scripted provider implementation used by fetcher, scheduler, and pipeline
//! tests. Records every call so tests can assert call counts and ordering,
//! and can simulate failures and per-fetch latency.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;

use crate::provider::{MarketDataProvider, ProviderError, ProviderResult};
use crate::schema::TradeRecord;

/// Mock data provider with scripted quotes.
#[derive(Debug)]
pub struct MockProvider {
    quotes: HashMap<String, (f64, f64)>,
    default_quote: (f64, f64),
    fail_on: Option<String>,
    fail_first: AtomicUsize,
    latency: Duration,
    calls: Mutex<Vec<String>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            quotes: HashMap::new(),
            default_quote: (100.0, 1.0),
            fail_on: None,
            fail_first: AtomicUsize::new(0),
            latency: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Script a (price, size) quote for a symbol.
    pub fn with_quote(mut self, symbol: &str, price: f64, size: f64) -> Self {
        self.quotes.insert(symbol.to_string(), (price, size));
        self
    }

    /// Fail every fetch of the given symbol.
    pub fn with_failure_on(mut self, symbol: &str) -> Self {
        self.fail_on = Some(symbol.to_string());
        self
    }

    /// Fail the first `n` fetches, then succeed.
    pub fn failing_first(self, n: usize) -> Self {
        self.fail_first.store(n, Ordering::SeqCst);
        self
    }

    /// Sleep for `latency` inside each fetch (tokio time, so paused-clock
    /// tests can advance through it).
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Symbols fetched so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn fetch(&self, symbol: &str) -> ProviderResult<TradeRecord> {
        self.calls.lock().unwrap().push(symbol.to_string());

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if self
            .fail_first
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(ProviderError::Connection(format!(
                "Scripted connection failure fetching {}",
                symbol
            )));
        }

        if self.fail_on.as_deref() == Some(symbol) {
            return Err(ProviderError::Request(format!(
                "Scripted failure fetching {}",
                symbol
            )));
        }

        let (price, size) = self
            .quotes
            .get(symbol)
            .copied()
            .unwrap_or(self.default_quote);

        Ok(TradeRecord::new(symbol, Utc::now(), price, size, self.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_returns_scripted_quote() {
        let provider = MockProvider::new().with_quote("AAPL", 123.45, 10.0);

        let record = provider.fetch("AAPL").await.unwrap();
        assert_eq!(record.symbol, "AAPL");
        assert_eq!(record.price, 123.45);
        assert_eq!(record.size, 10.0);
        assert_eq!(record.source, "mock");
    }

    #[tokio::test]
    async fn test_mock_provider_records_calls_in_order() {
        let provider = MockProvider::new();
        provider.fetch("A").await.unwrap();
        provider.fetch("B").await.unwrap();

        assert_eq!(provider.calls(), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_mock_provider_scripted_failure() {
        let provider = MockProvider::new().with_failure_on("BAD");

        assert!(provider.fetch("GOOD").await.is_ok());
        assert!(matches!(
            provider.fetch("BAD").await,
            Err(ProviderError::Request(_))
        ));
    }

    #[tokio::test]
    async fn test_mock_provider_failing_first() {
        let provider = MockProvider::new().failing_first(2);

        assert!(provider.fetch("A").await.is_err());
        assert!(provider.fetch("A").await.is_err());
        assert!(provider.fetch("A").await.is_ok());
    }
}
