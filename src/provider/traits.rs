//! Provider trait definitions
//!
//! The `MarketDataProvider` trait is the single capability the rest of the
//! pipeline depends on. Any provider-specific failure must surface as a
//! `ProviderError` so callers can handle all provider failures uniformly.

use async_trait::async_trait;
use thiserror::Error;

use crate::schema::TradeRecord;

/// Provider error types
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request error: {0}")]
    Request(String),

    #[error("Bad status: {0}")]
    Status(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid quote: {0}")]
    InvalidQuote(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// A pluggable source of market data.
///
/// Implementations decide the exact upstream endpoint and normalize every
/// observation into a [`TradeRecord`]. They do not retry; transport failures
/// map to [`ProviderError`] and propagate to the caller.
#[async_trait]
pub trait MarketDataProvider: Send + Sync + std::fmt::Debug {
    /// Provider name, lowercase (also the `source` stamped on records)
    fn name(&self) -> &'static str;

    /// Fetch the current observation for a single symbol.
    async fn fetch(&self, symbol: &str) -> ProviderResult<TradeRecord>;
}
