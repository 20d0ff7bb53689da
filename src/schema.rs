//! Normalized record schema
//!
//! Every provider must emit records in this shape; all downstream stages
//! (validation, persistence) operate on it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One normalized price/size observation for a symbol at an instant.
///
/// A record is created fresh by a provider on each fetch, repaired in place
/// by the validator where the contract allows it, and never mutated again
/// once it reaches the writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Ticker symbol, case as received from the provider
    pub symbol: String,
    /// Observation time, always UTC
    pub ts: DateTime<Utc>,
    /// Last-trade or quote price
    pub price: f64,
    /// Trade/quote volume; 0 when the source supplies none
    pub size: f64,
    /// Lowercase name of the provider that produced the record
    pub source: String,
}

impl TradeRecord {
    pub fn new(
        symbol: impl Into<String>,
        ts: DateTime<Utc>,
        price: f64,
        size: f64,
        source: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            ts,
            price,
            size,
            source: source.into(),
        }
    }

    /// Key used for intra-batch deduplication.
    pub fn dedup_key(&self) -> (String, DateTime<Utc>) {
        (self.symbol.clone(), self.ts)
    }
}
