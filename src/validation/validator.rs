//! Batch validator for trade records

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::schema::TradeRecord;

/// Clock-skew tolerance for future timestamps, in seconds
pub const MAX_FUTURE_SKEW_SECS: i64 = 10;

/// Validation errors for trade records
///
/// Any of these rejects the whole batch; only duplicate removal is a silent
/// skip.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Symbol is empty")]
    EmptySymbol,

    #[error("Symbol '{symbol}' contains whitespace")]
    SymbolWhitespace { symbol: String },

    #[error("Source is empty for {symbol}")]
    EmptySource { symbol: String },

    #[error("Timestamp {ts} for {symbol} is too far in the future")]
    TimestampInFuture {
        symbol: String,
        ts: DateTime<Utc>,
    },

    #[error("Price {price} for {symbol} is not finite")]
    PriceNotFinite { symbol: String, price: f64 },

    #[error("Price {price} for {symbol} is not positive")]
    PriceNotPositive { symbol: String, price: f64 },
}

/// Validate and normalize a batch against the current clock.
pub fn validate(records: Vec<TradeRecord>) -> Result<Vec<TradeRecord>, ValidationError> {
    validate_at(records, Utc::now())
}

/// Validate and normalize a batch, single pass, order preserving.
///
/// Repairs applied in place: symbol trimmed, source lowercased, size coerced
/// to 0 when NaN, infinite, or negative. Records sharing a `(symbol, ts)`
/// key with an earlier record in the same batch are dropped; the first
/// occurrence wins. The clock is a parameter so tests can pin it.
pub fn validate_at(
    records: Vec<TradeRecord>,
    now: DateTime<Utc>,
) -> Result<Vec<TradeRecord>, ValidationError> {
    let mut validated = Vec::with_capacity(records.len());
    let mut seen: HashSet<(String, DateTime<Utc>)> = HashSet::new();
    let tolerance = Duration::seconds(MAX_FUTURE_SKEW_SECS);

    for mut record in records {
        // Repairs first: these are normalizations, not rejections.
        record.symbol = record.symbol.trim().to_string();
        record.source = record.source.to_lowercase();
        if !record.size.is_finite() || record.size < 0.0 {
            record.size = 0.0;
        }

        if record.symbol.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }
        if record.symbol.chars().any(char::is_whitespace) {
            return Err(ValidationError::SymbolWhitespace {
                symbol: record.symbol,
            });
        }

        if record.source.is_empty() {
            return Err(ValidationError::EmptySource {
                symbol: record.symbol,
            });
        }

        if record.ts - now > tolerance {
            return Err(ValidationError::TimestampInFuture {
                symbol: record.symbol,
                ts: record.ts,
            });
        }

        if !record.price.is_finite() {
            return Err(ValidationError::PriceNotFinite {
                symbol: record.symbol,
                price: record.price,
            });
        }
        if record.price <= 0.0 {
            return Err(ValidationError::PriceNotPositive {
                symbol: record.symbol,
                price: record.price,
            });
        }

        // Deduplicate: keep first occurrence only.
        if !seen.insert(record.dedup_key()) {
            continue;
        }
        validated.push(record);
    }

    Ok(validated)
}
