//! Trade record writer
//!
//! Persists validated batches to the `raw_trades` relation, one row per
//! record, inside a single transaction so a batch commits all-or-nothing.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;
use tracing::debug;

use crate::config::DatabaseSettings;
use crate::schema::TradeRecord;

/// Writer errors
///
/// Every storage-layer failure surfaces as this kind, so callers distinguish
/// writer failures from provider/validation failures by error kind alone.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum WriterError {
    #[error("Database error during write: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type WriterResult<T> = Result<T, WriterError>;

/// Destination for validated batches.
///
/// The scheduler depends on this seam rather than on PostgreSQL directly,
/// which is also what lets tests run against an in-memory sink.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Persist a batch, returning the number of records written.
    async fn write(&self, records: &[TradeRecord]) -> WriterResult<usize>;
}

/// PostgreSQL-backed writer for the `raw_trades` relation
#[derive(Debug)]
pub struct TradeWriter {
    pool: PgPool,
}

impl TradeWriter {
    /// Create a writer over an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a writer with its own pool built from settings.
    pub async fn from_settings(settings: &DatabaseSettings) -> WriterResult<Self> {
        if settings.url.trim().is_empty() {
            return Err(WriterError::Configuration(
                "Database URL is not set".to_string(),
            ));
        }

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&settings.url)
            .await?;

        Ok(Self::new(pool))
    }

    /// Get the database pool reference
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RecordSink for TradeWriter {
    async fn write(&self, records: &[TradeRecord]) -> WriterResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut written = 0;

        for record in records {
            sqlx::query(
                r#"
                INSERT INTO raw_trades (symbol, ts, price, size, source)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(&record.symbol)
            .bind(record.ts)
            .bind(record.price)
            .bind(record.size)
            .bind(&record.source)
            .execute(&mut *tx)
            .await?;
            written += 1;
        }

        tx.commit().await?;
        debug!("Wrote {} records", written);
        Ok(written)
    }
}
