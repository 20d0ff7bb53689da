//! Schema migrations
//!
//! Idempotent DDL for the raw trades relation, applied by `market-agent db
//! init` or by tests bootstrapping a scratch database.

use sqlx::PgPool;
use tracing::info;

use super::{WriterError, WriterResult};

/// Full schema, for operators applying it out-of-band.
pub const SCHEMA_SQL: &str = r#"
-- Market Agent schema

CREATE TABLE IF NOT EXISTS raw_trades (
    symbol TEXT NOT NULL,
    ts TIMESTAMPTZ NOT NULL,
    price DOUBLE PRECISION NOT NULL,
    size DOUBLE PRECISION NOT NULL,
    source TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_raw_trades_symbol_ts
ON raw_trades (symbol, ts DESC);
"#;

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> WriterResult<()> {
    info!("Running database migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS raw_trades (
            symbol TEXT NOT NULL,
            ts TIMESTAMPTZ NOT NULL,
            price DOUBLE PRECISION NOT NULL,
            size DOUBLE PRECISION NOT NULL,
            source TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(WriterError::Database)?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_raw_trades_symbol_ts
        ON raw_trades (symbol, ts DESC)
        "#,
    )
    .execute(pool)
    .await
    .map_err(WriterError::Database)?;

    info!("Database migrations completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_sql_covers_raw_trades() {
        assert!(SCHEMA_SQL.contains("CREATE TABLE IF NOT EXISTS raw_trades"));
        assert!(SCHEMA_SQL.contains("TIMESTAMPTZ"));
    }
}
