//! Storage layer for validated trade records
//!
//! PostgreSQL persistence over a sqlx connection pool: the raw trades
//! writer and idempotent schema migrations.

mod migrate;
mod writer;

pub use migrate::*;
pub use writer::*;
