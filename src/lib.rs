//! # Market Agent
//!
//! Periodic market data ingestion: pull current quotes for a configured set
//! of symbols from a pluggable provider, validate and normalize each record,
//! and persist the validated batch to PostgreSQL on a fixed cadence.
//!
//! ## Architecture
//!
//! Data flow is strictly linear per cycle:
//!
//! ```text
//! scheduler -> fetcher -> provider -> validator -> writer -> postgres
//! ```
//!
//! The scheduler owns the loop and per-cycle failure isolation; every other
//! component is pure request/response. Providers are selected by name through
//! a factory, with Finnhub as the initial implementation.

pub mod cli;
pub mod config;
pub mod fetcher;
pub mod provider;
pub mod scheduler;
pub mod schema;
pub mod storage;
pub mod validation;

// Re-export commonly used types
pub use config::Settings;
pub use fetcher::fetch_all;
pub use provider::{create_provider, MarketDataProvider, ProviderError, ProviderResult};
pub use scheduler::{IngestError, IngestScheduler};
pub use schema::TradeRecord;
pub use storage::{RecordSink, TradeWriter, WriterError};
pub use validation::{validate, ValidationError};
