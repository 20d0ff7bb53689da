//! Cycle scheduling and orchestration
//!
//! Runs fetch -> validate -> write as one cycle, either once or forever on a
//! fixed drift-compensated cadence with per-cycle failure isolation.

mod ingest;

pub use ingest::{IngestError, IngestScheduler};
