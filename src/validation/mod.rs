//! Record validation for ingestion integrity
//!
//! Validation runs on each fetched batch before persistence: fields are
//! normalized or repaired where the contract allows it, hard violations
//! reject the whole batch, and intra-batch duplicates are silently dropped.

mod validator;


pub use validator::{validate, validate_at, ValidationError, MAX_FUTURE_SKEW_SECS};
