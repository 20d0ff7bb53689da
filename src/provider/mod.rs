//! Data provider abstractions and implementations
//!
//! This module defines the pluggable provider interface, the factory that
//! selects a concrete provider by configured name, the Finnhub quote-API
//! implementation, and a mock provider for testing.

mod factory;
pub mod finnhub;
pub mod mock;
mod traits;

pub use factory::create_provider;
pub use traits::*;
