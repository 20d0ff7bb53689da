//! Provider factory
//!
//! Maps the configured provider name to a concrete instance. Adding a
//! provider means implementing [`MarketDataProvider`] and adding an arm here.

use crate::config::ProviderSettings;
use crate::provider::finnhub::FinnhubProvider;
use crate::provider::{MarketDataProvider, ProviderError, ProviderResult};

/// Create the provider named in the configuration (case-insensitive).
///
/// An unrecognized or empty name fails with a `Configuration` error naming
/// the supported set.
pub fn create_provider(settings: &ProviderSettings) -> ProviderResult<Box<dyn MarketDataProvider>> {
    match settings.name.trim().to_lowercase().as_str() {
        "finnhub" => {
            let api_key = settings
                .finnhub
                .as_ref()
                .map(|f| f.api_key.clone())
                .unwrap_or_default();
            Ok(Box::new(FinnhubProvider::new(api_key)?))
        }
        other => Err(ProviderError::Configuration(format!(
            "Unknown provider: '{}'. Supported providers: finnhub",
            other
        ))),
    }
}
