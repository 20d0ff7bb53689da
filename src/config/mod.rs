//! Configuration loading and management
//!
//! Settings are layered: optional `config/{default,local}` files, then
//! `MARKET_AGENT__`-prefixed environment variables. The flat environment
//! names the agent has always honored (`DATABASE_URL`, `SYMBOLS`,
//! `API_PROVIDER`, `FINNHUB_API_KEY`, `REQUEST_DELAY`, `FETCH_INTERVAL`)
//! seed the defaults, so a plain `.env` file is enough to run.

use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseSettings,
    /// Provider configuration
    #[serde(default)]
    pub provider: ProviderSettings,
    /// Ingestion pipeline configuration
    #[serde(default)]
    pub ingest: IngestSettings,
}

/// Database connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// PostgreSQL connection URL
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum number of connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_default()
}

fn default_max_connections() -> u32 {
    5
}

fn default_min_connections() -> u32 {
    1
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
        }
    }
}

/// Provider selection and credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Active provider name (case-insensitive)
    #[serde(default = "default_provider_name")]
    pub name: String,
    /// Finnhub configuration
    #[serde(default = "default_finnhub")]
    pub finnhub: Option<FinnhubSettings>,
}

/// Finnhub provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinnhubSettings {
    /// API key for authentication
    pub api_key: String,
}

fn default_provider_name() -> String {
    std::env::var("API_PROVIDER").unwrap_or_else(|_| "finnhub".to_string())
}

fn default_finnhub() -> Option<FinnhubSettings> {
    std::env::var("FINNHUB_API_KEY")
        .ok()
        .map(|api_key| FinnhubSettings { api_key })
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            finnhub: default_finnhub(),
        }
    }
}

/// Ingestion pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestSettings {
    /// Symbols to ingest, comma-separated, in fetch order
    #[serde(default = "default_symbols")]
    pub symbols: String,
    /// Pacing delay between consecutive provider requests, in seconds
    #[serde(default = "default_request_delay")]
    pub request_delay_secs: f64,
    /// Scheduler cadence, in seconds
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
}

fn default_symbols() -> String {
    std::env::var("SYMBOLS").unwrap_or_else(|_| "AAPL".to_string())
}

fn default_request_delay() -> f64 {
    std::env::var("REQUEST_DELAY")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0.2)
}

fn default_interval() -> u64 {
    std::env::var("FETCH_INTERVAL")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(60)
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            request_delay_secs: default_request_delay(),
            interval_secs: default_interval(),
        }
    }
}

impl IngestSettings {
    /// The configured symbols, split, trimmed, and in declared order.
    pub fn symbol_list(&self) -> Vec<String> {
        self.symbols
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_secs_f64(self.request_delay_secs.max(0.0))
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Settings {
    /// Load settings from configuration files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_prefix("MARKET_AGENT")
    }

    /// Load settings with a custom environment variable prefix
    pub fn load_with_prefix(env_prefix: &str) -> Result<Self, ConfigError> {
        let config_dir = std::env::var("MARKET_AGENT_CONFIG_DIR").unwrap_or_else(|_| "config".into());

        let s = Config::builder()
            .add_source(File::with_name(&format!("{}/default", config_dir)).required(false))
            // Local overrides (not checked into git)
            .add_source(File::with_name(&format!("{}/local", config_dir)).required(false))
            // Environment variables (e.g., MARKET_AGENT__DATABASE__URL)
            .add_source(
                Environment::with_prefix(env_prefix)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }

    /// Create default settings (useful for testing)
    pub fn default_settings() -> Self {
        Self {
            database: DatabaseSettings::default(),
            provider: ProviderSettings::default(),
            ingest: IngestSettings::default(),
        }
    }
}
