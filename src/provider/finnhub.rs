//! Finnhub quote-API provider
//!
//! Fetches the current quote for a symbol from the Finnhub REST API and
//! normalizes it into a [`TradeRecord`]. Finnhub's quote payload uses short
//! field names: `c` is the current price and `v` the volume.

use std::time::Duration;

use chrono::Utc;
use serde_json::Value;
use tracing::debug;

use crate::provider::{MarketDataProvider, ProviderError, ProviderResult};
use crate::schema::TradeRecord;

const QUOTE_URL: &str = "https://finnhub.io/api/v1/quote";

/// Request timeout for quote fetches
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Maximum number of response-body characters carried in error messages
const BODY_EXCERPT_LEN: usize = 200;

/// Finnhub quote-API provider
#[derive(Debug)]
pub struct FinnhubProvider {
    client: reqwest::Client,
    api_key: String,
    quote_url: String,
}

impl FinnhubProvider {
    /// Create a provider with the given API key.
    ///
    /// An empty key fails immediately; the provider never issues
    /// unauthenticated requests.
    pub fn new(api_key: impl Into<String>) -> ProviderResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ProviderError::Configuration(
                "Finnhub API key is missing".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                ProviderError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            api_key,
            quote_url: QUOTE_URL.to_string(),
        })
    }

    /// Override the quote endpoint, for tests against a local server.
    #[doc(hidden)]
    pub fn with_quote_url(mut self, url: impl Into<String>) -> Self {
        self.quote_url = url.into();
        self
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for FinnhubProvider {
    fn name(&self) -> &'static str {
        "finnhub"
    }

    async fn fetch(&self, symbol: &str) -> ProviderResult<TradeRecord> {
        debug!("GET {} symbol={}", self.quote_url, symbol);

        let response = self
            .client
            .get(&self.quote_url)
            .query(&[("token", self.api_key.as_str()), ("symbol", symbol)])
            .send()
            .await
            .map_err(|e| classify_transport_error(symbol, &e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Request(format!("Failed to read body for {}: {}", symbol, e)))?;

        if !status.is_success() {
            return Err(ProviderError::Status(format!(
                "Finnhub returned {} for {}: {}",
                status.as_u16(),
                symbol,
                excerpt(&body)
            )));
        }

        let payload: Value = serde_json::from_str(&body).map_err(|_| {
            ProviderError::Parse(format!(
                "Invalid JSON from Finnhub for {}: {}",
                symbol,
                excerpt(&body)
            ))
        })?;

        let price = quote_price(&payload).ok_or_else(|| {
            ProviderError::InvalidQuote(format!(
                "Finnhub returned missing or invalid price for {}. Response: {}",
                symbol,
                excerpt(&body)
            ))
        })?;
        let size = quote_volume(&payload);

        // The provider does not trust upstream timestamps; the observation
        // instant is the fetch instant.
        Ok(TradeRecord::new(symbol, Utc::now(), price, size, self.name()))
    }
}

fn classify_transport_error(symbol: &str, error: &reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout(format!("Timeout fetching {}: {}", symbol, error))
    } else if error.is_connect() {
        ProviderError::Connection(format!("Connection error fetching {}: {}", symbol, error))
    } else {
        ProviderError::Request(format!("HTTP error fetching {}: {}", symbol, error))
    }
}

/// Extract the quote price from the payload.
///
/// Missing, null, zero, empty-string, and `"0"` prices all mean "no valid
/// quote" upstream and are never coerced. Numeric strings that parse to a
/// nonzero value are accepted.
fn quote_price(payload: &Value) -> Option<f64> {
    parse_field(payload.get("c")?).filter(|p| *p != 0.0)
}

/// Extract the volume, defaulting to 0 when absent or non-numeric.
fn quote_volume(payload: &Value) -> f64 {
    payload
        .get("v")
        .and_then(parse_field)
        .unwrap_or(0.0)
}

fn parse_field(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Truncate a response body for inclusion in error messages.
fn excerpt(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(BODY_EXCERPT_LEN)
        .map(|(i, _)| i)
        .unwrap_or(body.len());
    &body[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_api_key_fails() {
        let err = FinnhubProvider::new("").unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));

        let err = FinnhubProvider::new("   ").unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));
    }

    #[test]
    fn test_quote_price_accepts_numeric_price() {
        assert_eq!(quote_price(&json!({"c": 123.45})), Some(123.45));
        assert_eq!(quote_price(&json!({"c": "123.45"})), Some(123.45));
    }

    #[test]
    fn test_quote_price_rejects_missing_or_zero() {
        assert_eq!(quote_price(&json!({})), None);
        assert_eq!(quote_price(&json!({"c": null})), None);
        assert_eq!(quote_price(&json!({"c": 0})), None);
        assert_eq!(quote_price(&json!({"c": 0.0})), None);
        assert_eq!(quote_price(&json!({"c": ""})), None);
        assert_eq!(quote_price(&json!({"c": "0"})), None);
    }

    #[test]
    fn test_quote_volume_defaults_to_zero() {
        assert_eq!(quote_volume(&json!({"c": 50.0})), 0.0);
        assert_eq!(quote_volume(&json!({"c": 50.0, "v": null})), 0.0);
        assert_eq!(quote_volume(&json!({"c": 50.0, "v": 10})), 10.0);
    }

    #[test]
    fn test_excerpt_truncates_long_bodies() {
        let long = "x".repeat(500);
        assert_eq!(excerpt(&long).len(), 200);

        let short = "short body";
        assert_eq!(excerpt(short), short);
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        let body = "é".repeat(300);
        let cut = excerpt(&body);
        assert_eq!(cut.chars().count(), 200);
    }

    /// Serve one canned HTTP response on a local port, capturing the request
    /// head. Returns the quote URL to point the provider at.
    async fn spawn_stub(
        response: String,
    ) -> (String, tokio::sync::oneshot::Receiver<String>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (head_tx, head_rx) = tokio::sync::oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            let _ = head_tx.send(String::from_utf8_lossy(&buf[..n]).to_string());
            socket.write_all(response.as_bytes()).await.unwrap();
        });

        (format!("http://{}/quote", addr), head_rx)
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    async fn stub_provider(response: String) -> (FinnhubProvider, tokio::sync::oneshot::Receiver<String>) {
        let (url, head_rx) = spawn_stub(response).await;
        let provider = FinnhubProvider::new("test-key").unwrap().with_quote_url(url);
        (provider, head_rx)
    }

    #[tokio::test]
    async fn test_fetch_builds_record_from_quote_response() {
        let before = Utc::now();
        let (provider, head_rx) =
            stub_provider(http_response("200 OK", r#"{"c": 123.45, "v": 10}"#)).await;

        let record = provider.fetch("AAPL").await.unwrap();

        assert_eq!(record.symbol, "AAPL");
        assert_eq!(record.price, 123.45);
        assert_eq!(record.size, 10.0);
        assert_eq!(record.source, "finnhub");
        assert!(record.ts >= before && record.ts <= Utc::now());

        // The key and symbol travel as query parameters.
        let head = head_rx.await.unwrap();
        assert!(head.contains("token=test-key"));
        assert!(head.contains("symbol=AAPL"));
    }

    #[tokio::test]
    async fn test_fetch_maps_non_success_status_with_excerpt() {
        let body = "x".repeat(500);
        let (provider, _head_rx) =
            stub_provider(http_response("429 Too Many Requests", &body)).await;

        let err = provider.fetch("AAPL").await.unwrap_err();
        assert!(matches!(err, ProviderError::Status(_)));

        let msg = err.to_string();
        assert!(msg.contains("429"));
        assert!(msg.contains(&"x".repeat(200)));
        assert!(!msg.contains(&"x".repeat(201)));
    }

    #[tokio::test]
    async fn test_fetch_maps_unparseable_body_to_parse_error() {
        let (provider, _head_rx) =
            stub_provider(http_response("200 OK", "not json at all")).await;

        let err = provider.fetch("AAPL").await.unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)));
        assert!(err.to_string().contains("not json at all"));
    }

    #[tokio::test]
    async fn test_fetch_maps_invalid_quote_payload() {
        let (provider, _head_rx) =
            stub_provider(http_response("200 OK", r#"{"c": 0, "v": 10}"#)).await;

        let err = provider.fetch("AAPL").await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidQuote(_)));
    }

    #[tokio::test]
    async fn test_fetch_maps_refused_connection() {
        // Bind then drop to get a port with nothing listening.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider = FinnhubProvider::new("test-key")
            .unwrap()
            .with_quote_url(format!("http://{}/quote", addr));

        let err = provider.fetch("AAPL").await.unwrap_err();
        assert!(matches!(err, ProviderError::Connection(_)));
    }
}
