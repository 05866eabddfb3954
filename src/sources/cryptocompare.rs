// =============================================================================
// CryptoCompare API Client — hourly OHLCV history
// =============================================================================
//
// Candle rows arrive under `Data.Data` with a top-level `Response` marker.
// Rows are re-sorted ascending by timestamp at the parse boundary so the
// signal engine can rely on time order.  The quote-side volume (`volumeto`)
// is what the engine reports as candle volume.
// =============================================================================

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::types::Candle;

/// Raw candle row as served by the histohour endpoint.
#[derive(Debug, Deserialize)]
struct HistoRow {
    time: i64,
    #[serde(default)]
    open: f64,
    #[serde(default)]
    high: f64,
    #[serde(default)]
    low: f64,
    #[serde(default)]
    close: f64,
    #[serde(default)]
    volumeto: f64,
}

#[derive(Debug, Deserialize)]
struct HistoData {
    #[serde(rename = "Data", default)]
    data: Vec<HistoRow>,
}

#[derive(Debug, Deserialize)]
struct HistoResponse {
    #[serde(rename = "Response", default)]
    response: String,
    #[serde(rename = "Message", default)]
    message: String,
    #[serde(rename = "Data")]
    data: Option<HistoData>,
}

/// HTTP client for CryptoCompare's min-api.
#[derive(Clone)]
pub struct CryptoCompareClient {
    base_url: String,
    client: reqwest::Client,
}

impl CryptoCompareClient {
    /// Create a new client.  An empty `api_key` is allowed — public rate
    /// limits apply in that case.
    pub fn new(api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();

        let mut default_headers = HeaderMap::new();
        if !api_key.is_empty() {
            if let Ok(val) = HeaderValue::from_str(&format!("Apikey {api_key}")) {
                default_headers.insert("authorization", val);
            }
        }

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("failed to build reqwest client");

        debug!("CryptoCompareClient initialised (base_url=https://min-api.cryptocompare.com)");

        Self {
            base_url: "https://min-api.cryptocompare.com".to_string(),
            client,
        }
    }

    /// GET /data/v2/histohour — `limit + 1` OHLCV candles of
    /// `aggregate`-hour width for the `from_symbol`/`to_symbol` pair,
    /// ascending by time.
    #[instrument(skip(self), name = "cryptocompare::histo_hour")]
    pub async fn histo_hour(
        &self,
        from_symbol: &str,
        to_symbol: &str,
        limit: u32,
        aggregate: u32,
    ) -> Result<Vec<Candle>> {
        let url = format!(
            "{}/data/v2/histohour?fsym={}&tsym={}&limit={}&aggregate={}",
            self.base_url,
            from_symbol.to_uppercase(),
            to_symbol.to_uppercase(),
            limit,
            aggregate
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("GET histohour request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("CryptoCompare GET histohour returned {status}: {body}");
        }

        let body: HistoResponse = resp
            .json()
            .await
            .context("failed to parse histohour response")?;

        if body.response != "Success" {
            anyhow::bail!("CryptoCompare histohour error: {}", body.message);
        }

        let rows = body
            .data
            .context("histohour response missing 'Data' payload")?
            .data;

        let mut candles: Vec<Candle> = rows
            .into_iter()
            .map(|r| Candle::new(r.time, r.open, r.high, r.low, r.close, r.volumeto))
            .collect();
        candles.sort_by_key(|c| c.time);

        debug!(
            from_symbol,
            to_symbol,
            aggregate,
            count = candles.len(),
            "candles fetched"
        );
        Ok(candles)
    }
}

impl std::fmt::Debug for CryptoCompareClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoCompareClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}
