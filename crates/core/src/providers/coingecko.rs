use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use super::traits::MarketDataProvider;
use crate::errors::CoreError;
use crate::models::coin::Coin;

const BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Per-request timeout. One slow call must not block unrelated batches
/// indefinitely.
pub const REQUEST_TIMEOUT_SECS: u64 = 5;

/// CoinGecko API provider.
///
/// - **Free tier**: no API key; 429 responses are surfaced as
///   [`CoreError::RateLimited`] and never retried automatically.
/// - **Endpoints**: `/coins/list` (full reference list),
///   `/simple/price?ids=<csv>&vs_currencies=usd` (current USD prices).
pub struct CoinGeckoProvider {
    client: Client,
}

impl CoinGeckoProvider {
    pub fn new() -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
        }
    }

    /// Map a successful-connection, non-2xx response to the right error.
    fn status_error(status: reqwest::StatusCode) -> CoreError {
        if status.as_u16() == 429 {
            CoreError::RateLimited
        } else {
            CoreError::BadResponse {
                status: status.as_u16(),
            }
        }
    }
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── CoinGecko API response types ────────────────────────────────────

/// One entry of `/simple/price`: `{ "usd": 63024.12 }`. The field is
/// optional in the wire format; an absent price decodes as 0.0.
#[derive(Deserialize)]
struct VsCurrencyPrices {
    usd: Option<f64>,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl MarketDataProvider for CoinGeckoProvider {
    fn name(&self) -> &str {
        "CoinGecko"
    }

    async fn coin_list(&self) -> Result<Vec<Coin>, CoreError> {
        let url = format!("{BASE_URL}/coins/list");
        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Self::status_error(status));
        }

        let coins: Vec<Coin> = resp.json().await.map_err(|e| {
            CoreError::Decode(format!("Malformed coin list payload: {e}"))
        })?;
        Ok(coins)
    }

    async fn simple_prices(&self, ids: &[String]) -> Result<HashMap<String, f64>, CoreError> {
        let csv = ids.join(",");
        let url = format!("{BASE_URL}/simple/price?ids={csv}&vs_currencies=usd");
        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Self::status_error(status));
        }

        let body: HashMap<String, VsCurrencyPrices> = resp.json().await.map_err(|e| {
            CoreError::Decode(format!("Malformed price payload: {e}"))
        })?;

        Ok(body
            .into_iter()
            .map(|(id, entry)| (id, entry.usd.unwrap_or(0.0)))
            .collect())
    }
}
