use async_trait::async_trait;
use std::collections::HashMap;

use crate::errors::CoreError;
use crate::models::coin::Coin;

/// Trait abstraction over the external market-data API.
///
/// The production implementation talks to CoinGecko; tests inject mocks
/// to drive batching, caching, and failure paths deterministically. If
/// the API changes or goes away, only the one implementation is
/// replaced — the fetcher and everything above it are untouched.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Full coin reference list: every id the provider can price.
    async fn coin_list(&self) -> Result<Vec<Coin>, CoreError>;

    /// Current USD price for each requested coin id. One network call;
    /// callers are responsible for batching. Ids absent from the
    /// response are simply missing from the returned map.
    async fn simple_prices(&self, ids: &[String]) -> Result<HashMap<String, f64>, CoreError>;
}
