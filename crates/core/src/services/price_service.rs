use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

use crate::clock::Clock;
use crate::errors::CoreError;
use crate::models::coin::Coin;
use crate::models::price::PriceCache;
use crate::providers::traits::MarketDataProvider;

/// Maximum coin ids per price-lookup request.
pub const PRICE_BATCH_SIZE: usize = 50;

/// Fetches current prices and coin metadata with cache-then-network
/// batching.
///
/// Both collaborators are injected: the provider so tests can script
/// responses and failures, the clock so freshness boundaries are exact.
pub struct PriceService {
    provider: Box<dyn MarketDataProvider>,
    clock: Arc<dyn Clock>,
}

impl PriceService {
    pub fn new(provider: Box<dyn MarketDataProvider>, clock: Arc<dyn Clock>) -> Self {
        Self { provider, clock }
    }

    /// Current USD prices for a set of coin ids.
    ///
    /// 1. Empty input returns an empty map with no network traffic.
    /// 2. Ids are sorted and split into batches of [`PRICE_BATCH_SIZE`].
    /// 3. A batch is served from cache only when the price region is
    ///    fresh AND every id of the batch has a cached entry; a partial
    ///    hit still goes to the network.
    /// 4. Each fetched batch merges into the cache immediately, so a
    ///    later batch failing never discards earlier gains — the error
    ///    aborts the call, and callers that want the partial result read
    ///    it from the cache.
    ///
    /// No automatic retry: a 429 or any other batch failure surfaces
    /// as-is and the caller decides.
    pub async fn fetch_prices(
        &self,
        cache: &mut PriceCache,
        ids: &HashSet<String>,
    ) -> Result<HashMap<String, f64>, CoreError> {
        if ids.is_empty() {
            debug!("no coin ids requested, skipping price fetch");
            return Ok(HashMap::new());
        }

        // Sorted ids make batch boundaries deterministic.
        let mut sorted: Vec<String> = ids.iter().cloned().collect();
        sorted.sort();

        let mut merged: HashMap<String, f64> = HashMap::new();

        for batch in sorted.chunks(PRICE_BATCH_SIZE) {
            if self.cache_covers_batch(cache, batch) {
                for id in batch {
                    if let Some(price) = cache.price_for(id) {
                        merged.insert(id.clone(), price);
                    }
                }
                debug!(batch = batch.len(), "served price batch from cache");
                continue;
            }

            let fetched = self.provider.simple_prices(batch).await?;
            cache.merge_prices(&fetched, self.clock.now());
            debug!(
                batch = batch.len(),
                fetched = fetched.len(),
                provider = self.provider.name(),
                "merged price batch"
            );
            merged.extend(fetched);
        }

        Ok(merged)
    }

    /// The full coin reference list, refetched at most once per 24h
    /// window. A fresh nonempty cached list short-circuits the call.
    pub async fn fetch_coin_list(&self, cache: &mut PriceCache) -> Result<Vec<Coin>, CoreError> {
        if cache.is_coin_list_fresh(self.clock.now()) && cache.coin_count() > 0 {
            debug!(coins = cache.coin_count(), "served coin list from cache");
            return Ok(cache.cached_coin_list().to_vec());
        }

        let coins = self.provider.coin_list().await?;
        debug!(
            coins = coins.len(),
            provider = self.provider.name(),
            "fetched coin list"
        );
        cache.set_coin_list(coins.clone(), self.clock.now());
        Ok(coins)
    }

    /// Whole-batch cache coverage: the price region must be fresh and
    /// contain every id of the batch.
    fn cache_covers_batch(&self, cache: &PriceCache, batch: &[String]) -> bool {
        cache.is_price_cache_fresh(self.clock.now())
            && batch.iter().all(|id| cache.price_for(id).is_some())
    }
}
