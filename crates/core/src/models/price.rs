use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::coin::Coin;

/// Maximum age of the price region before it must be refetched.
pub const PRICE_CACHE_TTL_SECS: i64 = 300;

/// Maximum age of the coin-list region before it must be refetched.
pub const COIN_LIST_TTL_SECS: i64 = 86_400;

/// Local cache of coin metadata and current USD prices.
///
/// Two regions, each with a SINGLE last-write timestamp: the price map
/// (short-lived, 5 minutes) and the coin list (long-lived, 24 hours).
/// A region is wholly fresh or wholly stale — there is no per-key age.
/// Staleness triggers a refetch of the requested subset only, but any
/// merge re-stamps the whole region, so a partial refresh extends
/// freshness for untouched keys too. That trade-off is intentional and
/// relied upon; do not "fix" it silently.
///
/// Persisted as a sidecar payload so it survives restarts; a corrupt
/// sidecar is treated as an empty cache, never as a fatal error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceCache {
    /// coin id → current USD price
    pub prices: HashMap<String, f64>,

    /// Last write into the price region; `None` means never written.
    pub prices_updated_at: Option<DateTime<Utc>>,

    /// Coin reference list, replaced wholesale on refresh.
    pub coins: Vec<Coin>,

    /// Last write into the coin-list region.
    pub coins_updated_at: Option<DateTime<Utc>>,
}

impl PriceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// All cached prices. Empty map when nothing has been cached yet.
    #[must_use]
    pub fn cached_prices(&self) -> &HashMap<String, f64> {
        &self.prices
    }

    /// Cached USD price for one coin id.
    #[must_use]
    pub fn price_for(&self, coin_id: &str) -> Option<f64> {
        self.prices.get(coin_id).copied()
    }

    /// Whether the price region is younger than [`PRICE_CACHE_TTL_SECS`].
    /// A never-written region is stale.
    #[must_use]
    pub fn is_price_cache_fresh(&self, now: DateTime<Utc>) -> bool {
        self.prices_updated_at
            .is_some_and(|t| (now - t).num_seconds() < PRICE_CACHE_TTL_SECS)
    }

    /// Merge freshly fetched prices into the region, last-write-wins per
    /// key, and re-stamp the shared timestamp. Untouched keys share the
    /// new freshness.
    pub fn merge_prices(&mut self, entries: &HashMap<String, f64>, now: DateTime<Utc>) {
        for (id, price) in entries {
            self.prices.insert(id.clone(), *price);
        }
        self.prices_updated_at = Some(now);
    }

    /// The cached coin list; empty slice when never fetched.
    #[must_use]
    pub fn cached_coin_list(&self) -> &[Coin] {
        &self.coins
    }

    /// Whether the coin-list region is younger than [`COIN_LIST_TTL_SECS`].
    #[must_use]
    pub fn is_coin_list_fresh(&self, now: DateTime<Utc>) -> bool {
        self.coins_updated_at
            .is_some_and(|t| (now - t).num_seconds() < COIN_LIST_TTL_SECS)
    }

    /// Replace the coin list wholesale and re-stamp its region.
    pub fn set_coin_list(&mut self, coins: Vec<Coin>, now: DateTime<Utc>) {
        self.coins = coins;
        self.coins_updated_at = Some(now);
    }

    /// Number of coin ids with a cached price.
    #[must_use]
    pub fn price_count(&self) -> usize {
        self.prices.len()
    }

    /// Number of coins in the cached reference list.
    #[must_use]
    pub fn coin_count(&self) -> usize {
        self.coins.len()
    }

    /// Drop both regions and their timestamps.
    pub fn clear(&mut self) {
        self.prices.clear();
        self.prices_updated_at = None;
        self.coins.clear();
        self.coins_updated_at = None;
    }
}
