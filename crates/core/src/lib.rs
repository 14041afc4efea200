pub mod clock;
pub mod errors;
pub mod models;
pub mod notify;
pub mod providers;
pub mod services;
pub mod storage;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use clock::{Clock, SystemClock};
use errors::CoreError;
use models::alert::PriceAlert;
use models::coin::Coin;
use models::holding::{Holding, PortfolioSummary};
use models::portfolio::Portfolio;
use models::price::PriceCache;
use models::settings::Section;
use models::transaction::Transaction;
use notify::{LogNotifier, NotificationSink};
use providers::coingecko::CoinGeckoProvider;
use providers::traits::MarketDataProvider;
use services::alert_service::AlertService;
use services::portfolio_service::PortfolioService;
use services::price_service::PriceService;
use storage::manager::StorageManager;

/// Coin ids warmed opportunistically at startup so the first screens
/// have prices before the user's own holdings are known.
pub const PRELOAD_COIN_IDS: [&str; 7] = [
    "bitcoin",
    "ethereum",
    "solana",
    "chainlink",
    "the-open-network",
    "sui",
    "ripple",
];

#[cfg(not(target_arch = "wasm32"))]
struct StorePaths {
    portfolio: std::path::PathBuf,
    cache: std::path::PathBuf,
}

/// Main entry point for the Coinfolio core library.
///
/// Owns the portfolio (transaction log, alert rules, settings), the
/// price cache, and the services operating on them. The price provider,
/// notification sink, and clock are injected at construction; a GUI
/// layer drives the async refresh entry points from its own triggers
/// (startup, a repeating timer, explicit user action, after a save) and
/// polls [`Coinfolio::data_version`] to know when to re-query.
///
/// Refreshes take `&mut self`, so overlapping refreshes are impossible
/// by construction — the single in-flight guard is the borrow checker.
#[must_use]
pub struct Coinfolio {
    portfolio: Portfolio,
    price_cache: PriceCache,
    portfolio_service: PortfolioService,
    price_service: PriceService,
    alert_service: AlertService,
    clock: Arc<dyn Clock>,
    #[cfg(not(target_arch = "wasm32"))]
    store: Option<StorePaths>,
    /// Tracks whether any mutation has occurred since the last save/load
    /// (bytes-backed embedders only; directory mode commits per
    /// operation).
    dirty: bool,
    /// Monotonic change counter for polling consumers.
    data_version: u64,
}

impl std::fmt::Debug for Coinfolio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coinfolio")
            .field("transactions", &self.portfolio.transactions.len())
            .field("alerts", &self.portfolio.alerts.len())
            .field("cached_prices", &self.price_cache.price_count())
            .field("data_version", &self.data_version)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl Coinfolio {
    /// Create a brand new empty portfolio with injected collaborators.
    pub fn create_new(
        provider: Box<dyn MarketDataProvider>,
        notifier: Box<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::build(Portfolio::default(), PriceCache::new(), provider, notifier, clock)
    }

    /// Empty portfolio wired to CoinGecko, the logging notification
    /// sink, and the system clock.
    pub fn with_defaults() -> Self {
        Self::create_new(
            Box::new(CoinGeckoProvider::new()),
            Box::new(LogNotifier),
            Arc::new(SystemClock),
        )
    }

    /// Load a portfolio from store bytes (frontends that own file I/O,
    /// e.g. WASM). The price cache starts empty; feed it with
    /// [`Coinfolio::attach_cache_bytes`].
    pub fn load_from_bytes(
        data: &[u8],
        provider: Box<dyn MarketDataProvider>,
        notifier: Box<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CoreError> {
        let portfolio = StorageManager::portfolio_from_bytes(data)?;
        Ok(Self::build(portfolio, PriceCache::new(), provider, notifier, clock))
    }

    /// Open a directory-backed portfolio (native only). Every mutating
    /// operation afterwards commits durably before reporting success.
    ///
    /// A missing store file means a fresh portfolio; a corrupt one is a
    /// boot failure. A missing or corrupt cache sidecar is only a miss.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open(
        dir: &std::path::Path,
        provider: Box<dyn MarketDataProvider>,
        notifier: Box<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CoreError> {
        let portfolio_path = dir.join(storage::manager::PORTFOLIO_FILE);
        let cache_path = dir.join(storage::manager::PRICE_CACHE_FILE);

        let portfolio = StorageManager::load_portfolio(&portfolio_path)?.unwrap_or_default();
        let price_cache = match StorageManager::load_cache(&cache_path) {
            Ok(cache) => cache,
            Err(e) => {
                warn!("price cache unreadable, starting empty: {e}");
                PriceCache::new()
            }
        };

        let mut folio = Self::build(portfolio, price_cache, provider, notifier, clock);
        folio.store = Some(StorePaths {
            portfolio: portfolio_path,
            cache: cache_path,
        });
        Ok(folio)
    }

    /// [`Coinfolio::open`] with the default collaborators.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open_with_defaults(dir: &std::path::Path) -> Result<Self, CoreError> {
        Self::open(
            dir,
            Box::new(CoinGeckoProvider::new()),
            Box::new(LogNotifier),
            Arc::new(SystemClock),
        )
    }

    /// Serialize the portfolio to store bytes. Clears the
    /// unsaved-changes flag on success.
    pub fn save_to_bytes(&mut self) -> Result<Vec<u8>, CoreError> {
        let bytes = StorageManager::portfolio_to_bytes(&self.portfolio)?;
        self.dirty = false;
        Ok(bytes)
    }

    /// Serialize the price cache to sidecar bytes.
    pub fn cache_to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        StorageManager::cache_to_bytes(&self.price_cache)
    }

    /// Restore a previously saved price cache. Corrupt input is a cache
    /// miss, not an error: the cache stays empty, the failure is logged,
    /// and the next refresh refetches. Returns whether bytes were
    /// accepted.
    pub fn attach_cache_bytes(&mut self, data: &[u8]) -> bool {
        match StorageManager::cache_from_bytes(data) {
            Ok(cache) => {
                self.price_cache = cache;
                self.bump_version();
                true
            }
            Err(e) => {
                warn!("ignoring unreadable price cache: {e}");
                false
            }
        }
    }

    // ── Transactions ────────────────────────────────────────────────

    /// Record a buy entry. The entry timestamp comes from the injected
    /// clock; the symbol is uppercased.
    pub fn add_transaction(
        &mut self,
        symbol: impl Into<String>,
        name: impl Into<String>,
        price_per_unit_usd: f64,
        amount: f64,
        coin_id: impl Into<String>,
    ) -> Result<Uuid, CoreError> {
        let transaction = Transaction::new(
            symbol,
            name,
            price_per_unit_usd,
            amount,
            coin_id,
            self.clock.now(),
        );
        let id = transaction.id;
        self.portfolio_service
            .add_transaction(&mut self.portfolio, transaction)?;
        self.mark_portfolio_changed()?;
        Ok(id)
    }

    /// Delete a transaction by its ID.
    pub fn remove_transaction(&mut self, transaction_id: Uuid) -> Result<(), CoreError> {
        self.portfolio_service
            .remove_transaction(&mut self.portfolio, transaction_id)?;
        self.mark_portfolio_changed()
    }

    /// All transactions in insertion order.
    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.portfolio.transactions
    }

    /// Transactions for one symbol (case-insensitive), newest-first —
    /// the detail-view query.
    #[must_use]
    pub fn transactions_for_symbol(&self, symbol: &str) -> Vec<&Transaction> {
        let upper = symbol.to_uppercase();
        let mut txs: Vec<&Transaction> = self
            .portfolio
            .transactions
            .iter()
            .filter(|t| t.symbol == upper)
            .collect();
        txs.sort_by(|a, b| b.date.cmp(&a.date));
        txs
    }

    /// Total number of recorded transactions.
    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.portfolio.transactions.len()
    }

    // ── Alerts ──────────────────────────────────────────────────────

    /// Create a one-shot price alert anchored to the given reference
    /// price. The threshold must be nonzero and within ±20%.
    pub fn add_alert(
        &mut self,
        symbol: impl Into<String>,
        coin_id: impl Into<String>,
        reference_price: f64,
        signed_percentage: f64,
    ) -> Result<Uuid, CoreError> {
        let alert = PriceAlert::new(
            symbol,
            coin_id,
            reference_price,
            signed_percentage,
            self.clock.now(),
        )?;
        let id = alert.id;
        self.portfolio.alerts.push(alert);
        self.mark_portfolio_changed()?;
        Ok(id)
    }

    /// Delete an alert rule by its ID (the explicit Deleted transition).
    pub fn remove_alert(&mut self, alert_id: Uuid) -> Result<(), CoreError> {
        let idx = self
            .portfolio
            .alerts
            .iter()
            .position(|a| a.id == alert_id)
            .ok_or_else(|| CoreError::AlertNotFound(alert_id.to_string()))?;
        self.portfolio.alerts.remove(idx);
        self.mark_portfolio_changed()
    }

    /// Active alert rules, newest-created-first.
    #[must_use]
    pub fn current_alerts(&self) -> Vec<&PriceAlert> {
        let mut alerts: Vec<&PriceAlert> = self.portfolio.alerts.iter().collect();
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        alerts
    }

    /// Active alerts for one symbol (case-insensitive), newest-first.
    #[must_use]
    pub fn alerts_for_symbol(&self, symbol: &str) -> Vec<&PriceAlert> {
        let upper = symbol.to_uppercase();
        let mut alerts: Vec<&PriceAlert> = self
            .portfolio
            .alerts
            .iter()
            .filter(|a| a.symbol == upper)
            .collect();
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        alerts
    }

    // ── Holdings & Summary ──────────────────────────────────────────

    /// Current holdings: one aggregated position per symbol, sorted by
    /// symbol.
    #[must_use]
    pub fn current_holdings(&self) -> Vec<Holding> {
        self.portfolio_service
            .aggregate(&self.portfolio.transactions)
    }

    /// Portfolio totals against the cached price snapshot. Holdings
    /// whose price is not cached yet count toward invested cost but not
    /// value.
    #[must_use]
    pub fn portfolio_summary(&self) -> PortfolioSummary {
        let holdings = self.current_holdings();
        self.portfolio_service
            .summarize(&holdings, self.price_cache.cached_prices())
    }

    // ── Prices & Coins ──────────────────────────────────────────────

    /// The full cached price map.
    #[must_use]
    pub fn cached_prices(&self) -> &HashMap<String, f64> {
        self.price_cache.cached_prices()
    }

    /// Cached USD price for one coin id.
    #[must_use]
    pub fn price_for(&self, coin_id: &str) -> Option<f64> {
        self.price_cache.price_for(coin_id)
    }

    /// The cached coin reference list (may be empty before the first
    /// coin-list fetch).
    #[must_use]
    pub fn coin_list(&self) -> &[Coin] {
        self.price_cache.cached_coin_list()
    }

    /// Search the cached coin list, best matches first: exact symbol,
    /// then symbol prefix, then name matches, with the popular preload
    /// coins boosted to the top. An empty query returns everything.
    #[must_use]
    pub fn search_coins(&self, query: &str) -> Vec<&Coin> {
        let q = query.to_lowercase();
        let mut matches: Vec<(&Coin, i32)> = self
            .price_cache
            .cached_coin_list()
            .iter()
            .filter(|c| {
                q.is_empty()
                    || c.symbol.to_lowercase().contains(&q)
                    || c.name.to_lowercase().contains(&q)
            })
            .map(|c| (c, Self::search_score(c, &q)))
            .collect();
        matches.sort_by(|a, b| b.1.cmp(&a.1));
        matches.into_iter().map(|(c, _)| c).collect()
    }

    fn search_score(coin: &Coin, query: &str) -> i32 {
        let symbol = coin.symbol.to_lowercase();
        let name = coin.name.to_lowercase();
        let priority = if PRELOAD_COIN_IDS.contains(&coin.id.as_str()) {
            1000
        } else {
            0
        };
        let relevance = if symbol == *query {
            200
        } else if symbol.starts_with(query) {
            100
        } else if name == *query {
            80
        } else if name.starts_with(query) {
            60
        } else if symbol.contains(query) {
            40
        } else if name.contains(query) {
            20
        } else {
            0
        };
        priority + relevance
    }

    // ── Refresh ─────────────────────────────────────────────────────

    /// User-triggered refresh: fetch prices for every held coin, then
    /// evaluate alert rules against the full merged price map.
    ///
    /// Errors surface to the caller — this is a foreground action. A
    /// batch failing partway still leaves earlier batches merged and
    /// committed, so the UI can show stale-but-present numbers alongside
    /// the failure message.
    pub async fn refresh_prices(&mut self) -> Result<HashMap<String, f64>, CoreError> {
        let ids: HashSet<String> = self
            .portfolio
            .transactions
            .iter()
            .map(|t| t.coin_id.clone())
            .filter(|id| !id.is_empty())
            .collect();

        let fetch_result = self
            .price_service
            .fetch_prices(&mut self.price_cache, &ids)
            .await;
        self.dirty = true;
        self.bump_version();
        self.persist_cache()?;
        let prices = fetch_result?;

        // Alerts see the whole cached map, not just this refresh's ids,
        // so rules on preloaded-but-unheld coins can still fire.
        let snapshot = self.price_cache.cached_prices().clone();
        let triggered = self
            .alert_service
            .evaluate(&mut self.portfolio, &snapshot)
            .await;
        if !triggered.is_empty() {
            self.mark_portfolio_changed()?;
        }

        Ok(prices)
    }

    /// User-triggered coin-list refresh; errors surface.
    pub async fn refresh_coin_list(&mut self) -> Result<Vec<Coin>, CoreError> {
        let coins = self
            .price_service
            .fetch_coin_list(&mut self.price_cache)
            .await?;
        self.dirty = true;
        self.bump_version();
        self.persist_cache()?;
        Ok(coins)
    }

    /// Opportunistic startup warm-up: coin list, popular-coin prices,
    /// and the notification permission request. Background work — every
    /// failure is logged and swallowed.
    pub async fn preload(&mut self) {
        if let Err(e) = self
            .price_service
            .fetch_coin_list(&mut self.price_cache)
            .await
        {
            warn!("coin list preload failed: {e}");
        }

        let ids: HashSet<String> = PRELOAD_COIN_IDS.iter().map(|s| s.to_string()).collect();
        if let Err(e) = self
            .price_service
            .fetch_prices(&mut self.price_cache, &ids)
            .await
        {
            warn!("price preload failed: {e}");
        }

        if let Err(e) = self.persist_cache() {
            warn!("price cache commit after preload failed: {e}");
        }

        self.alert_service.request_permission().await;
        self.dirty = true;
        self.bump_version();
    }

    // ── Settings ────────────────────────────────────────────────────

    /// Whether a main-screen section is expanded.
    #[must_use]
    pub fn is_section_visible(&self, section: Section) -> bool {
        self.portfolio.settings.is_visible(section)
    }

    /// Persist a section-collapse toggle.
    pub fn set_section_visible(&mut self, section: Section, visible: bool) -> Result<(), CoreError> {
        self.portfolio.settings.set_visible(section, visible);
        self.mark_portfolio_changed()
    }

    // ── Change Tracking ─────────────────────────────────────────────

    /// Monotonic counter bumped whenever transactions, alerts, settings,
    /// or cached prices change. Consumers poll it instead of observing
    /// fields.
    #[must_use]
    pub fn data_version(&self) -> u64 {
        self.data_version
    }

    /// `true` if in-memory state has changed since the last save or load
    /// (meaningful for bytes-backed embedders; directory mode commits on
    /// every mutation).
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// Export all transactions as a JSON string.
    pub fn export_transactions_to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.portfolio.transactions).map_err(|e| {
            CoreError::Serialization(format!("Failed to serialize transactions to JSON: {e}"))
        })
    }

    /// Import transactions from a JSON string. All entries are validated
    /// first; if any fails, none are added. Returns the number imported.
    pub fn import_transactions_from_json(&mut self, json: &str) -> Result<usize, CoreError> {
        let transactions: Vec<Transaction> = serde_json::from_str(json)?;
        let count = transactions.len();

        let mut staged = self.portfolio.clone();
        for transaction in transactions {
            self.portfolio_service
                .add_transaction(&mut staged, transaction)?;
        }

        self.portfolio = staged;
        self.mark_portfolio_changed()?;
        Ok(count)
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(
        portfolio: Portfolio,
        price_cache: PriceCache,
        provider: Box<dyn MarketDataProvider>,
        notifier: Box<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let price_service = PriceService::new(provider, Arc::clone(&clock));
        let alert_service = AlertService::new(notifier);

        Self {
            portfolio,
            price_cache,
            portfolio_service: PortfolioService::new(),
            price_service,
            alert_service,
            clock,
            #[cfg(not(target_arch = "wasm32"))]
            store: None,
            dirty: false,
            data_version: 0,
        }
    }

    fn bump_version(&mut self) {
        self.data_version += 1;
    }

    /// Portfolio mutated: flag it, signal it, and — in directory mode —
    /// commit it before reporting success.
    fn mark_portfolio_changed(&mut self) -> Result<(), CoreError> {
        self.dirty = true;
        self.bump_version();
        self.persist_portfolio()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn persist_portfolio(&mut self) -> Result<(), CoreError> {
        if let Some(store) = &self.store {
            StorageManager::save_portfolio(&self.portfolio, &store.portfolio)?;
            self.dirty = false;
        }
        Ok(())
    }

    #[cfg(target_arch = "wasm32")]
    fn persist_portfolio(&mut self) -> Result<(), CoreError> {
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn persist_cache(&mut self) -> Result<(), CoreError> {
        if let Some(store) = &self.store {
            StorageManager::save_cache(&self.price_cache, &store.cache)?;
        }
        Ok(())
    }

    #[cfg(target_arch = "wasm32")]
    fn persist_cache(&mut self) -> Result<(), CoreError> {
        Ok(())
    }
}
