use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Aggregated position in one coin, derived from all transactions
/// sharing a symbol. Never persisted — always recomputed from the
/// transaction log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Ticker symbol (group key)
    pub symbol: String,

    /// Price-provider key, taken from the first transaction of the group
    pub coin_id: String,

    /// Sum of signed transaction amounts
    pub total_amount: f64,

    /// Sum of amount × entry price across the group, in USD
    pub total_invested: f64,
}

impl Holding {
    /// Current market value given a USD price, or `None` when the price
    /// is not yet known.
    #[must_use]
    pub fn market_value(&self, prices: &HashMap<String, f64>) -> Option<f64> {
        prices.get(&self.coin_id).map(|p| self.total_amount * p)
    }
}

/// Whole-portfolio totals.
///
/// `total_value` counts only holdings with a known price; holdings still
/// waiting for a price contribute 0 to value but their full cost to
/// `total_invested`. The UI's "Fetching…" state keys off this asymmetry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_invested: f64,
    pub total_value: f64,
    pub total_profit: f64,
}

impl PortfolioSummary {
    /// Profit as a percentage of invested cost; 0 when nothing invested.
    #[must_use]
    pub fn profit_percent(&self) -> f64 {
        if self.total_invested == 0.0 {
            0.0
        } else {
            self.total_profit / self.total_invested * 100.0
        }
    }
}
