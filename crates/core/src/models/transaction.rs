use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single buy entry in the portfolio.
///
/// Transactions are append/delete only: once created they are never
/// updated in place. The entry price is captured at creation time, so
/// invested cost stays stable no matter what the market does later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: Uuid,

    /// Ticker symbol, uppercased (e.g., "BTC")
    pub symbol: String,

    /// Human-readable coin name (e.g., "Bitcoin")
    pub name: String,

    /// Price per unit in USD at time of entry
    pub price_per_unit_usd: f64,

    /// Quantity acquired (signed; negative entries reduce a holding)
    pub amount: f64,

    /// Price-provider key for this coin (e.g., "bitcoin")
    pub coin_id: String,

    /// Entry timestamp
    pub date: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        price_per_unit_usd: f64,
        amount: f64,
        coin_id: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol: symbol.into().to_uppercase(),
            name: name.into(),
            price_per_unit_usd,
            amount,
            coin_id: coin_id.into(),
            date,
        }
    }

    /// USD value of this entry at its recorded price.
    #[must_use]
    pub fn invested_usd(&self) -> f64 {
        self.amount * self.price_per_unit_usd
    }
}
