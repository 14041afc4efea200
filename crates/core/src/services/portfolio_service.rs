use std::collections::HashMap;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::holding::{Holding, PortfolioSummary};
use crate::models::portfolio::Portfolio;
use crate::models::transaction::Transaction;

/// Manages the transaction log and derives holdings from it.
///
/// Pure business logic — no I/O, no API calls. Easy to test.
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    /// Append a transaction to the log. Validates before committing;
    /// the log itself is never reordered or edited in place.
    pub fn add_transaction(
        &self,
        portfolio: &mut Portfolio,
        transaction: Transaction,
    ) -> Result<(), CoreError> {
        Self::validate_transaction(&transaction)?;
        portfolio.transactions.push(transaction);
        Ok(())
    }

    /// Remove a transaction by its UUID.
    pub fn remove_transaction(
        &self,
        portfolio: &mut Portfolio,
        transaction_id: Uuid,
    ) -> Result<(), CoreError> {
        let idx = portfolio
            .transactions
            .iter()
            .position(|t| t.id == transaction_id)
            .ok_or_else(|| CoreError::TransactionNotFound(transaction_id.to_string()))?;
        portfolio.transactions.remove(idx);
        Ok(())
    }

    /// Group the transaction log into holdings: one per symbol, summed
    /// signed amount and invested cost, sorted by symbol ascending.
    ///
    /// A pure fold — the result depends only on the set of transactions,
    /// never on their order. The coin id of a holding comes from the
    /// first transaction carrying that symbol.
    #[must_use]
    pub fn aggregate(&self, transactions: &[Transaction]) -> Vec<Holding> {
        let mut grouped: HashMap<String, Holding> = HashMap::new();

        for tx in transactions {
            match grouped.get_mut(&tx.symbol) {
                Some(holding) => {
                    holding.total_amount += tx.amount;
                    holding.total_invested += tx.invested_usd();
                }
                None => {
                    grouped.insert(
                        tx.symbol.clone(),
                        Holding {
                            symbol: tx.symbol.clone(),
                            coin_id: tx.coin_id.clone(),
                            total_amount: tx.amount,
                            total_invested: tx.invested_usd(),
                        },
                    );
                }
            }
        }

        let mut holdings: Vec<Holding> = grouped.into_values().collect();
        holdings.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        holdings
    }

    /// Portfolio totals against a price snapshot.
    ///
    /// Holdings without a price entry contribute 0 to `total_value` but
    /// their full cost to `total_invested`. The asymmetry is load-bearing:
    /// it is how consumers tell "worthless" apart from "price still
    /// loading".
    #[must_use]
    pub fn summarize(
        &self,
        holdings: &[Holding],
        prices: &HashMap<String, f64>,
    ) -> PortfolioSummary {
        let total_invested: f64 = holdings.iter().map(|h| h.total_invested).sum();
        let total_value: f64 = holdings
            .iter()
            .filter_map(|h| h.market_value(prices))
            .sum();

        PortfolioSummary {
            total_invested,
            total_value,
            total_profit: total_value - total_invested,
        }
    }

    /// Validation rules for a new transaction:
    /// - amount must be a finite nonzero quantity
    /// - entry price must be finite and non-negative
    /// - symbol and coin id must be nonempty
    fn validate_transaction(transaction: &Transaction) -> Result<(), CoreError> {
        if !transaction.amount.is_finite() || transaction.amount == 0.0 {
            return Err(CoreError::Validation(
                "Transaction amount must be a nonzero finite quantity".into(),
            ));
        }
        if !transaction.price_per_unit_usd.is_finite() || transaction.price_per_unit_usd < 0.0 {
            return Err(CoreError::Validation(format!(
                "Transaction entry price must be non-negative, got {}",
                transaction.price_per_unit_usd
            )));
        }
        if transaction.symbol.is_empty() || transaction.coin_id.is_empty() {
            return Err(CoreError::Validation(
                "Transaction symbol and coin id must be nonempty".into(),
            ));
        }
        Ok(())
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}
