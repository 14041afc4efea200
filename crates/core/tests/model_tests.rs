// ═══════════════════════════════════════════════════════════════════
// Model Tests — Coin, Transaction, PriceAlert, Holding, Settings
// ═══════════════════════════════════════════════════════════════════

use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;

use coinfolio_core::errors::CoreError;
use coinfolio_core::models::alert::{PriceAlert, MAX_ALERT_PERCENTAGE};
use coinfolio_core::models::coin::Coin;
use coinfolio_core::models::holding::{Holding, PortfolioSummary};
use coinfolio_core::models::portfolio::Portfolio;
use coinfolio_core::models::settings::{Section, Settings};
use coinfolio_core::models::transaction::Transaction;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 1, 12, 0, 0).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
//  Coin
// ═══════════════════════════════════════════════════════════════════

mod coin {
    use super::*;

    #[test]
    fn new_preserves_fields() {
        let c = Coin::new("bitcoin", "btc", "Bitcoin");
        assert_eq!(c.id, "bitcoin");
        assert_eq!(c.symbol, "btc");
        assert_eq!(c.name, "Bitcoin");
    }

    #[test]
    fn decodes_provider_list_entry() {
        // Shape of one /coins/list element
        let json = r#"{"id":"ethereum","symbol":"eth","name":"Ethereum"}"#;
        let c: Coin = serde_json::from_str(json).unwrap();
        assert_eq!(c, Coin::new("ethereum", "eth", "Ethereum"));
    }

    #[test]
    fn serde_roundtrip() {
        let c = Coin::new("solana", "sol", "Solana");
        let json = serde_json::to_string(&c).unwrap();
        let back: Coin = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Transaction
// ═══════════════════════════════════════════════════════════════════

mod transaction {
    use super::*;

    #[test]
    fn new_uppercases_symbol() {
        let tx = Transaction::new("btc", "Bitcoin", 50_000.0, 0.1, "bitcoin", t0());
        assert_eq!(tx.symbol, "BTC");
    }

    #[test]
    fn new_preserves_name_and_coin_id_case() {
        let tx = Transaction::new("btc", "Bitcoin", 50_000.0, 0.1, "bitcoin", t0());
        assert_eq!(tx.name, "Bitcoin");
        assert_eq!(tx.coin_id, "bitcoin");
    }

    #[test]
    fn ids_are_unique() {
        let a = Transaction::new("BTC", "Bitcoin", 50_000.0, 0.1, "bitcoin", t0());
        let b = Transaction::new("BTC", "Bitcoin", 50_000.0, 0.1, "bitcoin", t0());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn invested_usd_is_amount_times_entry_price() {
        let tx = Transaction::new("ETH", "Ethereum", 2_000.0, 1.5, "ethereum", t0());
        assert!((tx.invested_usd() - 3_000.0).abs() < 1e-9);
    }

    #[test]
    fn serde_roundtrip() {
        let tx = Transaction::new("SOL", "Solana", 150.0, 10.0, "solana", t0());
        let json = serde_json::to_string(&tx).unwrap();
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(tx, back);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  PriceAlert — threshold invariants enforced at construction
// ═══════════════════════════════════════════════════════════════════

mod price_alert {
    use super::*;

    #[test]
    fn new_valid_positive_threshold() {
        let a = PriceAlert::new("btc", "bitcoin", 60_000.0, 10.0, t0()).unwrap();
        assert_eq!(a.symbol, "BTC");
        assert_eq!(a.coin_id, "bitcoin");
        assert_eq!(a.signed_percentage, 10.0);
    }

    #[test]
    fn new_valid_negative_threshold() {
        let a = PriceAlert::new("ETH", "ethereum", 2_500.0, -5.0, t0()).unwrap();
        assert_eq!(a.signed_percentage, -5.0);
    }

    #[test]
    fn boundary_thresholds_accepted() {
        assert!(PriceAlert::new("BTC", "bitcoin", 100.0, MAX_ALERT_PERCENTAGE, t0()).is_ok());
        assert!(PriceAlert::new("BTC", "bitcoin", 100.0, -MAX_ALERT_PERCENTAGE, t0()).is_ok());
    }

    #[test]
    fn zero_threshold_rejected() {
        let err = PriceAlert::new("BTC", "bitcoin", 100.0, 0.0, t0()).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn out_of_range_thresholds_rejected() {
        assert!(PriceAlert::new("BTC", "bitcoin", 100.0, 20.5, t0()).is_err());
        assert!(PriceAlert::new("BTC", "bitcoin", 100.0, -20.5, t0()).is_err());
    }

    #[test]
    fn non_finite_threshold_rejected() {
        assert!(PriceAlert::new("BTC", "bitcoin", 100.0, f64::NAN, t0()).is_err());
        assert!(PriceAlert::new("BTC", "bitcoin", 100.0, f64::INFINITY, t0()).is_err());
    }

    #[test]
    fn non_positive_reference_price_rejected() {
        assert!(PriceAlert::new("BTC", "bitcoin", 0.0, 10.0, t0()).is_err());
        assert!(PriceAlert::new("BTC", "bitcoin", -1.0, 10.0, t0()).is_err());
    }

    #[test]
    fn empty_symbol_or_coin_id_rejected() {
        assert!(PriceAlert::new("", "bitcoin", 100.0, 10.0, t0()).is_err());
        assert!(PriceAlert::new("BTC", "", 100.0, 10.0, t0()).is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let a = PriceAlert::new("BTC", "bitcoin", 60_000.0, -12.5, t0()).unwrap();
        let json = serde_json::to_string(&a).unwrap();
        let back: PriceAlert = serde_json::from_str(&json).unwrap();
        assert_eq!(a, back);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Holding & PortfolioSummary
// ═══════════════════════════════════════════════════════════════════

mod holding {
    use super::*;

    #[test]
    fn market_value_with_known_price() {
        let h = Holding {
            symbol: "BTC".into(),
            coin_id: "bitcoin".into(),
            total_amount: 0.5,
            total_invested: 20_000.0,
        };
        let prices = HashMap::from([("bitcoin".to_string(), 60_000.0)]);
        assert!((h.market_value(&prices).unwrap() - 30_000.0).abs() < 1e-9);
    }

    #[test]
    fn market_value_none_without_price() {
        let h = Holding {
            symbol: "ETH".into(),
            coin_id: "ethereum".into(),
            total_amount: 1.0,
            total_invested: 2_000.0,
        };
        assert!(h.market_value(&HashMap::new()).is_none());
    }

    #[test]
    fn profit_percent_zero_when_nothing_invested() {
        let s = PortfolioSummary {
            total_invested: 0.0,
            total_value: 0.0,
            total_profit: 0.0,
        };
        assert_eq!(s.profit_percent(), 0.0);
    }

    #[test]
    fn profit_percent_relative_to_invested() {
        let s = PortfolioSummary {
            total_invested: 1_000.0,
            total_value: 1_250.0,
            total_profit: 250.0,
        };
        assert!((s.profit_percent() - 25.0).abs() < 1e-9);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Settings & Portfolio container
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;

    #[test]
    fn all_sections_visible_by_default() {
        let s = Settings::default();
        assert!(s.is_visible(Section::Price));
        assert!(s.is_visible(Section::Assets));
        assert!(s.is_visible(Section::Alerts));
    }

    #[test]
    fn flags_are_independent() {
        let mut s = Settings::default();
        s.set_visible(Section::Assets, false);
        assert!(s.is_visible(Section::Price));
        assert!(!s.is_visible(Section::Assets));
        assert!(s.is_visible(Section::Alerts));
    }

    #[test]
    fn portfolio_default_is_empty() {
        let p = Portfolio::default();
        assert!(p.transactions.is_empty());
        assert!(p.alerts.is_empty());
        assert_eq!(p.settings, Settings::default());
    }

    #[test]
    fn portfolio_serde_roundtrip() {
        let mut p = Portfolio::default();
        p.transactions
            .push(Transaction::new("BTC", "Bitcoin", 50_000.0, 0.1, "bitcoin", t0()));
        p.alerts
            .push(PriceAlert::new("BTC", "bitcoin", 50_000.0, 10.0, t0()).unwrap());
        p.settings.set_visible(Section::Alerts, false);

        let json = serde_json::to_string(&p).unwrap();
        let back: Portfolio = serde_json::from_str(&json).unwrap();
        assert_eq!(back.transactions, p.transactions);
        assert_eq!(back.alerts, p.alerts);
        assert_eq!(back.settings, p.settings);
    }
}
