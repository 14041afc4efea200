use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;

/// Largest allowed threshold magnitude, in percent.
pub const MAX_ALERT_PERCENTAGE: f64 = 20.0;

/// A one-shot price alert rule.
///
/// The rule is Active from creation until either the user deletes it or
/// it triggers — triggering deletes the rule, so a rule can never fire
/// twice. `signed_percentage` encodes direction: positive means notify
/// on a rise of at least that much, negative on a fall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceAlert {
    /// Unique identifier
    pub id: Uuid,

    /// Ticker symbol, uppercased (e.g., "BTC")
    pub symbol: String,

    /// Price-provider key for this coin (e.g., "bitcoin")
    pub coin_id: String,

    /// USD price captured when the alert was created; the deviation
    /// baseline.
    pub reference_price: f64,

    /// Threshold in percent, nonzero, within [-20, +20].
    pub signed_percentage: f64,

    /// Creation timestamp (evaluation iterates newest-first).
    pub created_at: DateTime<Utc>,
}

impl PriceAlert {
    /// Create a new alert rule, enforcing the threshold invariants:
    /// nonzero, finite, and within ±[`MAX_ALERT_PERCENTAGE`]. The
    /// reference price must be a positive finite number.
    pub fn new(
        symbol: impl Into<String>,
        coin_id: impl Into<String>,
        reference_price: f64,
        signed_percentage: f64,
        created_at: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        if !signed_percentage.is_finite() || signed_percentage == 0.0 {
            return Err(CoreError::Validation(
                "Alert percentage must be a nonzero finite number".into(),
            ));
        }
        if signed_percentage.abs() > MAX_ALERT_PERCENTAGE {
            return Err(CoreError::Validation(format!(
                "Alert percentage {signed_percentage} outside allowed range ±{MAX_ALERT_PERCENTAGE}"
            )));
        }
        if !reference_price.is_finite() || reference_price <= 0.0 {
            return Err(CoreError::Validation(format!(
                "Alert reference price must be positive, got {reference_price}"
            )));
        }
        let symbol = symbol.into().to_uppercase();
        let coin_id = coin_id.into();
        if symbol.is_empty() || coin_id.is_empty() {
            return Err(CoreError::Validation(
                "Alert symbol and coin id must be nonempty".into(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            symbol,
            coin_id,
            reference_price,
            signed_percentage,
            created_at,
        })
    }
}
