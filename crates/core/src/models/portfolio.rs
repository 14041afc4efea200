use serde::{Deserialize, Serialize};

use super::alert::PriceAlert;
use super::settings::Settings;
use super::transaction::Transaction;

/// The main persisted container: the transaction log, active alert
/// rules, and user settings. Serialized as one durable payload.
///
/// The price cache deliberately lives OUTSIDE this struct (its own
/// sidecar file), so a corrupt cache can never take the store down
/// with it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Portfolio {
    /// All buy entries, in insertion order
    pub transactions: Vec<Transaction>,

    /// Active alert rules; triggered rules are removed
    pub alerts: Vec<PriceAlert>,

    /// UI section-collapse flags
    #[serde(default)]
    pub settings: Settings,
}
