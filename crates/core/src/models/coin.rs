use serde::{Deserialize, Serialize};

/// Immutable coin reference data, decoded verbatim from the price
/// provider's `/coins/list` payload.
///
/// `id` is the provider's lookup key ("bitcoin"), `symbol` the ticker
/// ("btc" as delivered — display layers uppercase it), `name` the
/// human-readable name ("Bitcoin").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub id: String,
    pub symbol: String,
    pub name: String,
}

impl Coin {
    pub fn new(
        id: impl Into<String>,
        symbol: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            name: name.into(),
        }
    }
}
