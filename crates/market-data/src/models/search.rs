//! Search candidate model for free-text asset lookup.

use serde::{Deserialize, Serialize};

use super::types::CoinId;

/// A candidate returned by the free-text search endpoint.
///
/// Candidates only carry identity; full market figures are fetched in a
/// second request keyed by [`id`](Self::id).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchCandidate {
    /// API identifier (e.g. "bitcoin")
    pub id: CoinId,

    /// Display name
    pub name: String,

    /// Ticker symbol as returned by the API
    pub symbol: String,

    /// Rank by market capitalization, if the asset is ranked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap_rank: Option<u32>,
}

impl SearchCandidate {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        symbol: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            symbol: symbol.into(),
            market_cap_rank: None,
        }
    }
}
