use serde::{Deserialize, Serialize};

use super::types::CoinId;

/// One row of a market snapshot.
///
/// Snapshots are `Vec<MarketAsset>` kept in the order the API returned them
/// (descending market capitalization). They are never re-sorted locally.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAsset {
    /// API identifier (e.g. "bitcoin")
    pub id: CoinId,

    /// Upper-cased ticker symbol (e.g. "BTC")
    pub symbol: String,

    /// Display name (e.g. "Bitcoin")
    pub name: String,

    /// Unit price in the requested currency
    pub price: f64,

    /// 24h price change in percent
    pub change_24h: f64,

    /// Market capitalization in the requested currency
    pub market_cap: f64,

    /// 24h traded volume in the requested currency
    pub volume_24h: f64,

    /// Icon URL
    pub image: String,
}

impl MarketAsset {
    /// Create an asset with the identity fields set and all figures zeroed.
    pub fn new(id: impl Into<String>, symbol: impl AsRef<str>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.as_ref().to_uppercase(),
            name: name.into(),
            price: 0.0,
            change_24h: 0.0,
            market_cap: 0.0,
            volume_24h: 0.0,
            image: String::new(),
        }
    }

    /// Set the unit price.
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    /// Set the market capitalization.
    pub fn with_market_cap(mut self, market_cap: f64) -> Self {
        self.market_cap = market_cap;
        self
    }
}
