//! CoinGecko API response models.
//!
//! These mirror the wire shapes of the v3 endpoints we consume and are
//! converted into the crate's public models right after decoding.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::{GlobalStats, MarketAsset, SearchCandidate};

/// Row of `/coins/markets`
#[derive(Debug, Deserialize)]
pub struct CoinMarketRow {
    pub id: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub total_volume: Option<f64>,
}

impl From<CoinMarketRow> for MarketAsset {
    fn from(row: CoinMarketRow) -> Self {
        Self {
            id: row.id,
            symbol: row.symbol.to_uppercase(),
            name: row.name,
            price: row.current_price.unwrap_or_default(),
            change_24h: row.price_change_percentage_24h.unwrap_or_default(),
            market_cap: row.market_cap.unwrap_or_default(),
            volume_24h: row.total_volume.unwrap_or_default(),
            image: row.image.unwrap_or_default(),
        }
    }
}

/// Envelope of `/global`
#[derive(Debug, Deserialize)]
pub struct GlobalResponse {
    pub data: GlobalData,
}

/// Payload of `/global`
#[derive(Debug, Deserialize)]
pub struct GlobalData {
    #[serde(default)]
    pub total_market_cap: HashMap<String, f64>,
    #[serde(default)]
    pub total_volume: HashMap<String, f64>,
    pub market_cap_change_percentage_24h_usd: Option<f64>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl GlobalData {
    /// Project the per-currency maps onto `currency`.
    pub fn into_stats(self, currency: &str) -> GlobalStats {
        GlobalStats {
            total_market_cap: self
                .total_market_cap
                .get(currency)
                .copied()
                .unwrap_or_default(),
            total_volume: self.total_volume.get(currency).copied().unwrap_or_default(),
            market_cap_change_24h: self
                .market_cap_change_percentage_24h_usd
                .unwrap_or_default(),
            updated_at: self.updated_at,
        }
    }
}

/// Response of `/search`
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub coins: Vec<SearchCandidate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_row_conversion() {
        let json = r#"{
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "image": "https://assets.coingecko.com/coins/images/1/large/bitcoin.png",
            "current_price": 65000.5,
            "market_cap": 1280000000000,
            "market_cap_rank": 1,
            "price_change_percentage_24h": -1.25,
            "total_volume": 31000000000
        }"#;
        let row: CoinMarketRow = serde_json::from_str(json).unwrap();
        let asset = MarketAsset::from(row);
        assert_eq!(asset.id, "bitcoin");
        assert_eq!(asset.symbol, "BTC");
        assert_eq!(asset.price, 65000.5);
        assert_eq!(asset.change_24h, -1.25);
        assert_eq!(asset.market_cap, 1.28e12);
        assert_eq!(asset.volume_24h, 3.1e10);
    }

    #[test]
    fn test_market_row_null_figures_default_to_zero() {
        let json = r#"{
            "id": "newcoin",
            "symbol": "new",
            "name": "New Coin",
            "image": null,
            "current_price": null,
            "market_cap": null,
            "price_change_percentage_24h": null,
            "total_volume": null
        }"#;
        let row: CoinMarketRow = serde_json::from_str(json).unwrap();
        let asset = MarketAsset::from(row);
        assert_eq!(asset.price, 0.0);
        assert_eq!(asset.change_24h, 0.0);
        assert_eq!(asset.image, "");
    }

    #[test]
    fn test_global_projection() {
        let json = r#"{
            "data": {
                "active_cryptocurrencies": 14000,
                "total_market_cap": {"usd": 2.4e12, "eur": 2.2e12},
                "total_volume": {"usd": 9.1e10},
                "market_cap_change_percentage_24h_usd": 1.5,
                "updated_at": 1717000000
            }
        }"#;
        let response: GlobalResponse = serde_json::from_str(json).unwrap();
        let stats = response.data.into_stats("usd");
        assert_eq!(stats.total_market_cap, 2.4e12);
        assert_eq!(stats.total_volume, 9.1e10);
        assert_eq!(stats.market_cap_change_24h, 1.5);
        assert_eq!(stats.updated_at.map(|t| t.timestamp()), Some(1717000000));

        let response: GlobalResponse = serde_json::from_str(json).unwrap();
        let stats = response.data.into_stats("eur");
        assert_eq!(stats.total_market_cap, 2.2e12);
        assert_eq!(stats.total_volume, 0.0);
    }

    #[test]
    fn test_search_response_keeps_order() {
        let json = r#"{
            "coins": [
                {"id": "bitcoin", "name": "Bitcoin", "symbol": "BTC", "market_cap_rank": 1, "thumb": "x"},
                {"id": "bitcoin-cash", "name": "Bitcoin Cash", "symbol": "BCH", "market_cap_rank": null}
            ],
            "exchanges": [],
            "categories": []
        }"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let ids: Vec<_> = response.coins.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["bitcoin", "bitcoin-cash"]);
        assert_eq!(response.coins[0].market_cap_rank, Some(1));
        assert_eq!(response.coins[1].market_cap_rank, None);
    }
}
