//! Market data provider trait definitions.
//!
//! This module defines the core `MarketDataProvider` trait that the
//! CoinGecko client implements and that tests replace with scripted fakes.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{GlobalStats, MarketAsset, MarketsQuery, SearchCandidate, SimplePrices};

/// Read-only access to a market data API.
///
/// Every method performs exactly one request. There is no retry, backoff or
/// caching at this layer: a call either yields a payload or a
/// [`MarketDataError`] whose [`failure_kind`](MarketDataError::failure_kind)
/// tells the caller whether it was rate limited.
///
/// # Example
///
/// ```ignore
/// use nexora_market_data::{CoinGeckoProvider, MarketDataProvider, MarketsQuery};
///
/// let provider = CoinGeckoProvider::new();
/// let first_page = provider.markets(&MarketsQuery::page(20, 1)).await?;
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider, used in errors and logs.
    fn id(&self) -> &'static str;

    /// Fetch whole-market aggregates in `vs_currency`.
    ///
    /// The API reports the 24h market cap change for USD only.
    async fn global_stats(&self, vs_currency: &str) -> Result<GlobalStats, MarketDataError>;

    /// Fetch market rows ordered by descending market capitalization.
    ///
    /// Returns rows in the order the API produced them. An empty vector is a
    /// legitimate answer (past the last page, or no ids matched).
    async fn markets(&self, query: &MarketsQuery) -> Result<Vec<MarketAsset>, MarketDataError>;

    /// Resolve a free-text query into candidate asset ids.
    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>, MarketDataError>;

    /// Look up current prices for a set of ids in one currency.
    async fn simple_price(
        &self,
        ids: &[String],
        vs_currency: &str,
    ) -> Result<SimplePrices, MarketDataError>;
}
