//! Market data models
//!
//! This module contains the data types exchanged with the market data API:
//! - `types` - Type aliases for common identifiers (VsCurrency, CoinId)
//! - `asset` - One row of a market snapshot (MarketAsset)
//! - `global` - Whole-market aggregates (GlobalStats)
//! - `search` - Free-text search candidates (SearchCandidate)
//! - `price` - Simple price lookup result (SimplePrices)
//! - `query` - Market list request parameters (MarketsQuery)

mod asset;
mod global;
mod price;
mod query;
mod search;
mod types;

pub use asset::MarketAsset;
pub use global::GlobalStats;
pub use price::SimplePrices;
pub use query::MarketsQuery;
pub use search::SearchCandidate;
pub use types::{CoinId, VsCurrency, DEFAULT_VS_CURRENCY};
