//! Market data provider abstraction and the CoinGecko implementation.
//!
//! This module contains:
//! - The `MarketDataProvider` trait the sync layer depends on
//! - The `CoinGeckoProvider` HTTP client for the public CoinGecko v3 API

mod traits;

pub mod coingecko;

// Re-exports
pub use traits::MarketDataProvider;
