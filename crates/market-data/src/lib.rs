//! Nexora Market Data Crate
//!
//! This crate is the fetch client of the Nexora market sync core: typed
//! access to the public CoinGecko v3 API with a two-class failure taxonomy.
//!
//! # Overview
//!
//! - Whole-market aggregates (`/global`)
//! - Market-cap ordered asset list, paged or by id set (`/coins/markets`)
//! - Free-text search resolving to asset ids (`/search`)
//! - Simple price lookup by id list (`/simple/price`)
//!
//! Each call is a single attempt. HTTP 429 surfaces as a rate-limit failure;
//! every other failure (transport, timeout, non-2xx, bad payload) is a
//! network failure. Callers treat both as soft and keep their cached data.
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +---------------------+
//! |   Sync layer     | --> | MarketDataProvider  |  (trait, mockable)
//! +------------------+     +---------------------+
//!                                    |
//!                                    v
//!                          +---------------------+
//!                          | CoinGeckoProvider   |  (reqwest)
//!                          +---------------------+
//!                                    |
//!                                    v
//!                   MarketAsset / GlobalStats / SearchCandidate / SimplePrices
//! ```
//!
//! # Core Types
//!
//! - [`MarketAsset`] - One row of a market snapshot
//! - [`GlobalStats`] - Whole-market aggregates
//! - [`SearchCandidate`] - Free-text search hit
//! - [`SimplePrices`] - `id -> currency -> price` lookup result
//! - [`MarketsQuery`] - Market list request parameters
//! - [`FailureKind`] - Rate-limited vs. network failure

pub mod errors;
pub mod models;
pub mod provider;

// Re-export all public types from models
pub use models::{
    CoinId, GlobalStats, MarketAsset, MarketsQuery, SearchCandidate, SimplePrices,
    VsCurrency, DEFAULT_VS_CURRENCY,
};

// Re-export error types
pub use errors::{FailureKind, MarketDataError};

// Re-export provider types
pub use provider::coingecko::{CoinGeckoProvider, DEFAULT_BASE_URL};
pub use provider::MarketDataProvider;
