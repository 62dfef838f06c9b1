//! Nexora Core - cache, session and view synchronisation.
//!
//! This crate holds everything between the market data client and a screen:
//! the injected key-value stores, the typed snapshot cache, session flags,
//! and one sync driver per view (dashboard, portfolio, search, withdrawal).
//! It talks to the network only through the
//! [`MarketDataProvider`](nexora_market_data::MarketDataProvider) trait.

pub mod config;
pub mod constants;
pub mod errors;
pub mod portfolio;
pub mod session;
pub mod storage;
pub mod sync;

pub use config::SyncConfig;
pub use session::Session;
pub use storage::{CacheStore, FileStore, KeyValueStore, MemoryStore};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
