//! Tunables of the sync layer.

use std::time::Duration;

use nexora_market_data::DEFAULT_VS_CURRENCY;

use crate::constants::*;
use crate::errors::{Error, Result};

/// Timing and sizing knobs shared by every synced view.
///
/// Defaults match the observed behaviour of the web client and are what the
/// tests assert against. Fixed intervals only: there is no jitter and no
/// backoff anywhere.
#[derive(Clone, Debug, PartialEq)]
pub struct SyncConfig {
    /// Period of the scheduled refresh of a mounted view.
    pub refresh_interval: Duration,
    /// Minimum gap between two successful page loads.
    pub page_throttle: Duration,
    /// Remaining scroll distance that triggers the next page.
    pub scroll_threshold_px: f64,
    /// Quiet period before a search query runs.
    pub search_debounce: Duration,
    /// Rows per market list page.
    pub page_size: u32,
    /// Hard cap on dashboard rows.
    pub list_cap: usize,
    /// Maximum search candidates enriched with market data.
    pub search_candidate_cap: usize,
    /// Rows of the top listing (empty search, portfolio refresh).
    pub top_listing_size: u32,
    /// Quote currency for every request.
    pub vs_currency: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(REFRESH_INTERVAL_SECS),
            page_throttle: Duration::from_secs(PAGE_THROTTLE_SECS),
            scroll_threshold_px: SCROLL_THRESHOLD_PX,
            search_debounce: Duration::from_millis(SEARCH_DEBOUNCE_MS),
            page_size: PAGE_SIZE,
            list_cap: MARKET_LIST_CAP,
            search_candidate_cap: SEARCH_CANDIDATE_CAP,
            top_listing_size: TOP_LISTING_SIZE,
            vs_currency: DEFAULT_VS_CURRENCY.to_string(),
        }
    }
}

impl SyncConfig {
    /// Reject values the timers and loaders cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval.is_zero() {
            return Err(Error::InvalidConfigValue(
                "refresh_interval must be greater than zero".to_string(),
            ));
        }
        if self.page_size == 0 {
            return Err(Error::InvalidConfigValue(
                "page_size must be greater than zero".to_string(),
            ));
        }
        if self.list_cap == 0 {
            return Err(Error::InvalidConfigValue(
                "list_cap must be greater than zero".to_string(),
            ));
        }
        if self.top_listing_size == 0 {
            return Err(Error::InvalidConfigValue(
                "top_listing_size must be greater than zero".to_string(),
            ));
        }
        if self.vs_currency.trim().is_empty() {
            return Err(Error::InvalidConfigValue(
                "vs_currency must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
