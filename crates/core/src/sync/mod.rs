//! Per-view synchronisation of market data with the cache.
//!
//! Every view follows the same pattern: bootstrap from the last cached
//! snapshot, fetch, write successful payloads back, and keep showing the
//! previous values (flagged stale) when a fetch is rate-limited or fails.
//! Fetches are never retried early and never cancelled; a [`MountToken`]
//! decides whether a resolved fetch may still touch view state.

mod dashboard;
mod debounce;
mod holdings;
mod lifetime;
mod pagination;
mod prices;
mod scheduler;
mod search;
mod status;

#[cfg(test)]
mod testing;

pub use dashboard::{DashboardState, DashboardSync};
pub use debounce::Debouncer;
pub use holdings::{HoldingsState, HoldingsSync};
pub use lifetime::{MountToken, ViewLifetime};
pub use pagination::{
    LoadOutcome, LoadRefusal, PageRequest, PaginationCursor, Paginator, ScrollMetrics,
};
pub use prices::{PriceSource, PricesState, WithdrawalPrices};
pub use scheduler::{spawn_refresh_loop, ViewTasks};
pub use search::{SearchState, SearchSync};
pub use status::{SyncOutcome, SyncPhase, SyncStatus};

use log::{error, warn};
use nexora_market_data::{FailureKind, MarketDataError};

/// Rate limits are expected and logged as warnings; anything else is an
/// error.
pub(crate) fn log_fetch_failure(what: &str, err: &MarketDataError) {
    match err.failure_kind() {
        FailureKind::RateLimited => warn!("{} fetch rate limited, keeping cached data: {}", what, err),
        FailureKind::NetworkError => error!("{} fetch failed, keeping cached data: {}", what, err),
    }
}
