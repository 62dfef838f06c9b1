/// Persistent key: dashboard market list (also written by the portfolio view)
pub const MARKET_DATA_KEY: &str = "nexora_market_data";

/// Persistent key: whole-market aggregates
pub const GLOBAL_DATA_KEY: &str = "nexora_global_data";

/// Persistent key: wall-clock time of the last successful global sync
pub const LAST_SYNC_KEY: &str = "nexora_last_sync";

/// Persistent key: last search results
pub const SEARCH_RESULTS_KEY: &str = "nexora_search_results";

/// Persistent key: last simple price lookup
pub const SIMPLE_PRICES_KEY: &str = "nexora_simple_prices";

/// Session key: opaque signed-in marker
pub const ACCESS_KEY_KEY: &str = "nexora_access_key";

/// Session key: set once the welcome notice has been dismissed
pub const WELCOME_SEEN_KEY: &str = "nexora_welcome_seen";

/// Seconds between scheduled refreshes of a mounted view
pub const REFRESH_INTERVAL_SECS: u64 = 60;

/// Minimum seconds between two successful page loads (initial load exempt)
pub const PAGE_THROTTLE_SECS: u64 = 5;

/// Remaining scroll distance (px) below which the next page is requested
pub const SCROLL_THRESHOLD_PX: f64 = 200.0;

/// Quiet period (ms) a search query must hold before it runs
pub const SEARCH_DEBOUNCE_MS: u64 = 300;

/// Rows requested per market list page
pub const PAGE_SIZE: u32 = 20;

/// Hard cap on rows the dashboard list will hold
pub const MARKET_LIST_CAP: usize = 50;

/// Maximum search candidates enriched with market data
pub const SEARCH_CANDIDATE_CAP: usize = 20;

/// Rows shown by search for an empty query, and fetched by the portfolio view
pub const TOP_LISTING_SIZE: u32 = 10;

/// Wall-clock format of the last-sync stamp
pub const LAST_SYNC_FORMAT: &str = "%H:%M:%S";
