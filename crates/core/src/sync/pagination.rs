//! Scroll-driven incremental loading of the market list.
//!
//! [`Paginator`] owns the [`PaginationCursor`] and decides whether a load may
//! start; the dashboard view performs the fetch and hands the rows back.
//! Guards, in order: a load already in flight, an exhausted list (initial
//! load exempt), and the minimum gap since the last successful page (initial
//! load exempt).

use std::time::Duration;

use log::debug;
use nexora_market_data::{FailureKind, MarketAsset};
use tokio::time::Instant;

/// Cursor of the dashboard's scroll loader. Never reset within a mount.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaginationCursor {
    /// Page the next non-initial load requests (1-based).
    pub next_page: u32,
    /// Set once the end of the list has been reached. Permanent.
    pub exhausted: bool,
    /// When the last successful page arrived.
    pub last_fetch_at: Option<Instant>,
    /// A page request is outstanding.
    pub in_flight: bool,
}

impl Default for PaginationCursor {
    fn default() -> Self {
        Self {
            next_page: 1,
            exhausted: false,
            last_fetch_at: None,
            in_flight: false,
        }
    }
}

/// Why a load did not start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadRefusal {
    InFlight,
    Exhausted,
    Throttled { remaining: Duration },
}

/// A page load that passed the guards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
    pub initial: bool,
}

/// Result of one `load_more` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Rows were added (or, for the initial load, replaced the list).
    Loaded { appended: usize, exhausted: bool },
    /// The page came back empty; the list is now exhausted.
    Exhausted,
    /// A guard refused the load; nothing was requested.
    Refused(LoadRefusal),
    /// The request failed; list, cursor and cache are untouched.
    Stale(FailureKind),
    /// The view went away before the page arrived.
    Discarded,
}

/// Scroll position of the list container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_top,
            scroll_height,
            client_height,
        }
    }

    /// Whether less than `threshold_px` of content remains below the viewport.
    pub fn near_end(&self, threshold_px: f64) -> bool {
        self.scroll_top + self.client_height >= self.scroll_height - threshold_px
    }
}

/// Guard logic and bookkeeping of the scroll loader.
#[derive(Clone, Debug)]
pub struct Paginator {
    cursor: PaginationCursor,
    page_size: u32,
    list_cap: usize,
    throttle: Duration,
}

impl Paginator {
    pub fn new(page_size: u32, list_cap: usize, throttle: Duration) -> Self {
        Self {
            cursor: PaginationCursor::default(),
            page_size,
            list_cap,
            throttle,
        }
    }

    pub fn cursor(&self) -> &PaginationCursor {
        &self.cursor
    }

    /// Check the guards and, if they pass, mark a request as in flight.
    pub fn begin(&mut self, initial: bool, now: Instant) -> Result<PageRequest, LoadRefusal> {
        if self.cursor.in_flight {
            return Err(LoadRefusal::InFlight);
        }
        if self.cursor.exhausted && !initial {
            return Err(LoadRefusal::Exhausted);
        }
        if !initial {
            if let Some(last) = self.cursor.last_fetch_at {
                let elapsed = now.saturating_duration_since(last);
                if elapsed < self.throttle {
                    return Err(LoadRefusal::Throttled {
                        remaining: self.throttle - elapsed,
                    });
                }
            }
        }

        self.cursor.in_flight = true;
        Ok(PageRequest {
            page: if initial { 1 } else { self.cursor.next_page },
            per_page: self.page_size,
            initial,
        })
    }

    /// Fold a successful page into `list`.
    pub fn complete(
        &mut self,
        request: PageRequest,
        list: &mut Vec<MarketAsset>,
        rows: Vec<MarketAsset>,
        now: Instant,
    ) -> LoadOutcome {
        self.cursor.in_flight = false;

        if rows.is_empty() {
            debug!("Page {} came back empty, list exhausted", request.page);
            self.cursor.exhausted = true;
            return LoadOutcome::Exhausted;
        }

        let received = rows.len();
        let before = if request.initial { 0 } else { list.len() };
        if request.initial {
            *list = rows;
        } else {
            list.extend(rows);
        }
        list.truncate(self.list_cap);

        self.cursor.next_page = request.page + 1;
        self.cursor.last_fetch_at = Some(now);
        if received < request.per_page as usize || list.len() >= self.list_cap {
            self.cursor.exhausted = true;
        }

        LoadOutcome::Loaded {
            appended: list.len().saturating_sub(before),
            exhausted: self.cursor.exhausted,
        }
    }

    /// Release the in-flight guard after a failed request.
    pub fn abort(&mut self) {
        self.cursor.in_flight = false;
    }
}
