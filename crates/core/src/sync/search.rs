//! Search view: debounced two-phase lookup.
//!
//! Every keystroke goes through [`SearchSync::search`]; the query runs once
//! the input has been quiet for the debounce period. A blank query shows the
//! top of the market list. Anything else resolves candidate ids through
//! `/search` and then fetches market rows for those ids.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, warn};
use nexora_market_data::{MarketAsset, MarketDataError, MarketDataProvider, MarketsQuery};

use super::debounce::Debouncer;
use super::lifetime::{MountToken, ViewLifetime};
use super::log_fetch_failure;
use super::status::{SyncOutcome, SyncStatus};
use crate::config::SyncConfig;
use crate::constants::SEARCH_RESULTS_KEY;
use crate::storage::CacheStore;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchState {
    /// Latest input, which may not have run yet.
    pub query: String,
    pub results: Vec<MarketAsset>,
    pub status: SyncStatus,
}

pub struct SearchSync {
    provider: Arc<dyn MarketDataProvider>,
    cache: CacheStore,
    config: SyncConfig,
    lifetime: ViewLifetime,
    view: RwLock<SearchState>,
    debouncer: Debouncer,
}

impl SearchSync {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        cache: CacheStore,
        config: SyncConfig,
    ) -> Arc<Self> {
        let view = Self::bootstrap(&cache);
        let debouncer = Debouncer::new(config.search_debounce);
        Arc::new(Self {
            provider,
            cache,
            config,
            lifetime: ViewLifetime::new(),
            view: RwLock::new(view),
            debouncer,
        })
    }

    fn bootstrap(cache: &CacheStore) -> SearchState {
        SearchState {
            results: cache.read(SEARCH_RESULTS_KEY).unwrap_or_default(),
            ..SearchState::default()
        }
    }

    fn read_view(&self) -> RwLockReadGuard<'_, SearchState> {
        self.view.read().unwrap_or_else(|poisoned| {
            warn!("Search state lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write_view(&self) -> RwLockWriteGuard<'_, SearchState> {
        self.view.write().unwrap_or_else(|poisoned| {
            warn!("Search state lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Mount with an empty query, which schedules the default listing.
    pub fn mount(self: &Arc<Self>) -> MountToken {
        self.debouncer.cancel();
        let token = self.lifetime.mount();
        *self.write_view() = Self::bootstrap(&self.cache);
        self.search(&token, "");
        token
    }

    /// Drop the pending query. A query that already started still finishes
    /// and may update the cache, but not the view.
    pub fn unmount(&self) {
        self.lifetime.unmount();
        self.debouncer.cancel();
    }

    pub fn snapshot(&self) -> SearchState {
        self.read_view().clone()
    }

    /// Input changed: remember it and (re)start the debounce window.
    pub fn search(self: &Arc<Self>, token: &MountToken, query: &str) {
        if !token.is_current() {
            return;
        }
        self.write_view().query = query.to_string();

        let this = self.clone();
        let token = token.clone();
        let query = query.to_string();
        self.debouncer.call(async move {
            this.run_search(&token, &query).await;
        });
    }

    /// Run `query` now, dropping whatever was waiting out the debounce.
    pub async fn submit(&self, token: &MountToken, query: &str) -> SyncOutcome {
        self.debouncer.cancel();
        if token.is_current() {
            self.write_view().query = query.to_string();
        }
        self.run_search(token, query).await
    }

    /// Execute `query` right away.
    pub async fn run_search(&self, token: &MountToken, query: &str) -> SyncOutcome {
        if token.is_current() {
            self.write_view().status.begin();
        }

        match self.lookup(query).await {
            Ok(Some(results)) => {
                self.cache.write_or_log(SEARCH_RESULTS_KEY, &results);
                self.apply(token, results)
            }
            Ok(None) => {
                debug!("No candidates for '{}'", query);
                self.apply(token, Vec::new())
            }
            Err(e) => {
                log_fetch_failure("Search", &e);
                if !token.is_current() {
                    return SyncOutcome::Discarded;
                }
                let kind = e.failure_kind();
                self.write_view().status.fail(kind);
                SyncOutcome::Stale(kind)
            }
        }
    }

    fn apply(&self, token: &MountToken, results: Vec<MarketAsset>) -> SyncOutcome {
        if !token.is_current() {
            return SyncOutcome::Discarded;
        }
        let mut view = self.write_view();
        view.results = results;
        view.status.succeed();
        SyncOutcome::Applied
    }

    /// `None` when `/search` matched nothing; the view then shows an empty
    /// list without touching the cache.
    async fn lookup(&self, query: &str) -> Result<Option<Vec<MarketAsset>>, MarketDataError> {
        let query = query.trim();
        if query.is_empty() {
            let listing = MarketsQuery::page(self.config.top_listing_size, 1)
                .with_currency(self.config.vs_currency.clone());
            return self.provider.markets(&listing).await.map(Some);
        }

        let candidates = self.provider.search(query).await?;
        let ids: Vec<String> = candidates
            .into_iter()
            .take(self.config.search_candidate_cap)
            .map(|candidate| candidate.id)
            .collect();
        if ids.is_empty() {
            return Ok(None);
        }

        let enrich = MarketsQuery::ids(ids).with_currency(self.config.vs_currency.clone());
        self.provider.markets(&enrich).await.map(Some)
    }
}
