//! Dashboard view: global aggregates on a fixed schedule and the
//! scroll-loaded market list.
//!
//! On mount the view bootstraps from the cache, refreshes the global stats
//! immediately and every refresh period, and loads the first market page.
//! Further pages are loaded by [`DashboardSync::on_scroll`]; the list itself
//! is not refreshed by the schedule.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Local;
use log::{debug, warn};
use nexora_market_data::{GlobalStats, MarketAsset, MarketDataProvider, MarketsQuery};
use tokio::time::Instant;

use super::lifetime::{MountToken, ViewLifetime};
use super::pagination::{LoadOutcome, PaginationCursor, Paginator, ScrollMetrics};
use super::scheduler::{spawn_refresh_loop, ViewTasks};
use super::status::{SyncOutcome, SyncStatus};
use super::log_fetch_failure;
use crate::config::SyncConfig;
use crate::constants::{GLOBAL_DATA_KEY, LAST_SYNC_FORMAT, LAST_SYNC_KEY, MARKET_DATA_KEY};
use crate::storage::CacheStore;

/// What the dashboard currently shows.
#[derive(Clone, Debug)]
pub struct DashboardState {
    pub assets: Vec<MarketAsset>,
    pub global: Option<GlobalStats>,
    /// Wall-clock time of the last successful global sync, `None` = never.
    pub last_synced: Option<String>,
    pub status: SyncStatus,
    pub cursor: PaginationCursor,
}

struct DashboardView {
    assets: Vec<MarketAsset>,
    global: Option<GlobalStats>,
    last_synced: Option<String>,
    status: SyncStatus,
    paginator: Paginator,
}

/// Sync driver behind the dashboard screen.
pub struct DashboardSync {
    provider: Arc<dyn MarketDataProvider>,
    cache: CacheStore,
    config: SyncConfig,
    lifetime: ViewLifetime,
    view: RwLock<DashboardView>,
    tasks: ViewTasks,
}

impl DashboardSync {
    /// Create the view, bootstrapped from whatever the cache holds.
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        cache: CacheStore,
        config: SyncConfig,
    ) -> Arc<Self> {
        let view = Self::bootstrap(&cache, &config);
        Arc::new(Self {
            provider,
            cache,
            config,
            lifetime: ViewLifetime::new(),
            view: RwLock::new(view),
            tasks: ViewTasks::new(),
        })
    }

    fn bootstrap(cache: &CacheStore, config: &SyncConfig) -> DashboardView {
        let assets: Vec<MarketAsset> = cache.read(MARKET_DATA_KEY).unwrap_or_default();
        let global: Option<GlobalStats> = cache.read(GLOBAL_DATA_KEY);
        let last_synced = cache.read_raw(LAST_SYNC_KEY);

        debug!(
            "Dashboard bootstrapped with {} cached rows, global stats {}",
            assets.len(),
            if global.is_some() { "present" } else { "absent" }
        );

        DashboardView {
            assets,
            global,
            last_synced,
            status: SyncStatus::default(),
            paginator: Paginator::new(config.page_size, config.list_cap, config.page_throttle),
        }
    }

    fn read_view(&self) -> RwLockReadGuard<'_, DashboardView> {
        self.view.read().unwrap_or_else(|poisoned| {
            warn!("Dashboard state lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write_view(&self) -> RwLockWriteGuard<'_, DashboardView> {
        self.view.write().unwrap_or_else(|poisoned| {
            warn!("Dashboard state lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Mount the view: fresh state from the cache, the first page, and the
    /// global stats schedule. Remounting behaves like a brand-new screen.
    pub fn mount(self: &Arc<Self>) -> MountToken {
        self.tasks.abort_all();
        let token = self.lifetime.mount();
        *self.write_view() = Self::bootstrap(&self.cache, &self.config);

        let this = self.clone();
        let initial_token = token.clone();
        tokio::spawn(async move {
            this.load_more(&initial_token, true).await;
        });

        let this = self.clone();
        let loop_token = token.clone();
        self.tasks.push(spawn_refresh_loop(
            "dashboard-global",
            self.config.refresh_interval,
            token.clone(),
            move || {
                let this = this.clone();
                let token = loop_token.clone();
                async move {
                    this.refresh_global(&token).await;
                }
            },
        ));

        token
    }

    /// Stop the schedule. Fetches already in flight finish but are discarded.
    pub fn unmount(&self) {
        self.lifetime.unmount();
        self.tasks.abort_all();
    }

    pub fn snapshot(&self) -> DashboardState {
        let view = self.read_view();
        DashboardState {
            assets: view.assets.clone(),
            global: view.global.clone(),
            last_synced: view.last_synced.clone(),
            status: view.status.clone(),
            cursor: view.paginator.cursor().clone(),
        }
    }

    /// Fetch the global aggregates once.
    ///
    /// A successful payload is cached even if the view has gone away in the
    /// meantime; only the on-screen state is gated by `token`.
    pub async fn refresh_global(&self, token: &MountToken) -> SyncOutcome {
        if token.is_current() {
            self.write_view().status.begin();
        }

        match self.provider.global_stats(&self.config.vs_currency).await {
            Ok(stats) => {
                let stamp = Local::now().format(LAST_SYNC_FORMAT).to_string();
                self.cache.write_or_log(GLOBAL_DATA_KEY, &stats);
                if let Err(e) = self.cache.write_raw(LAST_SYNC_KEY, &stamp) {
                    warn!("Failed to persist last sync time: {}", e);
                }

                if !token.is_current() {
                    return SyncOutcome::Discarded;
                }
                let mut view = self.write_view();
                view.global = Some(stats);
                view.last_synced = Some(stamp);
                view.status.succeed();
                SyncOutcome::Applied
            }
            Err(e) => {
                log_fetch_failure("Global stats", &e);
                if !token.is_current() {
                    return SyncOutcome::Discarded;
                }
                let kind = e.failure_kind();
                self.write_view().status.fail(kind);
                SyncOutcome::Stale(kind)
            }
        }
    }

    /// Load the next market page, or the first one when `initial`.
    pub async fn load_more(&self, token: &MountToken, initial: bool) -> LoadOutcome {
        if !token.is_current() {
            return LoadOutcome::Discarded;
        }

        let request = {
            let mut view = self.write_view();
            match view.paginator.begin(initial, Instant::now()) {
                Ok(request) => {
                    view.status.begin();
                    request
                }
                Err(refusal) => {
                    debug!("Market page load refused: {:?}", refusal);
                    return LoadOutcome::Refused(refusal);
                }
            }
        };

        let query = MarketsQuery::page(request.per_page, request.page)
            .with_currency(self.config.vs_currency.clone());
        let result = self.provider.markets(&query).await;

        if !token.is_current() {
            return LoadOutcome::Discarded;
        }

        let mut guard = self.write_view();
        let view = &mut *guard;
        match result {
            Ok(rows) => {
                let outcome = view
                    .paginator
                    .complete(request, &mut view.assets, rows, Instant::now());
                if let LoadOutcome::Loaded { .. } = outcome {
                    self.cache.write_or_log(MARKET_DATA_KEY, &view.assets);
                }
                view.status.succeed();
                outcome
            }
            Err(e) => {
                log_fetch_failure("Market page", &e);
                view.paginator.abort();
                let kind = e.failure_kind();
                view.status.fail(kind);
                LoadOutcome::Stale(kind)
            }
        }
    }

    /// Scroll callback: loads the next page once the end is near.
    ///
    /// Returns `None` when the position is not close enough to the end.
    pub async fn on_scroll(&self, token: &MountToken, metrics: ScrollMetrics) -> Option<LoadOutcome> {
        if !metrics.near_end(self.config.scroll_threshold_px) {
            return None;
        }
        Some(self.load_more(token, false).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::pagination::LoadRefusal;
    use crate::sync::testing::*;
    use crate::sync::SyncPhase;
    use nexora_market_data::FailureKind;
    use std::time::Duration;

    fn dashboard(provider: &Arc<MockProvider>, cache: &CacheStore) -> Arc<DashboardSync> {
        DashboardSync::new(provider.clone(), cache.clone(), SyncConfig::default())
    }

    fn near_end() -> ScrollMetrics {
        ScrollMetrics::new(900.0, 1200.0, 200.0)
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_load_with_empty_cache() {
        let provider = MockProvider::new();
        let (_, cache) = memory_cache();
        provider.push_markets(Ok(rows(0, 20)));

        let dashboard = dashboard(&provider, &cache);
        assert!(dashboard.snapshot().assets.is_empty());

        let token = dashboard.lifetime.mount();
        let outcome = dashboard.load_more(&token, true).await;

        assert_eq!(
            outcome,
            LoadOutcome::Loaded {
                appended: 20,
                exhausted: false
            }
        );
        let state = dashboard.snapshot();
        assert_eq!(state.assets.len(), 20);
        assert!(!state.cursor.exhausted);
        assert_eq!(
            cache.read::<Vec<MarketAsset>>(MARKET_DATA_KEY),
            Some(rows(0, 20))
        );
        assert_eq!(
            provider.calls(),
            vec![Call::Markets(MarketsQuery::page(20, 1))]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_second_page_exhausts_list() {
        let provider = MockProvider::new();
        let (_, cache) = memory_cache();
        provider.push_markets(Ok(rows(0, 20)));
        provider.push_markets(Ok(Vec::new()));

        let dashboard = dashboard(&provider, &cache);
        let token = dashboard.lifetime.mount();
        dashboard.load_more(&token, true).await;

        tokio::time::sleep(Duration::from_secs(6)).await;
        let outcome = dashboard.on_scroll(&token, near_end()).await;
        assert_eq!(outcome, Some(LoadOutcome::Exhausted));

        let state = dashboard.snapshot();
        assert!(state.cursor.exhausted);
        assert_eq!(state.assets, rows(0, 20));

        for _ in 0..5 {
            tokio::time::sleep(Duration::from_secs(10)).await;
            let outcome = dashboard.on_scroll(&token, near_end()).await;
            assert_eq!(outcome, Some(LoadOutcome::Refused(LoadRefusal::Exhausted)));
        }
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scroll_within_throttle_window_is_refused() {
        let provider = MockProvider::new();
        let (_, cache) = memory_cache();
        provider.push_markets(Ok(rows(0, 20)));
        provider.push_markets(Ok(rows(20, 20)));

        let dashboard = dashboard(&provider, &cache);
        let token = dashboard.lifetime.mount();
        dashboard.load_more(&token, true).await;

        tokio::time::sleep(Duration::from_secs(3)).await;
        let outcome = dashboard.on_scroll(&token, near_end()).await;
        assert!(matches!(
            outcome,
            Some(LoadOutcome::Refused(LoadRefusal::Throttled { .. }))
        ));
        assert_eq!(provider.call_count(), 1);

        tokio::time::sleep(Duration::from_secs(2)).await;
        let outcome = dashboard.on_scroll(&token, near_end()).await;
        assert_eq!(
            outcome,
            Some(LoadOutcome::Loaded {
                appended: 20,
                exhausted: false
            })
        );

        let calls = provider.timed_calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[1].1 - calls[0].1 >= Duration::from_secs(5));
        assert_eq!(calls[1].0, Call::Markets(MarketsQuery::page(20, 2)));
        assert_eq!(
            cache.read::<Vec<MarketAsset>>(MARKET_DATA_KEY).map(|l| l.len()),
            Some(40)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_scroll_far_from_end_does_nothing() {
        let provider = MockProvider::new();
        let (_, cache) = memory_cache();
        let dashboard = dashboard(&provider, &cache);
        let token = dashboard.lifetime.mount();

        let outcome = dashboard
            .on_scroll(&token, ScrollMetrics::new(0.0, 2000.0, 400.0))
            .await;
        assert_eq!(outcome, None);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_page_keeps_list_and_cache() {
        let provider = MockProvider::new();
        let (_, cache) = memory_cache();
        provider.push_markets(Ok(rows(0, 20)));
        provider.push_markets(Err(rate_limited()));
        provider.push_markets(Err(unavailable()));

        let dashboard = dashboard(&provider, &cache);
        let token = dashboard.lifetime.mount();
        dashboard.load_more(&token, true).await;
        let cursor_before = dashboard.snapshot().cursor;

        tokio::time::sleep(Duration::from_secs(6)).await;
        let outcome = dashboard.load_more(&token, false).await;
        assert_eq!(outcome, LoadOutcome::Stale(FailureKind::RateLimited));

        let outcome = dashboard.load_more(&token, false).await;
        assert_eq!(outcome, LoadOutcome::Stale(FailureKind::NetworkError));

        let state = dashboard.snapshot();
        assert_eq!(state.assets, rows(0, 20));
        assert_eq!(state.cursor, cursor_before);
        assert!(state.status.is_stale());
        assert_eq!(
            cache.read::<Vec<MarketAsset>>(MARKET_DATA_KEY),
            Some(rows(0, 20))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_bootstrap_from_cache() {
        let provider = MockProvider::new();
        let (_, cache) = memory_cache();
        cache.write(MARKET_DATA_KEY, &rows(0, 5)).unwrap();
        cache.write(GLOBAL_DATA_KEY, &global(2.0e12)).unwrap();
        cache.write_raw(LAST_SYNC_KEY, "09:15:00").unwrap();

        let dashboard = dashboard(&provider, &cache);
        let state = dashboard.snapshot();

        assert_eq!(state.assets, rows(0, 5));
        assert_eq!(state.global, Some(global(2.0e12)));
        assert_eq!(state.last_synced.as_deref(), Some("09:15:00"));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_global_keeps_cached_stats() {
        let provider = MockProvider::new();
        let (_, cache) = memory_cache();
        cache.write(GLOBAL_DATA_KEY, &global(2.0e12)).unwrap();
        provider.push_global(Err(rate_limited()));

        let dashboard = dashboard(&provider, &cache);
        let token = dashboard.lifetime.mount();
        let outcome = dashboard.refresh_global(&token).await;

        assert_eq!(outcome, SyncOutcome::Stale(FailureKind::RateLimited));
        let state = dashboard.snapshot();
        assert_eq!(state.global, Some(global(2.0e12)));
        assert_eq!(state.status.phase, SyncPhase::Stale);
        assert_eq!(cache.read::<GlobalStats>(GLOBAL_DATA_KEY), Some(global(2.0e12)));
        assert_eq!(cache.read_raw(LAST_SYNC_KEY), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_global_success_updates_view_cache_and_stamp() {
        let provider = MockProvider::new();
        let (_, cache) = memory_cache();
        provider.push_global(Ok(global(2.5e12)));

        let dashboard = dashboard(&provider, &cache);
        let token = dashboard.lifetime.mount();
        let outcome = dashboard.refresh_global(&token).await;

        assert_eq!(outcome, SyncOutcome::Applied);
        let state = dashboard.snapshot();
        assert_eq!(state.global, Some(global(2.5e12)));
        assert_eq!(state.status.phase, SyncPhase::Idle);
        let stamp = state.last_synced.unwrap();
        assert_eq!(stamp.len(), 8);
        assert_eq!(cache.read_raw(LAST_SYNC_KEY), Some(stamp));
        assert_eq!(cache.read::<GlobalStats>(GLOBAL_DATA_KEY), Some(global(2.5e12)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_global_resolving_after_unmount_is_discarded() {
        let provider = MockProvider::new();
        let (_, cache) = memory_cache();
        provider.set_latency(Duration::from_secs(2));
        provider.push_global(Ok(global(3.0e12)));

        let dashboard = dashboard(&provider, &cache);
        let token = dashboard.lifetime.mount();

        let pending = {
            let dashboard = dashboard.clone();
            let token = token.clone();
            tokio::spawn(async move { dashboard.refresh_global(&token).await })
        };
        tokio::time::sleep(Duration::from_secs(1)).await;
        dashboard.unmount();

        assert_eq!(pending.await.unwrap(), SyncOutcome::Discarded);
        assert_eq!(dashboard.snapshot().global, None);
        // The payload itself is still the freshest snapshot on disk.
        assert_eq!(cache.read::<GlobalStats>(GLOBAL_DATA_KEY), Some(global(3.0e12)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_page_resolving_after_unmount_is_discarded() {
        let provider = MockProvider::new();
        let (_, cache) = memory_cache();
        provider.set_latency(Duration::from_secs(2));
        provider.push_markets(Ok(rows(0, 20)));

        let dashboard = dashboard(&provider, &cache);
        let token = dashboard.lifetime.mount();
        let pending = {
            let dashboard = dashboard.clone();
            let token = token.clone();
            tokio::spawn(async move { dashboard.load_more(&token, true).await })
        };
        tokio::time::sleep(Duration::from_secs(1)).await;
        dashboard.unmount();

        assert_eq!(pending.await.unwrap(), LoadOutcome::Discarded);
        assert!(dashboard.snapshot().assets.is_empty());
        assert_eq!(cache.read::<Vec<MarketAsset>>(MARKET_DATA_KEY), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_schedules_global_refresh() {
        let provider = MockProvider::new();
        let (_, cache) = memory_cache();
        provider.push_markets(Ok(rows(0, 20)));
        provider.push_global(Ok(global(1.0e12)));
        provider.push_global(Err(rate_limited()));
        provider.push_global(Ok(global(1.2e12)));

        let dashboard = dashboard(&provider, &cache);
        dashboard.mount();

        tokio::time::sleep(Duration::from_millis(1)).await;
        let state = dashboard.snapshot();
        assert_eq!(state.assets.len(), 20);
        assert_eq!(state.global, Some(global(1.0e12)));

        tokio::time::sleep(Duration::from_secs(60)).await;
        let state = dashboard.snapshot();
        assert!(state.status.is_stale());
        assert_eq!(state.global, Some(global(1.0e12)));

        tokio::time::sleep(Duration::from_secs(60)).await;
        let state = dashboard.snapshot();
        assert!(!state.status.is_stale());
        assert_eq!(state.global, Some(global(1.2e12)));

        let global_calls = provider
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Global(_)))
            .count();
        assert_eq!(global_calls, 3);

        dashboard.unmount();
        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(provider.call_count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_global_uses_configured_currency() {
        let provider = MockProvider::new();
        let (_, cache) = memory_cache();
        provider.push_global(Ok(global(2.0e12)));
        let config = SyncConfig {
            vs_currency: "eur".to_string(),
            ..SyncConfig::default()
        };

        let dashboard = DashboardSync::new(provider.clone(), cache.clone(), config);
        let token = dashboard.lifetime.mount();
        assert_eq!(dashboard.refresh_global(&token).await, SyncOutcome::Applied);

        assert_eq!(provider.calls(), vec![Call::Global("eur".to_string())]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_global_fetches_last_resolution_wins() {
        let provider = MockProvider::new();
        let (_, cache) = memory_cache();
        provider.set_latency(Duration::from_secs(90));
        provider.push_global(Ok(global(1.0e12)));
        provider.push_global(Ok(global(2.0e12)));

        let dashboard = dashboard(&provider, &cache);
        dashboard.mount();

        // Tick at 0 s and 60 s both fetch; neither has resolved at 61 s.
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(
            provider
                .calls()
                .iter()
                .filter(|c| matches!(c, Call::Global(_)))
                .count(),
            2
        );
        assert_eq!(dashboard.snapshot().global, None);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(dashboard.snapshot().global, Some(global(1.0e12)));

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(dashboard.snapshot().global, Some(global(2.0e12)));

        dashboard.unmount();
    }
}
