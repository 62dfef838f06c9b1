//! Portfolio view: the top of the market list, refreshed on a schedule and
//! folded into synthetic holdings.
//!
//! The fetched list is written to the same key the dashboard uses, so
//! whichever view resolved last owns the shared snapshot.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::warn;
use nexora_market_data::{MarketAsset, MarketDataProvider, MarketsQuery};

use super::lifetime::{MountToken, ViewLifetime};
use super::log_fetch_failure;
use super::scheduler::{spawn_refresh_loop, ViewTasks};
use super::status::{SyncOutcome, SyncStatus};
use crate::config::SyncConfig;
use crate::constants::MARKET_DATA_KEY;
use crate::portfolio::{derive_holdings, Holding, TargetValues};
use crate::storage::CacheStore;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HoldingsState {
    pub holdings: Vec<Holding>,
    pub status: SyncStatus,
}

pub struct HoldingsSync {
    provider: Arc<dyn MarketDataProvider>,
    cache: CacheStore,
    config: SyncConfig,
    targets: TargetValues,
    lifetime: ViewLifetime,
    view: RwLock<HoldingsState>,
    tasks: ViewTasks,
}

impl HoldingsSync {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        cache: CacheStore,
        config: SyncConfig,
    ) -> Arc<Self> {
        Self::with_targets(provider, cache, config, TargetValues::portfolio_defaults())
    }

    pub fn with_targets(
        provider: Arc<dyn MarketDataProvider>,
        cache: CacheStore,
        config: SyncConfig,
        targets: TargetValues,
    ) -> Arc<Self> {
        let view = Self::bootstrap(&cache, &targets);
        Arc::new(Self {
            provider,
            cache,
            config,
            targets,
            lifetime: ViewLifetime::new(),
            view: RwLock::new(view),
            tasks: ViewTasks::new(),
        })
    }

    fn bootstrap(cache: &CacheStore, targets: &TargetValues) -> HoldingsState {
        let assets: Vec<MarketAsset> = cache.read(MARKET_DATA_KEY).unwrap_or_default();
        HoldingsState {
            holdings: derive_holdings(&assets, targets),
            status: SyncStatus::default(),
        }
    }

    fn read_view(&self) -> RwLockReadGuard<'_, HoldingsState> {
        self.view.read().unwrap_or_else(|poisoned| {
            warn!("Holdings state lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write_view(&self) -> RwLockWriteGuard<'_, HoldingsState> {
        self.view.write().unwrap_or_else(|poisoned| {
            warn!("Holdings state lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Mount and start refreshing immediately and then every period.
    pub fn mount(self: &Arc<Self>) -> MountToken {
        self.tasks.abort_all();
        let token = self.lifetime.mount();
        *self.write_view() = Self::bootstrap(&self.cache, &self.targets);

        let this = self.clone();
        let loop_token = token.clone();
        self.tasks.push(spawn_refresh_loop(
            "portfolio-holdings",
            self.config.refresh_interval,
            token.clone(),
            move || {
                let this = this.clone();
                let token = loop_token.clone();
                async move {
                    this.refresh(&token).await;
                }
            },
        ));
        token
    }

    pub fn unmount(&self) {
        self.lifetime.unmount();
        self.tasks.abort_all();
    }

    pub fn snapshot(&self) -> HoldingsState {
        self.read_view().clone()
    }

    pub async fn refresh(&self, token: &MountToken) -> SyncOutcome {
        if token.is_current() {
            self.write_view().status.begin();
        }

        let query = MarketsQuery::page(self.config.top_listing_size, 1)
            .with_currency(self.config.vs_currency.clone());
        match self.provider.markets(&query).await {
            Ok(assets) => {
                self.cache.write_or_log(MARKET_DATA_KEY, &assets);
                if !token.is_current() {
                    return SyncOutcome::Discarded;
                }
                let mut view = self.write_view();
                view.holdings = derive_holdings(&assets, &self.targets);
                view.status.succeed();
                SyncOutcome::Applied
            }
            Err(e) => {
                log_fetch_failure("Portfolio market list", &e);
                if !token.is_current() {
                    return SyncOutcome::Discarded;
                }
                let kind = e.failure_kind();
                self.write_view().status.fail(kind);
                SyncOutcome::Stale(kind)
            }
        }
    }
}
