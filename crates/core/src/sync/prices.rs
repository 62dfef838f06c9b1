//! Withdrawal view: spot prices for the withdrawable assets.
//!
//! Prices are fetched once per mount. Until they arrive the view shows the
//! simple-price snapshot, or failing that the prices of the shared market
//! list. Reference prices stand in only when a fetch fails and nothing else
//! is known; they are never persisted.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, warn};
use nexora_market_data::{MarketAsset, MarketDataProvider, SimplePrices};
use num_traits::FromPrimitive;
use rust_decimal::Decimal;

use super::lifetime::{MountToken, ViewLifetime};
use super::log_fetch_failure;
use super::status::{SyncOutcome, SyncStatus};
use crate::config::SyncConfig;
use crate::constants::{MARKET_DATA_KEY, SIMPLE_PRICES_KEY};
use crate::portfolio::{
    network_fee, validate_amount, withdrawal_asset, AmountError, TargetValues, WITHDRAWAL_ASSETS,
};
use crate::storage::CacheStore;

/// Where the prices on screen came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PriceSource {
    #[default]
    Unknown,
    SimplePriceCache,
    MarketListCache,
    Live,
    Reference,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PricesState {
    /// Unit price per upper-cased symbol.
    pub prices: BTreeMap<String, f64>,
    pub source: PriceSource,
    pub status: SyncStatus,
}

/// Shown when the first fetch fails with nothing cached.
const REFERENCE_PRICES: [(&str, f64); 4] = [
    ("BTC", 43000.0),
    ("ETH", 2300.0),
    ("SOL", 95.0),
    ("USDT", 1.0),
];

pub struct WithdrawalPrices {
    provider: Arc<dyn MarketDataProvider>,
    cache: CacheStore,
    config: SyncConfig,
    targets: TargetValues,
    lifetime: ViewLifetime,
    view: RwLock<PricesState>,
}

impl WithdrawalPrices {
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
            targets: TargetValues::withdrawal_defaults(),
            lifetime: ViewLifetime::new(),
            view: RwLock::new(view),
        })
    }

    fn bootstrap(cache: &CacheStore, config: &SyncConfig) -> PricesState {
        if let Some(simple) = cache.read::<SimplePrices>(SIMPLE_PRICES_KEY) {
            return PricesState {
                prices: by_symbol(&simple, &config.vs_currency),
                source: PriceSource::SimplePriceCache,
                status: SyncStatus::default(),
            };
        }
        if let Some(assets) = cache.read::<Vec<MarketAsset>>(MARKET_DATA_KEY) {
            return PricesState {
                prices: assets
                    .iter()
                    .map(|asset| (asset.symbol.to_uppercase(), asset.price))
                    .collect(),
                source: PriceSource::MarketListCache,
                status: SyncStatus::default(),
            };
        }
        debug!("No cached prices for the withdrawal view");
        PricesState::default()
    }

    fn read_view(&self) -> RwLockReadGuard<'_, PricesState> {
        self.view.read().unwrap_or_else(|poisoned| {
            warn!("Prices state lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write_view(&self) -> RwLockWriteGuard<'_, PricesState> {
        self.view.write().unwrap_or_else(|poisoned| {
            warn!("Prices state lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Mount the view and fetch prices once.
    pub fn mount(self: &Arc<Self>) -> MountToken {
        let token = self.lifetime.mount();
        *self.write_view() = Self::bootstrap(&self.cache, &self.config);

        let this = self.clone();
        let fetch_token = token.clone();
        tokio::spawn(async move {
            this.refresh(&fetch_token).await;
        });
        token
    }

    pub fn unmount(&self) {
        self.lifetime.unmount();
    }

    pub fn snapshot(&self) -> PricesState {
        self.read_view().clone()
    }

    pub async fn refresh(&self, token: &MountToken) -> SyncOutcome {
        if token.is_current() {
            self.write_view().status.begin();
        }

        let ids: Vec<String> = WITHDRAWAL_ASSETS
            .iter()
            .map(|asset| asset.id.to_string())
            .collect();
        let result = self
            .provider
            .simple_price(&ids, &self.config.vs_currency)
            .await;

        match result {
            Ok(prices) => {
                self.cache.write_or_log(SIMPLE_PRICES_KEY, &prices);
                if !token.is_current() {
                    return SyncOutcome::Discarded;
                }
                let mut view = self.write_view();
                view.prices = by_symbol(&prices, &self.config.vs_currency);
                view.source = PriceSource::Live;
                view.status.succeed();
                SyncOutcome::Applied
            }
            Err(e) => {
                log_fetch_failure("Withdrawal prices", &e);
                if !token.is_current() {
                    return SyncOutcome::Discarded;
                }
                let kind = e.failure_kind();
                let mut view = self.write_view();
                if view.prices.is_empty() {
                    warn!("No known prices, showing reference prices");
                    view.prices = REFERENCE_PRICES
                        .iter()
                        .map(|(symbol, price)| (symbol.to_string(), *price))
                        .collect();
                    view.source = PriceSource::Reference;
                }
                view.status.fail(kind);
                SyncOutcome::Stale(kind)
            }
        }
    }

    /// Price on screen for `symbol`, zero when unknown.
    pub fn price(&self, symbol: &str) -> f64 {
        self.read_view()
            .prices
            .get(&symbol.to_uppercase())
            .copied()
            .unwrap_or(0.0)
    }

    /// Units of `symbol` that can be withdrawn at the current price.
    pub fn available_balance(&self, symbol: &str) -> Decimal {
        self.targets.quantity_at(symbol, self.price(symbol))
    }

    /// USD equivalent of `amount` units at the current price.
    ///
    /// Zero when the price is unknown or the product overflows.
    pub fn fiat_estimate(&self, symbol: &str, amount: Decimal) -> Decimal {
        Decimal::from_f64(self.price(symbol))
            .and_then(|price| price.checked_mul(amount))
            .unwrap_or(Decimal::ZERO)
    }

    pub fn network_fee(&self, symbol: &str) -> Decimal {
        network_fee(symbol)
    }

    /// Validate a withdrawal amount for `symbol`.
    ///
    /// Symbols outside the withdrawal table are refused with no limits.
    pub fn check_amount(&self, symbol: &str, amount: Decimal) -> Result<(), AmountError> {
        match withdrawal_asset(symbol) {
            Some(asset) => validate_amount(asset, amount, self.available_balance(symbol)),
            None => Err(AmountError::UnsupportedAsset(symbol.to_uppercase())),
        }
    }
}

/// Re-key a simple-price payload by withdrawal symbol. Missing ids read as 0.
fn by_symbol(prices: &SimplePrices, currency: &str) -> BTreeMap<String, f64> {
    WITHDRAWAL_ASSETS
        .iter()
        .map(|asset| {
            let price = prices.price(asset.id, currency).unwrap_or(0.0);
            (asset.symbol.to_string(), price)
        })
        .collect()
}
