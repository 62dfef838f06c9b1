//! Scripted provider shared by the view tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use nexora_market_data::{
    GlobalStats, MarketAsset, MarketDataError, MarketDataProvider, MarketsQuery, SearchCandidate,
    SimplePrices,
};
use tokio::time::Instant;

use crate::storage::{CacheStore, MemoryStore};

type Scripted<T> = Mutex<VecDeque<Result<T, MarketDataError>>>;

/// One request seen by the mock.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Global(String),
    Markets(MarketsQuery),
    Search(String),
    SimplePrice(Vec<String>),
}

/// Provider that replays queued responses and records every call.
///
/// An exhausted queue answers with HTTP 503.
#[derive(Default)]
pub struct MockProvider {
    global: Scripted<GlobalStats>,
    markets: Scripted<Vec<MarketAsset>>,
    search: Scripted<Vec<SearchCandidate>>,
    prices: Scripted<SimplePrices>,
    calls: Mutex<Vec<(Call, Instant)>>,
    latency: Mutex<Duration>,
}

impl MockProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_global(&self, response: Result<GlobalStats, MarketDataError>) {
        self.global.lock().unwrap().push_back(response);
    }

    pub fn push_markets(&self, response: Result<Vec<MarketAsset>, MarketDataError>) {
        self.markets.lock().unwrap().push_back(response);
    }

    pub fn push_search(&self, response: Result<Vec<SearchCandidate>, MarketDataError>) {
        self.search.lock().unwrap().push_back(response);
    }

    pub fn push_prices(&self, response: Result<SimplePrices, MarketDataError>) {
        self.prices.lock().unwrap().push_back(response);
    }

    /// Delay every response by `latency` (virtual time in paused tests).
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = latency;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().iter().map(|(c, _)| c.clone()).collect()
    }

    pub fn timed_calls(&self) -> Vec<(Call, Instant)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    async fn respond<T>(&self, call: Call, queue: &Scripted<T>) -> Result<T, MarketDataError> {
        self.calls.lock().unwrap().push((call, Instant::now()));
        let latency = *self.latency.lock().unwrap();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unavailable()))
    }
}

#[async_trait]
impl MarketDataProvider for MockProvider {
    fn id(&self) -> &'static str {
        "MOCK"
    }

    async fn global_stats(&self, vs_currency: &str) -> Result<GlobalStats, MarketDataError> {
        self.respond(Call::Global(vs_currency.to_string()), &self.global)
            .await
    }

    async fn markets(&self, query: &MarketsQuery) -> Result<Vec<MarketAsset>, MarketDataError> {
        self.respond(Call::Markets(query.clone()), &self.markets).await
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>, MarketDataError> {
        self.respond(Call::Search(query.to_string()), &self.search)
            .await
    }

    async fn simple_price(
        &self,
        ids: &[String],
        _vs_currency: &str,
    ) -> Result<SimplePrices, MarketDataError> {
        self.respond(Call::SimplePrice(ids.to_vec()), &self.prices)
            .await
    }
}

pub fn rate_limited() -> MarketDataError {
    MarketDataError::RateLimited {
        provider: "MOCK".to_string(),
    }
}

pub fn unavailable() -> MarketDataError {
    MarketDataError::HttpStatus {
        provider: "MOCK".to_string(),
        status: 503,
    }
}

/// `count` rows starting at index `from`, priced by index.
pub fn rows(from: usize, count: usize) -> Vec<MarketAsset> {
    (from..from + count)
        .map(|i| {
            MarketAsset::new(format!("coin-{}", i), format!("c{}", i), format!("Coin {}", i))
                .with_price(100.0 + i as f64)
                .with_market_cap(1.0e12 / (i as f64 + 1.0))
        })
        .collect()
}

pub fn asset(id: &str, symbol: &str, price: f64) -> MarketAsset {
    MarketAsset::new(id, symbol, id).with_price(price)
}

pub fn global(total_market_cap: f64) -> GlobalStats {
    GlobalStats {
        total_market_cap,
        total_volume: total_market_cap / 20.0,
        market_cap_change_24h: 1.5,
        updated_at: None,
    }
}

/// Cache over a fresh in-memory store, plus the store itself.
pub fn memory_cache() -> (Arc<MemoryStore>, CacheStore) {
    let store = Arc::new(MemoryStore::new());
    (store.clone(), CacheStore::new(store))
}
