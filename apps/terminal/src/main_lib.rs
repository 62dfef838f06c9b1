use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use nexora_core::{CacheStore, FileStore, MemoryStore, Session, SyncConfig};
use nexora_market_data::{CoinGeckoProvider, MarketDataProvider};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

/// Everything a command needs to build a view.
pub struct AppContext {
    pub provider: Arc<dyn MarketDataProvider>,
    pub cache: CacheStore,
    pub session: Session,
    pub sync: SyncConfig,
}

pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_context(config: &Config) -> anyhow::Result<AppContext> {
    std::fs::create_dir_all(&config.data_dir).with_context(|| {
        format!("Failed to create data dir {}", config.data_dir.display())
    })?;
    let store = FileStore::open(config.cache_path())?;
    tracing::info!("Market cache at {}", store.path().display());

    let provider =
        CoinGeckoProvider::with_base_url(config.api_base_url.clone(), config.request_timeout);

    let sync = SyncConfig::default();
    sync.validate()?;

    Ok(AppContext {
        provider: Arc::new(provider),
        cache: CacheStore::new(Arc::new(store)),
        // Session flags last as long as the process, like a browser tab.
        session: Session::new(Arc::new(MemoryStore::new())),
        sync,
    })
}

/// Poll `done` until it holds or `timeout` passes. Returns whether it held.
pub async fn wait_until(timeout: Duration, mut done: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if done() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}
