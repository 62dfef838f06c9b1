//! CoinGecko market data provider.
//!
//! Consumes four read-only endpoints of the public v3 API:
//! - `/global` for whole-market aggregates
//! - `/coins/markets` for the market-cap ordered list (paged or by id set)
//! - `/search` for free-text lookup
//! - `/simple/price` for bare price lookups
//!
//! The public tier rate limits aggressively and answers HTTP 429 when it
//! does; that status is surfaced as [`MarketDataError::RateLimited`].
//! API documentation: https://docs.coingecko.com/v3.0.1/reference/introduction

mod models;

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::errors::MarketDataError;
use crate::models::{
    GlobalStats, MarketAsset, MarketsQuery, SearchCandidate, SimplePrices,
};
use crate::provider::MarketDataProvider;

use models::{CoinMarketRow, GlobalResponse, SearchResponse};

/// Public API root
pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Provider ID constant
const PROVIDER_ID: &str = "COINGECKO";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// CoinGecko v3 client.
///
/// # Example
///
/// ```ignore
/// use nexora_market_data::CoinGeckoProvider;
///
/// let provider = CoinGeckoProvider::new();
/// let stats = provider.global_stats("usd").await?;
/// ```
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    /// Create a client for the public API with the default timeout.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, REQUEST_TIMEOUT)
    }

    /// Create a client against another API root (mirror, proxy, test server).
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a full request URL with percent-encoded query values.
    fn build_url(&self, endpoint: &str, params: &[(&str, String)]) -> String {
        let mut url = format!("{}{}", self.base_url, endpoint);
        for (i, (key, value)) in params.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    fn markets_url(&self, query: &MarketsQuery) -> String {
        let mut params = vec![
            ("vs_currency", query.vs_currency.to_string()),
            ("order", MarketsQuery::ORDER.to_string()),
        ];
        if let Some(per_page) = query.per_page {
            params.push(("per_page", per_page.to_string()));
        }
        if let Some(page) = query.page {
            params.push(("page", page.to_string()));
        }
        if !query.ids.is_empty() {
            params.push(("ids", query.ids.join(",")));
        }
        self.build_url("/coins/markets", &params)
    }

    fn search_url(&self, query: &str) -> String {
        self.build_url("/search", &[("query", query.to_string())])
    }

    fn simple_price_url(&self, ids: &[String], vs_currency: &str) -> String {
        self.build_url(
            "/simple/price",
            &[
                ("ids", ids.join(",")),
                ("vs_currencies", vs_currency.to_string()),
            ],
        )
    }

    /// Single GET attempt, classified and decoded.
    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, MarketDataError> {
        debug!("CoinGecko request: {}", url);

        let response = self.client.get(url).send().await?;
        check_status(response.status())?;

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| MarketDataError::Decode {
            provider: PROVIDER_ID.to_string(),
            message: e.to_string(),
        })
    }
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Map an HTTP status onto the failure taxonomy.
fn check_status(status: StatusCode) -> Result<(), MarketDataError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        warn!("CoinGecko rate limit hit");
        return Err(MarketDataError::RateLimited {
            provider: PROVIDER_ID.to_string(),
        });
    }

    if !status.is_success() {
        return Err(MarketDataError::HttpStatus {
            provider: PROVIDER_ID.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(())
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn global_stats(&self, vs_currency: &str) -> Result<GlobalStats, MarketDataError> {
        let url = self.build_url("/global", &[]);
        let response: GlobalResponse = self.fetch_json(&url).await?;
        Ok(response.data.into_stats(&vs_currency.to_lowercase()))
    }

    async fn markets(&self, query: &MarketsQuery) -> Result<Vec<MarketAsset>, MarketDataError> {
        if query.page == Some(0) {
            return Err(MarketDataError::InvalidQuery(
                "page numbers start at 1".to_string(),
            ));
        }

        let url = self.markets_url(query);
        let rows: Vec<CoinMarketRow> = self.fetch_json(&url).await?;
        Ok(rows.into_iter().map(MarketAsset::from).collect())
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>, MarketDataError> {
        let url = self.search_url(query);
        let response: SearchResponse = self.fetch_json(&url).await?;
        Ok(response.coins)
    }

    async fn simple_price(
        &self,
        ids: &[String],
        vs_currency: &str,
    ) -> Result<SimplePrices, MarketDataError> {
        if ids.is_empty() {
            return Ok(SimplePrices::new());
        }

        let url = self.simple_price_url(ids, vs_currency);
        self.fetch_json(&url).await
    }
}
