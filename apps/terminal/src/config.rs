use std::path::PathBuf;
use std::time::Duration;

use nexora_market_data::DEFAULT_BASE_URL;

/// Process configuration read from the environment (and `.env`).
pub struct Config {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub data_dir: PathBuf,
    pub log_format: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let api_base_url =
            std::env::var("NEXORA_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout_ms: u64 = std::env::var("NEXORA_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "10000".into())
            .parse()
            .unwrap_or(10000);
        let data_dir = std::env::var("NEXORA_DATA_DIR").unwrap_or_else(|_| "./data".into());
        let log_format = std::env::var("NEXORA_LOG_FORMAT").unwrap_or_else(|_| "text".into());
        Self {
            api_base_url,
            request_timeout: Duration::from_millis(timeout_ms),
            data_dir: PathBuf::from(data_dir),
            log_format,
        }
    }

    /// File backing the persistent market cache.
    pub fn cache_path(&self) -> PathBuf {
        self.data_dir.join("market_cache.json")
    }
}
