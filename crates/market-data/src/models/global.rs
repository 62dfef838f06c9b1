use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate figures for the whole market.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStats {
    /// Total market capitalization (USD)
    pub total_market_cap: f64,

    /// Total 24h volume (USD)
    pub total_volume: f64,

    /// 24h change of the total market capitalization, in percent
    pub market_cap_change_24h: f64,

    /// When the API last recomputed these figures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}
