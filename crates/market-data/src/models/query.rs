use serde::{Deserialize, Serialize};

use super::types::{VsCurrency, DEFAULT_VS_CURRENCY};

/// Parameters for the market list endpoint.
///
/// Two shapes are used: a page of the full list ordered by market cap, or
/// an explicit id set (search enrichment). Ordering is always
/// `market_cap_desc`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketsQuery {
    /// Quote currency (e.g. "usd")
    pub vs_currency: VsCurrency,

    /// Rows per page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,

    /// 1-based page number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Restrict the list to these ids
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<String>,
}

impl MarketsQuery {
    /// The sort order every market list request uses.
    pub const ORDER: &'static str = "market_cap_desc";

    /// One page of the market list in the default currency.
    pub fn page(per_page: u32, page: u32) -> Self {
        Self {
            vs_currency: VsCurrency::Borrowed(DEFAULT_VS_CURRENCY),
            per_page: Some(per_page),
            page: Some(page),
            ids: Vec::new(),
        }
    }

    /// Market rows for an explicit id set in the default currency.
    pub fn ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vs_currency: VsCurrency::Borrowed(DEFAULT_VS_CURRENCY),
            per_page: None,
            page: None,
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Override the quote currency.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.vs_currency = VsCurrency::Owned(currency.into());
        self
    }
}
