use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Result of a simple price lookup: `id -> currency -> price`.
///
/// Serialized exactly as the API returns it, e.g.
/// `{"bitcoin":{"usd":65000.0}}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimplePrices(BTreeMap<String, BTreeMap<String, f64>>);

impl SimplePrices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the price of `id` in `currency`.
    pub fn insert(&mut self, id: impl Into<String>, currency: impl Into<String>, price: f64) {
        self.0
            .entry(id.into())
            .or_default()
            .insert(currency.into(), price);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, id: impl Into<String>, currency: impl Into<String>, price: f64) -> Self {
        self.insert(id, currency, price);
        self
    }

    /// Price of `id` in `currency`, if the lookup returned one.
    pub fn price(&self, id: &str, currency: &str) -> Option<f64> {
        self.0.get(id).and_then(|quotes| quotes.get(currency)).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}
