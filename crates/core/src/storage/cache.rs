use std::sync::Arc;

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::traits::KeyValueStore;
use crate::errors::Result;

/// Typed snapshot cache over a persistent [`KeyValueStore`].
///
/// Payloads are stored as JSON. There is no TTL and no schema version: a
/// payload that no longer decodes reads as absent until the next successful
/// fetch overwrites it. Entries are never deleted by the sync layer.
#[derive(Clone)]
pub struct CacheStore {
    store: Arc<dyn KeyValueStore>,
}

impl CacheStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Last snapshot written under `key`, if it is present and decodes as `T`.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.read_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!("Cache hit for '{}'", key);
                Some(value)
            }
            Err(e) => {
                warn!("Ignoring undecodable cache entry '{}': {}", key, e);
                None
            }
        }
    }

    /// Overwrite the snapshot under `key`.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.store.set(key, &json)
    }

    /// Raw string under `key`. Backend errors are logged and read as absent.
    pub fn read_raw(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Cache read for '{}' failed: {}", key, e);
                None
            }
        }
    }

    /// Store a raw string under `key`.
    pub fn write_raw(&self, key: &str, value: &str) -> Result<()> {
        self.store.set(key, value)
    }

    /// [`write`](Self::write), logging instead of returning a failure.
    ///
    /// Views use this after a successful fetch: failing to persist must not
    /// keep the fresh data off screen.
    pub fn write_or_log<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = self.write(key, value) {
            warn!("Cache write for '{}' failed: {}", key, e);
        }
    }
}
