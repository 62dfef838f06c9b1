use crate::errors::Result;

/// String key-value storage.
///
/// Mirrors the browser storage contract: opaque string values under fixed
/// string keys, last write wins, no expiry. Implementations must be cheap to
/// call from async code; none of the methods block on the network.
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Drop `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
