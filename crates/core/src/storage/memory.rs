use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::warn;

use super::traits::KeyValueStore;
use crate::errors::Result;

/// In-memory store that lives as long as the process.
///
/// Used for session-scoped flags and as the fake persistent store in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock for reading, recovering from poison.
    ///
    /// A poisoned lock only means a writer panicked mid-insert; the map itself
    /// is still usable.
    fn read_entries(&self) -> RwLockReadGuard<'_, HashMap<String, String>> {
        self.entries.read().unwrap_or_else(|poisoned| {
            warn!("Memory store lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, HashMap<String, String>> {
        self.entries.write().unwrap_or_else(|poisoned| {
            warn!("Memory store lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_entries().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.write_entries()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.write_entries().remove(key);
        Ok(())
    }
}
