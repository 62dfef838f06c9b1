//! Session-scoped flags.
//!
//! The signed-in marker and the one-time welcome flag live in a store whose
//! lifetime is the session (a browser tab in the web client, the process
//! here). Signing out only touches this store; the persistent market cache is
//! a different store and survives.

use std::sync::Arc;

use crate::constants::{ACCESS_KEY_KEY, WELCOME_SEEN_KEY};
use crate::errors::{Error, Result};
use crate::storage::KeyValueStore;

/// Signed-in state and one-time notices for the current session.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn KeyValueStore>,
}

impl Session {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Record `access_key` as the signed-in marker.
    pub fn sign_in(&self, access_key: &str) -> Result<()> {
        let access_key = access_key.trim();
        if access_key.is_empty() {
            return Err(Error::Validation("access key must not be empty".to_string()));
        }
        self.store.set(ACCESS_KEY_KEY, access_key)
    }

    /// The marker recorded by [`sign_in`](Self::sign_in), if any.
    pub fn access_key(&self) -> Result<Option<String>> {
        self.store.get(ACCESS_KEY_KEY)
    }

    pub fn is_signed_in(&self) -> Result<bool> {
        Ok(self.access_key()?.is_some())
    }

    /// Whether the welcome notice still has to be shown this session.
    pub fn should_show_welcome(&self) -> Result<bool> {
        Ok(self.store.get(WELCOME_SEEN_KEY)?.is_none())
    }

    pub fn dismiss_welcome(&self) -> Result<()> {
        self.store.set(WELCOME_SEEN_KEY, "true")
    }

    /// Drop the signed-in marker. The welcome flag stays set.
    pub fn sign_out(&self) -> Result<()> {
        self.store.remove(ACCESS_KEY_KEY)
    }
}
