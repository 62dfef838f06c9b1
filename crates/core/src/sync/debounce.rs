use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use log::warn;
use tokio::task::JoinHandle;

/// Trailing-edge debouncer.
///
/// Each [`call`](Self::call) cancels the pending action, if it has not started
/// yet, and schedules the new one after the quiet period. Once an action has
/// started it runs to completion even if a newer call arrives; there is no
/// queue of intermediate actions.
#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: Mutex::new(None),
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    fn lock_pending(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(|poisoned| {
            warn!("Debouncer lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Schedule `action` to run once the input has been quiet long enough.
    pub fn call<F>(&self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let quiet = self.quiet;
        let mut pending = self.lock_pending();
        if let Some(handle) = pending.take() {
            handle.abort();
        }
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            // Detach so that a later call can no longer cancel it.
            tokio::spawn(action);
        }));
    }

    /// Drop the pending action, if any.
    pub fn cancel(&self) {
        if let Some(handle) = self.lock_pending().take() {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
