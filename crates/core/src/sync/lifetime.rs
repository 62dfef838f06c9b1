//! Mount generations for views.
//!
//! Fetches are never cancelled. Instead every fetch carries the
//! [`MountToken`] of the mount that started it, and its result is applied to
//! view state only while that token is still current.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Generation counter shared by a view and the tokens it hands out.
#[derive(Clone, Debug, Default)]
pub struct ViewLifetime {
    generation: Arc<AtomicU64>,
}

impl ViewLifetime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new mount. Tokens of earlier mounts stop being current.
    pub fn mount(&self) -> MountToken {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        MountToken {
            generation,
            current: self.generation.clone(),
        }
    }

    /// Tear the view down. Every outstanding token stops being current.
    pub fn unmount(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

/// Proof that a fetch was started by a particular mount.
#[derive(Clone, Debug)]
pub struct MountToken {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl MountToken {
    /// Whether the mount that issued this token is still live.
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
