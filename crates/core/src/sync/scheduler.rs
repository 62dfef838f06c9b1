//! Fixed-period refresh loops and the task handles a mounted view owns.

use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, warn};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use super::lifetime::MountToken;

/// Spawn a loop that starts `tick` immediately and then once per `period`.
///
/// Each tick's fetch runs as its own task and is not awaited, so a slow fetch
/// never delays the schedule and two fetches may be in flight at once. The
/// loop ends on its own once `token` stops being current.
pub fn spawn_refresh_loop<F, Fut>(
    name: &'static str,
    period: Duration,
    token: MountToken,
    tick: F,
) -> JoinHandle<()>
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        debug!("Refresh loop '{}' started ({:?} period)", name, period);

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if !token.is_current() {
                break;
            }
            tokio::spawn(tick());
        }

        debug!("Refresh loop '{}' stopped", name);
    })
}

/// Timers and loops started by one mount of a view.
///
/// Aborting them stops future ticks only; fetches already spawned run to
/// completion and are filtered by their mount token.
#[derive(Debug, Default)]
pub struct ViewTasks {
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl ViewTasks {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_handles(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.handles.lock().unwrap_or_else(|poisoned| {
            warn!("View task list lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    pub fn push(&self, handle: JoinHandle<()>) {
        let mut handles = self.lock_handles();
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
    }

    pub fn abort_all(&self) {
        for handle in self.lock_handles().drain(..) {
            handle.abort();
        }
    }

    pub fn len(&self) -> usize {
        self.lock_handles().iter().filter(|h| !h.is_finished()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for ViewTasks {
    fn drop(&mut self) {
        self.abort_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::ViewLifetime;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_immediately_then_every_period() {
        let lifetime = ViewLifetime::new();
        let count = Arc::new(AtomicUsize::new(0));

        let counter = count.clone();
        let handle = spawn_refresh_loop("test", Duration::from_secs(60), lifetime.mount(), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(count.load(Ordering::SeqCst), 4);

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_ends_after_unmount() {
        let lifetime = ViewLifetime::new();
        let count = Arc::new(AtomicUsize::new(0));

        let counter = count.clone();
        let handle = spawn_refresh_loop("test", Duration::from_secs(60), lifetime.mount(), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(1)).await;
        lifetime.unmount();
        tokio::time::sleep(Duration::from_secs(300)).await;

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_abort_all_stops_ticks() {
        let lifetime = ViewLifetime::new();
        let tasks = ViewTasks::new();
        let count = Arc::new(AtomicUsize::new(0));

        let counter = count.clone();
        tasks.push(spawn_refresh_loop("test", Duration::from_secs(60), lifetime.mount(), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        }));

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(tasks.len(), 1);
        tasks.abort_all();
        tokio::time::sleep(Duration::from_secs(300)).await;

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(tasks.is_empty());
    }
}
