//! Fixed-interval polling of one feed window. Fetches never overlap; once `stop` returns nothing is delivered.
//!
//! Delivery and `stop` share one lock, so `stop` waits for a callback already running.
//! Calling `stop` (or dropping the poller) from inside `on_snapshot` deadlocks.

use crate::api::FeedClient;
use crate::models::{RangeSelector, Snapshot};
use crate::rust_log;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5 * 60);
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

pub struct Poller {
    range: RangeSelector,
    alive: Arc<Mutex<bool>>,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    /// Start polling on the current tokio runtime. Panics outside a runtime, like `tokio::spawn`.
    pub fn spawn<F>(client: FeedClient, range: RangeSelector, interval: Duration, on_snapshot: F) -> Self
    where
        F: FnMut(Snapshot) + Send + 'static,
    {
        Self::spawn_on(&Handle::current(), client, range, interval, on_snapshot)
    }

    /// Fetch once immediately, then every `interval` until stopped.
    pub fn spawn_on<F>(
        rt: &Handle,
        client: FeedClient,
        range: RangeSelector,
        interval: Duration,
        mut on_snapshot: F,
    ) -> Self
    where
        F: FnMut(Snapshot) + Send + 'static,
    {
        let interval = interval.max(MIN_POLL_INTERVAL);
        let alive = Arc::new(Mutex::new(true));
        let flag = alive.clone();
        rust_log!(
            "[quakewatch] poll: started range={} interval={}ms",
            range,
            interval.as_millis()
        );
        let handle = rt.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // Delay, not Burst: a slow fetch pushes the next one back instead of stacking them.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let live = *lock_flag(&flag);
                if !live {
                    break;
                }
                let events = client.fetch(range).await;
                // Held through the callback; the guard must not live across an await.
                let delivered = {
                    let live = lock_flag(&flag);
                    if *live {
                        on_snapshot(Snapshot::new(range, events));
                    }
                    *live
                };
                if !delivered {
                    rust_log!("[quakewatch] poll: discarding response for range={} after stop", range);
                    break;
                }
            }
        });
        Self {
            range,
            alive,
            handle: Some(handle),
        }
    }

    pub fn range(&self) -> RangeSelector {
        self.range
    }

    pub fn is_alive(&self) -> bool {
        *lock_flag(&self.alive)
    }

    /// Tear down the timer. An in-flight fetch is abandoned and its result dropped.
    /// Blocks while a delivery is in progress.
    pub fn stop(&mut self) {
        let was_alive = std::mem::replace(&mut *lock_flag(&self.alive), false);
        if was_alive {
            rust_log!("[quakewatch] poll: stopped range={}", self.range);
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

fn lock_flag(flag: &Mutex<bool>) -> MutexGuard<'_, bool> {
    // A panicking callback poisons the lock; the flag itself stays meaningful.
    flag.lock().unwrap_or_else(|p| p.into_inner())
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}
