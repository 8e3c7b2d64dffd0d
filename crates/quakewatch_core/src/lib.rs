//! Earthquake feed core: fetch + validate, filter/paginate, aggregate, cache, poll.
//!
//! The module APIs are the primary surface. The free functions below are a flat, blocking
//! facade over process-wide state (feed URL, cache, one poller) for hosts that don't run tokio.
use once_cell::sync::Lazy;
use std::sync::Mutex;
use std::sync::Arc;
use std::time::Duration;

pub mod aggregate;
pub mod api;
pub mod display;
pub mod error;
pub mod feed;
pub mod filter;
pub mod ids;
pub mod labels;
mod log_bridge;
pub mod models;
pub mod poll;
pub mod storage;
#[cfg(test)]
mod testutil;

pub use aggregate::{compute_aggregates, Aggregates, HourBucket, Summary};
pub use api::{FeedClient, DEFAULT_FEED_BASE_URL};
pub use error::{FetchFailure, RecordError, StorageError};
pub use filter::{apply_filter, paginate, EventFilter, Page, DEFAULT_PAGE_SIZE};
pub use ids::EventId;
pub use labels::magnitude_label;
pub use models::{AlertLevel, EventRecord, RangeSelector, Snapshot};
pub use poll::{Poller, DEFAULT_POLL_INTERVAL};
pub use storage::Storage;

static FEED_BASE_URL: Lazy<Mutex<String>> = Lazy::new(|| Mutex::new(DEFAULT_FEED_BASE_URL.to_string()));
static STORAGE: Lazy<Mutex<Option<Arc<Storage>>>> = Lazy::new(|| Mutex::new(None));
static POLLER: Lazy<Mutex<Option<Poller>>> = Lazy::new(|| Mutex::new(None));
static REFRESH_IN_FLIGHT: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(false));

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|p| p.into_inner())
}

struct RefreshGuard;

impl RefreshGuard {
    fn try_acquire() -> Option<Self> {
        let mut in_flight = lock(&REFRESH_IN_FLIGHT);
        if *in_flight {
            return None;
        }
        *in_flight = true;
        Some(Self)
    }
}

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        *lock(&REFRESH_IN_FLIGHT) = false;
    }
}

// --- Config ---
pub fn set_feed_base_url(base_url: String) {
    rust_log!("[quakewatch] feed base url set to {}", base_url);
    *lock(&FEED_BASE_URL) = base_url;
}

pub fn get_feed_base_url() -> String {
    lock(&FEED_BASE_URL).clone()
}

fn client() -> FeedClient {
    FeedClient::new(get_feed_base_url())
}

// --- Cache ---
/// Open the cache under `storage_path`. Safe to call again; the newest path wins.
pub fn init_storage(storage_path: String) -> Result<(), StorageError> {
    let storage = Storage::open(&storage_path)?;
    *lock(&STORAGE) = Some(Arc::new(storage));
    rust_log!("[quakewatch] cache ready at {}", storage_path);
    Ok(())
}

fn storage() -> Option<Arc<Storage>> {
    lock(&STORAGE).clone()
}

/// Cached list for instant first paint; empty when there is no cache or nothing stored.
pub fn load_cached_events(range: RangeSelector) -> Vec<EventRecord> {
    let Some(storage) = storage() else {
        return Vec::new();
    };
    match storage.load_snapshot(range) {
        Ok(Some(snapshot)) => snapshot.events,
        Ok(None) => Vec::new(),
        Err(e) => {
            rust_warn!("[quakewatch] cache read failed for range={}: {}", range, e);
            Vec::new()
        }
    }
}

fn remember(range: RangeSelector, events: &[EventRecord]) {
    if let Some(storage) = storage() {
        if let Err(e) = storage.store_live(range, events) {
            rust_warn!("[quakewatch] cache write failed for range={}: {}", range, e);
        }
    }
}

// --- Fetch ---
/// One blocking fetch. Empty on any failure.
pub fn fetch_events(range: RangeSelector) -> Vec<EventRecord> {
    client().fetch_blocking(range)
}

/// Fetch and update the cache. Returns `None` (without fetching) when another refresh is still running.
pub fn refresh(range: RangeSelector) -> Option<Vec<EventRecord>> {
    let Some(_guard) = RefreshGuard::try_acquire() else {
        rust_log!("[quakewatch] refresh skipped (in-flight, range={})", range);
        return None;
    };
    let events = fetch_events(range);
    remember(range, &events);
    Some(events)
}

// --- Derived views ---
pub fn filter_and_page(
    events: &[EventRecord],
    filter: &EventFilter,
    page: usize,
    page_size: usize,
) -> (Aggregates, Page<EventRecord>) {
    let filtered = apply_filter(events, filter);
    (compute_aggregates(&filtered), paginate(&filtered, page, page_size))
}

// --- Polling ---
/// Replace the running poller, if any. Each snapshot is written to the cache before `on_snapshot` sees it.
pub fn start_polling<F>(range: RangeSelector, interval: Duration, mut on_snapshot: F)
where
    F: FnMut(Snapshot) + Send + 'static,
{
    let poller = Poller::spawn_on(api::RUNTIME.handle(), client(), range, interval, move |snapshot| {
        remember(snapshot.range, &snapshot.events);
        on_snapshot(snapshot);
    });
    // Dropping the previous poller stops it.
    *lock(&POLLER) = Some(poller);
}

pub fn stop_polling() {
    if let Some(mut poller) = lock(&POLLER).take() {
        poller.stop();
    }
}

pub fn is_polling() -> bool {
    lock(&POLLER).as_ref().map(Poller::is_alive).unwrap_or(false)
}

/// Drain buffered core log lines (e.g. to show in a host console).
pub fn drain_rust_logs() -> Vec<String> {
    log_bridge::drain_rust_logs()
}
