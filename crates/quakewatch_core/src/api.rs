//! HTTP client for the public earthquake summary feed.
use crate::error::FetchFailure;
use crate::feed;
use crate::models::{EventRecord, RangeSelector};
use crate::{rust_log, rust_warn};
use once_cell::sync::Lazy;
use std::time::Duration;

pub const DEFAULT_FEED_BASE_URL: &str = "https://earthquake.usgs.gov/earthquakes/feed/v1.0";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

static CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .expect("reqwest client")
});

pub(crate) static RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Runtime::new().expect("tokio runtime")
});

/// Read-only client for one feed base URL. Cheap to clone.
#[derive(Clone, Debug)]
pub struct FeedClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for FeedClient {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_BASE_URL)
    }
}

impl FeedClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(CLIENT.clone(), base_url)
    }

    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn feed_url(&self, range: RangeSelector) -> String {
        format!("{}/{}", self.base_url, range.feed_path())
    }

    /// GET the feed for `range` once. No retry.
    pub async fn try_fetch(&self, range: RangeSelector) -> Result<Vec<EventRecord>, FetchFailure> {
        let url = self.feed_url(range);
        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchFailure::Status {
                status: status.as_u16(),
            });
        }
        let text = resp.text().await?;
        feed::parse_feed(&text)
    }

    /// Like `try_fetch`, but every failure is logged and becomes an empty list.
    pub async fn fetch(&self, range: RangeSelector) -> Vec<EventRecord> {
        match self.try_fetch(range).await {
            Ok(events) => {
                rust_log!("[quakewatch] fetch range={} -> {} events", range, events.len());
                events
            }
            Err(e) => {
                rust_warn!("[quakewatch] fetch range={} failed: {}", range, e);
                Vec::new()
            }
        }
    }

    /// Blocking variant for synchronous callers. Must not be called from inside a tokio runtime.
    pub fn fetch_blocking(&self, range: RangeSelector) -> Vec<EventRecord> {
        RUNTIME.block_on(self.fetch(range))
    }
}
