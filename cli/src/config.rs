use quakewatch_core::{DEFAULT_FEED_BASE_URL, DEFAULT_PAGE_SIZE, DEFAULT_POLL_INTERVAL};
use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub feed_url: String,
    /// None disables the local cache.
    pub cache_dir: Option<PathBuf>,
    pub poll_secs: u64,
    pub page_size: usize,
    pub log_json: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading values through `get`. Unparseable numbers fall back to defaults.
    pub fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            feed_url: get("QUAKEWATCH_FEED_URL")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FEED_BASE_URL.to_string()),
            cache_dir: get("QUAKEWATCH_CACHE_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .or_else(default_cache_dir),
            poll_secs: get("QUAKEWATCH_POLL_SECS")
                .and_then(|s| s.parse().ok())
                .filter(|&n: &u64| n > 0)
                .unwrap_or(DEFAULT_POLL_INTERVAL.as_secs()),
            page_size: get("QUAKEWATCH_PAGE_SIZE")
                .and_then(|s| s.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE),
            log_json: get("QUAKEWATCH_LOG_JSON")
                .map(|s| matches!(s.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }
}

fn default_cache_dir() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| PathBuf::from(home).join(".cache").join("quakewatch"))
}
