use crate::config::Config;
use clap::Parser;
use quakewatch_core::{EventFilter, RangeSelector};
use std::path::PathBuf;
use std::time::Duration;

const MILLIS_PER_HOUR: i64 = 3_600_000;

/// Terminal earthquake dashboard over the USGS summary feeds.
#[derive(Parser, Debug, Clone)]
#[command(name = "quakewatch", version, about)]
pub struct Args {
    /// Feed window: hour, day, week or month
    #[arg(short, long, default_value = "day", value_parser = parse_range)]
    pub range: RangeSelector,

    /// Lowest magnitude to show (inclusive)
    #[arg(long)]
    pub min_mag: Option<f64>,

    /// Highest magnitude to show (inclusive)
    #[arg(long)]
    pub max_mag: Option<f64>,

    /// Only events from the last N hours
    #[arg(long)]
    pub since_hours: Option<u32>,

    /// Table page, 1-indexed
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    #[arg(long)]
    pub page_size: Option<usize>,

    /// Keep running and refresh on an interval
    #[arg(short, long)]
    pub watch: bool,

    /// Seconds between refreshes in watch mode
    #[arg(long)]
    pub interval_secs: Option<u64>,

    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Skip the local cache entirely
    #[arg(long)]
    pub no_cache: bool,

    /// Print JSON instead of the text dashboard
    #[arg(long)]
    pub json: bool,

    #[arg(long)]
    pub feed_url: Option<String>,

    /// Show every field of one event instead of the dashboard
    #[arg(long, value_name = "ID")]
    pub event: Option<String>,
}

pub fn parse_range(s: &str) -> Result<RangeSelector, String> {
    RangeSelector::from_str(s)
        .ok_or_else(|| format!("unknown range '{}', expected hour, day, week or month", s))
}

/// Flags merged over the environment config. Flags win.
#[derive(Clone, Debug, PartialEq)]
pub struct RunOptions {
    pub range: RangeSelector,
    pub min_mag: Option<f64>,
    pub max_mag: Option<f64>,
    pub since_hours: Option<u32>,
    pub page: usize,
    pub page_size: usize,
    pub watch: bool,
    pub interval: Duration,
    pub cache_dir: Option<PathBuf>,
    pub json: bool,
    pub feed_url: String,
    pub event: Option<String>,
}

impl RunOptions {
    pub fn resolve(args: Args, config: &Config) -> anyhow::Result<Self> {
        for (flag, value) in [("--min-mag", args.min_mag), ("--max-mag", args.max_mag)] {
            if let Some(v) = value {
                if !v.is_finite() {
                    anyhow::bail!("{} must be a finite number, got {}", flag, v);
                }
            }
        }
        if let (Some(min), Some(max)) = (args.min_mag, args.max_mag) {
            if min > max {
                anyhow::bail!("--min-mag {} is above --max-mag {}", min, max);
            }
        }
        let cache_dir = if args.no_cache {
            None
        } else {
            args.cache_dir.or_else(|| config.cache_dir.clone())
        };
        Ok(Self {
            range: args.range,
            min_mag: args.min_mag,
            max_mag: args.max_mag,
            since_hours: args.since_hours,
            page: args.page.max(1),
            page_size: args.page_size.filter(|&n| n > 0).unwrap_or(config.page_size),
            watch: args.watch,
            interval: Duration::from_secs(args.interval_secs.filter(|&n| n > 0).unwrap_or(config.poll_secs)),
            cache_dir,
            json: args.json,
            feed_url: args.feed_url.unwrap_or_else(|| config.feed_url.clone()),
            event: args
                .event
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
        })
    }

    /// Filter for a render happening at `now_millis`. The time window slides with each refresh.
    pub fn filter_at(&self, now_millis: i64) -> EventFilter {
        EventFilter {
            min_mag: self.min_mag,
            max_mag: self.max_mag,
            start_millis: self
                .since_hours
                .map(|h| now_millis - i64::from(h) * MILLIS_PER_HOUR),
            end_millis: None,
        }
    }
}
