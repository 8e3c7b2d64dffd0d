//! Data models for earthquake events and feed windows.
//! Wire format is the upstream GeoJSON (see feed.rs); these are the validated, typed records.

use crate::ids::EventId;
use serde::{Deserialize, Serialize};

/// PAGER alert level attached to significant events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Green,
    Yellow,
    Orange,
    Red,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Green => "green",
            AlertLevel::Yellow => "yellow",
            AlertLevel::Orange => "orange",
            AlertLevel::Red => "red",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "green" => Some(AlertLevel::Green),
            "yellow" => Some(AlertLevel::Yellow),
            "orange" => Some(AlertLevel::Orange),
            "red" => Some(AlertLevel::Red),
            _ => None,
        }
    }
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Feed time window. Each maps to one fixed summary feed upstream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RangeSelector {
    Hour,
    #[default]
    Day,
    Week,
    Month,
}

impl RangeSelector {
    pub const ALL: [RangeSelector; 4] = [
        RangeSelector::Hour,
        RangeSelector::Day,
        RangeSelector::Week,
        RangeSelector::Month,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RangeSelector::Hour => "hour",
            RangeSelector::Day => "day",
            RangeSelector::Week => "week",
            RangeSelector::Month => "month",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "hour" => Some(RangeSelector::Hour),
            "day" => Some(RangeSelector::Day),
            "week" => Some(RangeSelector::Week),
            "month" => Some(RangeSelector::Month),
            _ => None,
        }
    }

    /// Path of the summary feed relative to the feed base URL.
    pub fn feed_path(&self) -> String {
        format!("summary/all_{}.geojson", self.as_str())
    }

    pub fn label(&self) -> &'static str {
        match self {
            RangeSelector::Hour => "Past Hour",
            RangeSelector::Day => "Past 24 Hours",
            RangeSelector::Week => "Past 7 Days",
            RangeSelector::Month => "Past 30 Days",
        }
    }

    pub(crate) fn cache_key(&self) -> String {
        format!("snapshot_{}", self.as_str())
    }
}

impl std::fmt::Display for RangeSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One observed event, validated from a feed feature.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: EventId,
    /// None when the feed omitted it; such events are left out of magnitude statistics.
    pub magnitude: Option<f64>,
    pub place: String,
    pub occurred_at_millis: i64,
    pub longitude: f64,
    pub latitude: f64,
    pub depth_km: f64,
    #[serde(default)]
    pub significance: Option<i64>,
    #[serde(default)]
    pub alert_level: Option<AlertLevel>,
    #[serde(default)]
    pub tsunami: bool,
    #[serde(default)]
    pub felt_reports: Option<u32>,
    #[serde(default)]
    pub community_intensity: Option<f64>,
    #[serde(default)]
    pub max_shaking_intensity: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub detail_url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// A fetched list plus where and when it came from. Replaced wholesale on every fetch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub range: RangeSelector,
    pub events: Vec<EventRecord>,
    pub fetched_at: String,
}

impl Snapshot {
    pub fn new(range: RangeSelector, events: Vec<EventRecord>) -> Self {
        Self {
            range,
            events,
            fetched_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
