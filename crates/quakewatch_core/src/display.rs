//! Presentation-adjacent values derived from single events: severity colour, marker sizes, headline text.

use crate::models::EventRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Light,
    Moderate,
    Strong,
}

impl Severity {
    /// Missing magnitude is treated as 0.
    pub fn from_magnitude(magnitude: Option<f64>) -> Self {
        let m = magnitude.unwrap_or(0.0);
        if m >= 6.0 {
            Severity::Strong
        } else if m >= 4.0 {
            Severity::Moderate
        } else if m >= 2.0 {
            Severity::Light
        } else {
            Severity::Minor
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Severity::Strong => "#ef4444",
            Severity::Moderate => "#f97316",
            Severity::Light => "#facc15",
            Severity::Minor => "#22c55e",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Strong => "strong",
            Severity::Moderate => "moderate",
            Severity::Light => "light",
            Severity::Minor => "minor",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 2D map circle radius in pixels.
pub fn marker_radius(magnitude: Option<f64>) -> f64 {
    5.0 + magnitude.unwrap_or(0.0) * 2.0
}

/// Globe point size, never below 0.3.
pub fn globe_point_size(magnitude: Option<f64>) -> f64 {
    (magnitude.unwrap_or(0.0) / 2.0).max(0.3)
}

/// Heatmap weight.
pub fn heat_weight(magnitude: Option<f64>) -> f64 {
    magnitude.unwrap_or(0.0) / 10.0
}

/// Most recent event by `occurred_at_millis`. The first one wins a tie.
pub fn latest_event(events: &[EventRecord]) -> Option<&EventRecord> {
    events.iter().reduce(|latest, current| {
        if current.occurred_at_millis > latest.occurred_at_millis {
            current
        } else {
            latest
        }
    })
}

/// "Oct 18, 2026, 02:15 PM" (UTC).
pub fn format_time(millis: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(millis) {
        Some(dt) => dt.format("%b %d, %Y, %I:%M %p").to_string(),
        None => "unknown time".to_string(),
    }
}

pub fn format_magnitude(magnitude: Option<f64>) -> String {
    match magnitude {
        Some(m) => format!("{:.1}", m),
        None => "?".to_string(),
    }
}

/// One-line live-feed message for the most recent event.
pub fn headline(event: &EventRecord) -> String {
    let place = if event.place.is_empty() {
        "an unknown location"
    } else {
        event.place.as_str()
    };
    match event.magnitude {
        Some(m) => format!(
            "An earthquake of magnitude {:.1} occurred near {} at {}.",
            m,
            place,
            format_time(event.occurred_at_millis)
        ),
        None => format!(
            "An earthquake of unknown magnitude occurred near {} at {}.",
            place,
            format_time(event.occurred_at_millis)
        ),
    }
}
