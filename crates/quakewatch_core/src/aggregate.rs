//! Derived views over an event list: hourly series, magnitude and depth histograms, summary.
//! Pure; recomputed in full whenever the list or filter changes.

use crate::models::EventRecord;
use serde::Serialize;

pub const HOURS_PER_DAY: usize = 24;

/// Upper bounds of the first three magnitude buckets; a value equal to a bound goes to the next bucket.
pub const MAGNITUDE_BOUNDS: [f64; 3] = [2.5, 4.5, 6.0];
pub const MAGNITUDE_LABELS: [&str; 4] = ["< 2.5", "2.5 – 4.5", "4.5 – 6.0", "6.0+"];

/// Shallow/intermediate/deep split in km.
pub const DEPTH_BOUNDS: [f64; 2] = [70.0, 300.0];
pub const DEPTH_LABELS: [&str; 3] = ["Shallow (<70km)", "Intermediate (70–300km)", "Deep (>300km)"];

const MILLIS_PER_HOUR: i64 = 3_600_000;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct HourBucket {
    pub hour: u8,
    pub label: String,
    /// Every event in the hour, with or without magnitude.
    pub count: u64,
    /// Mean over events with a magnitude, rounded to 2 decimals; 0 when there are none.
    pub avg_magnitude: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub max_magnitude: f64,
    pub avg_magnitude: String,
    /// 0-100 gauge value proportional to `max_magnitude`. Not a seismological unit.
    pub intensity: f64,
}

impl Default for Summary {
    fn default() -> Self {
        Self {
            count: 0,
            max_magnitude: 0.0,
            avg_magnitude: "0.00".to_string(),
            intensity: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Aggregates {
    pub hourly: Vec<HourBucket>,
    pub magnitude_histogram: [u64; 4],
    pub depth_histogram: [u64; 3],
    pub summary: Summary,
}

impl Aggregates {
    /// (label, count) pairs for charting.
    pub fn magnitude_series(&self) -> Vec<(&'static str, u64)> {
        MAGNITUDE_LABELS.iter().copied().zip(self.magnitude_histogram).collect()
    }

    pub fn depth_series(&self) -> Vec<(&'static str, u64)> {
        DEPTH_LABELS.iter().copied().zip(self.depth_histogram).collect()
    }
}

/// UTC hour of day for an epoch-millis timestamp. Total over negative timestamps too.
pub fn hour_of_day_utc(millis: i64) -> usize {
    millis.div_euclid(MILLIS_PER_HOUR).rem_euclid(HOURS_PER_DAY as i64) as usize
}

pub fn magnitude_bucket(magnitude: f64) -> usize {
    MAGNITUDE_BOUNDS
        .iter()
        .position(|&bound| magnitude < bound)
        .unwrap_or(MAGNITUDE_BOUNDS.len())
}

pub fn depth_bucket(depth_km: f64) -> usize {
    DEPTH_BOUNDS
        .iter()
        .position(|&bound| depth_km < bound)
        .unwrap_or(DEPTH_BOUNDS.len())
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn intensity(max_magnitude: f64) -> f64 {
    (max_magnitude / 10.0 * 100.0).clamp(0.0, 100.0)
}

#[derive(Default, Clone, Copy)]
struct HourAcc {
    count: u64,
    mag_count: u64,
    mag_sum: f64,
}

/// Single pass over `events`.
pub fn compute_aggregates(events: &[EventRecord]) -> Aggregates {
    let mut hours = [HourAcc::default(); HOURS_PER_DAY];
    let mut magnitude_histogram = [0u64; 4];
    let mut depth_histogram = [0u64; 3];
    let mut mag_count = 0usize;
    let mut mag_sum = 0.0;
    let mut mag_max: Option<f64> = None;

    for event in events {
        let acc = &mut hours[hour_of_day_utc(event.occurred_at_millis)];
        acc.count += 1;
        depth_histogram[depth_bucket(event.depth_km)] += 1;

        if let Some(m) = event.magnitude {
            acc.mag_count += 1;
            acc.mag_sum += m;
            magnitude_histogram[magnitude_bucket(m)] += 1;
            mag_count += 1;
            mag_sum += m;
            mag_max = Some(mag_max.map_or(m, |cur: f64| cur.max(m)));
        }
    }

    let hourly = hours
        .iter()
        .enumerate()
        .map(|(hour, acc)| HourBucket {
            hour: hour as u8,
            label: format!("{:02}:00", hour),
            count: acc.count,
            avg_magnitude: if acc.mag_count > 0 {
                round2(acc.mag_sum / acc.mag_count as f64)
            } else {
                0.0
            },
        })
        .collect();

    let max_magnitude = mag_max.unwrap_or(0.0);
    let summary = Summary {
        count: events.len(),
        max_magnitude,
        avg_magnitude: if mag_count > 0 {
            format!("{:.2}", mag_sum / mag_count as f64)
        } else {
            "0.00".to_string()
        },
        intensity: intensity(max_magnitude),
    };

    Aggregates {
        hourly,
        magnitude_histogram,
        depth_histogram,
        summary,
    }
}
