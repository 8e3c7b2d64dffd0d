//! Magnitude/time filtering and fixed-size pagination over an in-memory event list.

use crate::models::EventRecord;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Inclusive bounds. `None` leaves that side unbounded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventFilter {
    pub min_mag: Option<f64>,
    pub max_mag: Option<f64>,
    pub start_millis: Option<i64>,
    pub end_millis: Option<i64>,
}

impl EventFilter {
    pub fn magnitude(min_mag: Option<f64>, max_mag: Option<f64>) -> Self {
        Self {
            min_mag,
            max_mag,
            ..Self::default()
        }
    }

    pub fn has_magnitude_bounds(&self) -> bool {
        self.min_mag.is_some() || self.max_mag.is_some()
    }

    pub fn matches(&self, event: &EventRecord) -> bool {
        self.matches_magnitude(event.magnitude) && self.matches_time(event.occurred_at_millis)
    }

    fn matches_magnitude(&self, magnitude: Option<f64>) -> bool {
        // An event without magnitude can't be placed in a bounded range.
        let Some(m) = magnitude else {
            return !self.has_magnitude_bounds();
        };
        let min = self.min_mag.unwrap_or(f64::NEG_INFINITY);
        let max = self.max_mag.unwrap_or(f64::INFINITY);
        min <= m && m <= max
    }

    fn matches_time(&self, at: i64) -> bool {
        self.start_millis.map_or(true, |s| s <= at) && self.end_millis.map_or(true, |e| at <= e)
    }
}

/// Order-preserving subsequence of `events` that pass `filter`.
pub fn apply_filter(events: &[EventRecord], filter: &EventFilter) -> Vec<EventRecord> {
    events.iter().filter(|e| filter.matches(e)).cloned().collect()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-indexed, already clamped into `1..=total_pages`.
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

pub fn total_pages(total: usize, page_size: usize) -> usize {
    let size = effective_page_size(page_size);
    total.div_ceil(size).max(1)
}

fn effective_page_size(page_size: usize) -> usize {
    if page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        page_size
    }
}

/// Slice `items` into page `page` (1-indexed). Out-of-range pages clamp to the nearest valid one.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let size = effective_page_size(page_size);
    let total = items.len();
    let total_pages = total_pages(total, size);
    let page = page.clamp(1, total_pages);
    let start = ((page - 1) * size).min(total);
    let end = (start + size).min(total);
    Page {
        items: items[start..end].to_vec(),
        page,
        total_pages,
        total,
    }
}
