//! Dashboard rendering: one view struct, printed as text panels or JSON.

use quakewatch_core::aggregate::Aggregates;
use quakewatch_core::display::{self, Severity};
use quakewatch_core::{filter_and_page, magnitude_label, EventFilter, EventRecord, Page, Snapshot};
use serde::Serialize;
use std::fmt::Write;

const BAR_WIDTH: usize = 30;
const GAUGE_WIDTH: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Cached,
    Live,
}

#[derive(Clone, Debug, Serialize)]
pub struct DashboardView {
    pub range: String,
    pub source: Source,
    pub fetched_at: String,
    pub magnitude_label: String,
    pub headline: Option<String>,
    pub aggregates: Aggregates,
    pub page: Page<EventRecord>,
}

impl DashboardView {
    pub fn build(
        snapshot: &Snapshot,
        source: Source,
        filter: &EventFilter,
        page: usize,
        page_size: usize,
    ) -> Self {
        let (aggregates, page) = filter_and_page(&snapshot.events, filter, page, page_size);
        // The headline tracks the whole feed, not the filtered table.
        let headline = display::latest_event(&snapshot.events).map(display::headline);
        Self {
            range: snapshot.range.label().to_string(),
            source,
            fetched_at: snapshot.fetched_at.clone(),
            magnitude_label: magnitude_label(filter.min_mag, filter.max_mag),
            headline,
            aggregates,
            page,
        }
    }

    /// Looks `id` up in the whole snapshot, ignoring any filter.
    pub fn detail(snapshot: &Snapshot, id: &str) -> Option<EventDetail> {
        snapshot
            .events
            .iter()
            .find(|e| e.id.as_str() == id)
            .map(EventDetail::from_event)
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let source = match self.source {
            Source::Cached => "cached",
            Source::Live => "live",
        };
        let _ = writeln!(out, "== {} | {} | {} ({}) ==", self.range, self.magnitude_label, self.fetched_at, source);
        if let Some(headline) = &self.headline {
            let _ = writeln!(out, "{}", headline);
        }

        let s = &self.aggregates.summary;
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Events: {}   Max: {:.1}   Avg: {}",
            s.count, s.max_magnitude, s.avg_magnitude
        );
        let _ = writeln!(out, "Intensity {} {:.0}%", gauge(s.intensity), s.intensity);

        let _ = writeln!(out, "\nBy magnitude");
        render_bars(&mut out, &self.aggregates.magnitude_series());
        let _ = writeln!(out, "\nBy depth");
        render_bars(&mut out, &self.aggregates.depth_series());

        let _ = writeln!(out, "\nBy hour (UTC)");
        for bucket in self.aggregates.hourly.iter().filter(|b| b.count > 0) {
            let _ = writeln!(
                out,
                "  {}  {:>4} events  avg {:.2}",
                bucket.label, bucket.count, bucket.avg_magnitude
            );
        }

        let _ = writeln!(out, "\nPage {}/{} ({} events)", self.page.page, self.page.total_pages, self.page.total);
        for event in &self.page.items {
            let severity = Severity::from_magnitude(event.magnitude);
            let _ = writeln!(
                out,
                "  {:>4}  {:<8}  {:<22}  {:>6.1}km  {}",
                display::format_magnitude(event.magnitude),
                severity,
                display::format_time(event.occurred_at_millis),
                event.depth_km,
                event.place
            );
        }
        if self.page.items.is_empty() {
            let _ = writeln!(out, "  (no events match)");
        }
        out
    }
}

/// One labelled group of rows in the event detail panel.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DetailSection {
    pub title: &'static str,
    pub rows: Vec<(&'static str, String)>,
}

/// Every field of a single event, grouped for display. Missing values read "unknown".
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EventDetail {
    pub id: String,
    pub title: String,
    pub sections: Vec<DetailSection>,
    pub link: Option<String>,
}

impl EventDetail {
    pub fn from_event(event: &EventRecord) -> Self {
        let core = DetailSection {
            title: "Core Information",
            rows: vec![
                ("Magnitude", or_unknown(event.magnitude.map(|m| format!("{:.1}", m)))),
                ("Location", or_unknown(Some(event.place.clone()).filter(|p| !p.is_empty()))),
                ("Latitude", format!("{:.2}", event.latitude)),
                ("Longitude", format!("{:.2}", event.longitude)),
                ("Depth (km)", format!("{:.1}", event.depth_km)),
                ("Time", display::format_time(event.occurred_at_millis)),
            ],
        };
        let impact = DetailSection {
            title: "Impact & Alerts",
            rows: vec![
                ("Significance", or_unknown(event.significance.map(|n| n.to_string()))),
                ("Alert Level", or_unknown(event.alert_level.map(|a| a.to_string()))),
                ("Tsunami Warning", (if event.tsunami { "Yes" } else { "No" }).to_string()),
                ("MMI (Shaking Intensity)", or_unknown(event.max_shaking_intensity.map(|v| v.to_string()))),
                ("CDI (Community Intensity)", or_unknown(event.community_intensity.map(|v| v.to_string()))),
                ("Felt Reports", or_unknown(event.felt_reports.map(|n| n.to_string()))),
            ],
        };
        let status = DetailSection {
            title: "Event Status",
            rows: vec![
                ("Status", or_unknown(event.status.clone())),
                ("Event ID", event.id.to_string()),
            ],
        };
        Self {
            id: event.id.to_string(),
            title: event
                .title
                .clone()
                .unwrap_or_else(|| "Earthquake Details".to_string()),
            sections: vec![core, impact, status],
            link: event.detail_url.clone(),
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "== {} ==", self.title);
        for section in &self.sections {
            let _ = writeln!(out, "\n{}", section.title);
            for (label, value) in &section.rows {
                let _ = writeln!(out, "  {:<27} {}", label, value);
            }
        }
        if let Some(link) = &self.link {
            let _ = writeln!(out, "\nMore: {}", link);
        }
        out
    }
}

fn or_unknown(value: Option<String>) -> String {
    value.unwrap_or_else(|| "unknown".to_string())
}

/// Detail panel for `id`, or a not-found line naming the window that was searched.
pub fn render_event(snapshot: &Snapshot, id: &str, json: bool) -> anyhow::Result<String> {
    match DashboardView::detail(snapshot, id) {
        Some(detail) if json => detail.to_json(),
        Some(detail) => Ok(detail.render_text()),
        None => Ok(format!(
            "Event {} not found in {} ({} events)",
            id,
            snapshot.range.label(),
            snapshot.events.len()
        )),
    }
}

fn render_bars(out: &mut String, series: &[(&str, u64)]) {
    let max = series.iter().map(|(_, n)| *n).max().unwrap_or(0);
    for (label, count) in series {
        let width = if max == 0 {
            0
        } else {
            (*count as usize * BAR_WIDTH).div_ceil(max as usize)
        };
        let _ = writeln!(out, "  {:<24} {:>5} {}", label, count, "#".repeat(width));
    }
}

fn gauge(percent: f64) -> String {
    let filled = ((percent / 100.0) * GAUGE_WIDTH as f64).round() as usize;
    let filled = filled.min(GAUGE_WIDTH);
    format!("[{}{}]", "=".repeat(filled), " ".repeat(GAUGE_WIDTH - filled))
}
