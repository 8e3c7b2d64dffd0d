//! Record builders shared by unit tests.

use crate::ids::EventId;
use crate::models::EventRecord;

pub(crate) fn event(id: &str, magnitude: Option<f64>, occurred_at_millis: i64, depth_km: f64) -> EventRecord {
    EventRecord {
        id: EventId::parse(id).expect("test id"),
        magnitude,
        place: format!("near {id}"),
        occurred_at_millis,
        longitude: 0.0,
        latitude: 0.0,
        depth_km,
        significance: None,
        alert_level: None,
        tsunami: false,
        felt_reports: None,
        community_intensity: None,
        max_shaking_intensity: None,
        status: None,
        detail_url: None,
        title: None,
    }
}
