//! Feed validation: GeoJSON feature collection -> typed `EventRecord`s.
//! Malformed features are rejected one by one; only a non-list `features` fails the whole batch.

use crate::error::{FetchFailure, RecordError};
use crate::ids::EventId;
use crate::models::{AlertLevel, EventRecord};
use crate::{rust_debug, rust_warn};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFeature {
    id: Option<String>,
    properties: RawProperties,
    geometry: Option<RawGeometry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawProperties {
    mag: Option<f64>,
    place: Option<String>,
    time: Option<i64>,
    url: Option<String>,
    sig: Option<i64>,
    alert: Option<String>,
    tsunami: Option<i64>,
    mmi: Option<f64>,
    cdi: Option<f64>,
    felt: Option<i64>,
    status: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawGeometry {
    coordinates: Option<Vec<f64>>,
}

/// Parse a full response body. Fails only when the body is not JSON or `features` is not a list.
pub fn parse_feed(body: &str) -> Result<Vec<EventRecord>, FetchFailure> {
    let root: Value = serde_json::from_str(body)?;
    let features = root
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| FetchFailure::Schema("`features` is missing or not a list".to_string()))?;
    Ok(collect_records(features))
}

fn collect_records(features: &[Value]) -> Vec<EventRecord> {
    let mut seen: HashSet<EventId> = HashSet::with_capacity(features.len());
    let mut records = Vec::with_capacity(features.len());
    let mut rejected = 0usize;
    let mut duplicates = 0usize;
    for feature in features {
        match parse_feature(feature) {
            Ok(record) => {
                if seen.insert(record.id.clone()) {
                    records.push(record);
                } else {
                    duplicates += 1;
                }
            }
            Err(e) => {
                rejected += 1;
                rust_debug!("[quakewatch] feed: skipped feature: {}", e);
            }
        }
    }
    if rejected > 0 || duplicates > 0 {
        rust_warn!(
            "[quakewatch] feed: kept {} of {} features (rejected={}, duplicate ids={})",
            records.len(),
            features.len(),
            rejected,
            duplicates
        );
    }
    records
}

/// Validate one feature.
pub fn parse_feature(value: &Value) -> Result<EventRecord, RecordError> {
    if !value.is_object() {
        return Err(RecordError::Malformed(value.to_string()));
    }
    let raw: RawFeature =
        serde_json::from_value(value.clone()).map_err(|e| RecordError::Malformed(e.to_string()))?;

    let id = raw
        .id
        .as_deref()
        .and_then(|s| EventId::parse(s).ok())
        .ok_or(RecordError::MissingId)?;
    let props = raw.properties;

    let occurred_at_millis = props.time.ok_or_else(|| RecordError::MissingTime {
        id: id.to_string(),
    })?;

    let coords = raw
        .geometry
        .and_then(|g| g.coordinates)
        .filter(|c| c.len() >= 3)
        .ok_or_else(|| RecordError::MissingCoordinates { id: id.to_string() })?;
    let (longitude, latitude, depth_km) = (coords[0], coords[1], coords[2]);
    if !(longitude.is_finite() && latitude.is_finite() && depth_km.is_finite()) {
        return Err(RecordError::NonFiniteCoordinate { id: id.to_string() });
    }

    Ok(EventRecord {
        id,
        magnitude: props.mag.filter(|m| m.is_finite()),
        place: props.place.unwrap_or_default(),
        occurred_at_millis,
        longitude,
        latitude,
        depth_km,
        significance: props.sig,
        alert_level: props.alert.as_deref().and_then(AlertLevel::from_str),
        tsunami: props.tsunami.unwrap_or(0) != 0,
        felt_reports: props.felt.and_then(|n| u32::try_from(n).ok()),
        community_intensity: props.cdi,
        max_shaking_intensity: props.mmi,
        status: props.status,
        detail_url: props.url,
        title: props.title,
    })
}
