pub mod feed_server;

/// The recorded past-day feed: 7 features, one of them without geometry.
pub const ALL_DAY_FEED: &str = include_str!("../../fixtures/all_day.geojson");
