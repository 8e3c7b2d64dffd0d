//! Fetcher: one GET per call, every failure degrades to an empty list.

use crate::common::feed_server::FeedServer;
use crate::common::ALL_DAY_FEED;
use axum::http::StatusCode;
use quakewatch_core::{FeedClient, FetchFailure, RangeSelector};

#[tokio::test]
async fn valid_feed_yields_validated_records() {
    let server = FeedServer::start(StatusCode::OK, ALL_DAY_FEED).await;
    let client = FeedClient::new(&server.base_url);

    let events = client.fetch(RangeSelector::Day).await;

    let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["nc73900001", "ci40600002", "us7000l003", "ak0240004", "us7000l005", "hv74000006"]
    );
    assert_eq!(server.paths(), vec!["/summary/all_day.geojson".to_string()]);
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn range_selector_picks_the_feed_path() {
    let server = FeedServer::start(StatusCode::OK, r#"{"features": []}"#).await;
    let client = FeedClient::new(&server.base_url);
    for range in RangeSelector::ALL {
        assert!(client.fetch(range).await.is_empty());
    }
    assert_eq!(
        server.paths(),
        vec![
            "/summary/all_hour.geojson",
            "/summary/all_day.geojson",
            "/summary/all_week.geojson",
            "/summary/all_month.geojson",
        ]
    );
}

#[tokio::test]
async fn non_success_status_returns_empty_without_retry() {
    let server = FeedServer::start(StatusCode::SERVICE_UNAVAILABLE, "upstream down").await;
    let client = FeedClient::new(&server.base_url);

    assert!(client.fetch(RangeSelector::Day).await.is_empty());
    assert_eq!(server.hits(), 1);

    let err = client.try_fetch(RangeSelector::Day).await.unwrap_err();
    assert!(matches!(err, FetchFailure::Status { status: 503 }));
}

#[tokio::test]
async fn malformed_body_returns_empty() {
    let server = FeedServer::start(StatusCode::OK, "<html>maintenance</html>").await;
    let client = FeedClient::new(&server.base_url);
    assert!(client.fetch(RangeSelector::Week).await.is_empty());
    assert!(matches!(
        client.try_fetch(RangeSelector::Week).await,
        Err(FetchFailure::Json(_))
    ));
}

#[tokio::test]
async fn features_not_a_list_returns_empty() {
    let server = FeedServer::start(StatusCode::OK, r#"{"type":"FeatureCollection","features":null}"#).await;
    let client = FeedClient::new(&server.base_url);
    assert!(client.fetch(RangeSelector::Hour).await.is_empty());
    assert!(matches!(
        client.try_fetch(RangeSelector::Hour).await,
        Err(FetchFailure::Schema(_))
    ));
}
