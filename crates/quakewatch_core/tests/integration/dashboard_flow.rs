//! End-to-end: fetch -> filter -> aggregate -> page, through the blocking facade and the cache.

use crate::common::feed_server::FeedServer;
use crate::common::ALL_DAY_FEED;
use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use quakewatch_core::display::{headline, latest_event};
use quakewatch_core::feed::parse_feed;
use quakewatch_core::{
    apply_filter, compute_aggregates, magnitude_label, paginate, EventFilter, RangeSelector,
    Snapshot,
};
use std::time::Duration;

#[test]
fn aggregates_over_recorded_feed() {
    let events = parse_feed(ALL_DAY_FEED).expect("fixture parses");
    assert_eq!(events.len(), 6);

    let agg = compute_aggregates(&events);
    assert_eq!(agg.magnitude_histogram, [1, 2, 1, 1]);
    assert_eq!(agg.depth_histogram, [3, 1, 2]);
    let with_magnitude = events.iter().filter(|e| e.magnitude.is_some()).count() as u64;
    assert_eq!(agg.magnitude_histogram.iter().sum::<u64>(), with_magnitude);
    assert_eq!(agg.depth_histogram.iter().sum::<u64>(), events.len() as u64);

    assert_eq!((agg.hourly[2].count, agg.hourly[2].avg_magnitude), (2, 2.0));
    assert_eq!((agg.hourly[14].count, agg.hourly[14].avg_magnitude), (2, 5.0));
    assert_eq!(agg.hourly[17].avg_magnitude, 6.0);
    assert_eq!(agg.hourly.iter().map(|b| b.count).sum::<u64>(), 6);

    assert_eq!(agg.summary.count, 6);
    assert_eq!(agg.summary.max_magnitude, 6.0);
    assert_eq!(agg.summary.avg_magnitude, "3.50");
    assert_eq!(agg.summary.intensity, 60.0);
}

#[test]
fn filtered_view_and_label() {
    let events = parse_feed(ALL_DAY_FEED).expect("fixture parses");

    let exact = apply_filter(&events, &EventFilter::magnitude(Some(3.0), Some(3.0)));
    assert_eq!(exact.len(), 1);
    assert_eq!(exact[0].id.as_str(), "ci40600002");

    let strong = apply_filter(&events, &EventFilter::magnitude(Some(4.5), None));
    assert_eq!(magnitude_label(Some(4.5), None), "4.5+");
    let agg = compute_aggregates(&strong);
    assert_eq!(agg.summary.count, 2);
    assert_eq!(agg.magnitude_histogram, [0, 0, 1, 1]);

    let page = paginate(&strong, 5, 10);
    assert_eq!((page.page, page.total_pages, page.items.len()), (1, 1, 2));

    let latest = latest_event(&events).expect("latest");
    assert_eq!(latest.id.as_str(), "hv74000006");
    assert!(headline(latest).contains("magnitude 2.5 occurred near 5 km E of Pahala, Hawaii"));
}

/// Facade state is process-wide, so the whole flow runs in one test.
#[test]
fn facade_refresh_polling_and_cache() {
    let rt = tokio::runtime::Runtime::new().expect("runtime");
    let good = rt.block_on(FeedServer::start(StatusCode::OK, ALL_DAY_FEED));
    let bad = rt.block_on(FeedServer::start(StatusCode::BAD_GATEWAY, ""));
    let dir = tempfile::tempdir().expect("tempdir");

    quakewatch_core::init_storage(dir.path().to_string_lossy().into_owned()).expect("init_storage");
    assert!(quakewatch_core::load_cached_events(RangeSelector::Day).is_empty());

    quakewatch_core::set_feed_base_url(good.base_url.clone());
    let live = quakewatch_core::refresh(RangeSelector::Day).expect("not in flight");
    assert_eq!(live.len(), 6);
    assert_eq!(quakewatch_core::load_cached_events(RangeSelector::Day), live);

    // Upstream outage: empty live result, cached list kept for first paint.
    quakewatch_core::set_feed_base_url(bad.base_url.clone());
    assert!(quakewatch_core::fetch_events(RangeSelector::Day).is_empty());
    assert!(quakewatch_core::refresh(RangeSelector::Day).expect("not in flight").is_empty());
    assert_eq!(quakewatch_core::load_cached_events(RangeSelector::Day).len(), 6);

    let (agg, page) = quakewatch_core::filter_and_page(&live, &EventFilter::default(), 1, 4);
    assert_eq!(agg.summary.count, 6);
    assert_eq!((page.items.len(), page.total_pages), (4, 2));

    let logs = quakewatch_core::drain_rust_logs();
    assert!(logs.iter().any(|l| l.contains("fetch range=day failed")));

    // Facade poller: each snapshot reaches the cache before the callback sees it.
    quakewatch_core::set_feed_base_url(good.base_url.clone());
    assert!(quakewatch_core::load_cached_events(RangeSelector::Week).is_empty());
    let (tx, rx) = std::sync::mpsc::channel::<Snapshot>();
    quakewatch_core::start_polling(RangeSelector::Week, Duration::from_millis(50), move |snapshot| {
        let _ = tx.send(snapshot);
    });
    let snapshot = rx.recv_timeout(Duration::from_secs(5)).expect("snapshot in time");
    assert_eq!(snapshot.range, RangeSelector::Week);
    assert_eq!(snapshot.events.len(), 6);
    assert!(quakewatch_core::is_polling());
    assert_eq!(quakewatch_core::load_cached_events(RangeSelector::Week), snapshot.events);
    assert!(good.paths().iter().any(|p| p.ends_with("/summary/all_week.geojson")));

    quakewatch_core::stop_polling();
    assert!(!quakewatch_core::is_polling());
    while rx.try_recv().is_ok() {}
    std::thread::sleep(Duration::from_millis(200));
    assert!(rx.try_recv().is_err(), "no snapshot after stop_polling");
}
