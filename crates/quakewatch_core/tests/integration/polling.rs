//! Poller: immediate first fetch, fixed interval afterwards, nothing delivered after stop.

use crate::common::feed_server::FeedServer;
use crate::common::ALL_DAY_FEED;
use axum::http::StatusCode;
use quakewatch_core::{FeedClient, Poller, RangeSelector, Snapshot};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::test]
async fn delivers_snapshots_on_interval_until_stopped() {
    let server = FeedServer::start(StatusCode::OK, ALL_DAY_FEED).await;
    let (tx, mut rx) = mpsc::unbounded_channel::<Snapshot>();
    let mut poller = Poller::spawn(
        FeedClient::new(&server.base_url),
        RangeSelector::Day,
        Duration::from_millis(50),
        move |s| {
            let _ = tx.send(s);
        },
    );

    for _ in 0..2 {
        let snap = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("snapshot in time")
            .expect("channel open");
        assert_eq!(snap.range, RangeSelector::Day);
        assert_eq!(snap.events.len(), 6);
    }

    poller.stop();
    assert!(!poller.is_alive());
    tokio::time::sleep(Duration::from_millis(100)).await;
    while rx.try_recv().is_ok() {}
    let hits_after_stop = server.hits();

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(rx.try_recv().is_err(), "no snapshot after stop");
    assert_eq!(server.hits(), hits_after_stop, "no fetch after stop");
}

#[tokio::test]
async fn in_flight_response_is_discarded_after_stop() {
    let server =
        FeedServer::start_delayed(StatusCode::OK, ALL_DAY_FEED, Duration::from_millis(300)).await;
    let (tx, mut rx) = mpsc::unbounded_channel::<Snapshot>();
    let mut poller = Poller::spawn(
        FeedClient::new(&server.base_url),
        RangeSelector::Day,
        Duration::from_secs(60),
        move |s| {
            let _ = tx.send(s);
        },
    );

    // Let the first request reach the server, then tear down while it is still pending.
    tokio::time::sleep(Duration::from_millis(100)).await;
    poller.stop();
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(server.hits(), 1);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn failing_feed_still_delivers_empty_snapshots() {
    let server = FeedServer::start(StatusCode::INTERNAL_SERVER_ERROR, "boom").await;
    let (tx, mut rx) = mpsc::unbounded_channel::<Snapshot>();
    let _poller = Poller::spawn(
        FeedClient::new(&server.base_url),
        RangeSelector::Hour,
        Duration::from_secs(60),
        move |s| {
            let _ = tx.send(s);
        },
    );
    let snap = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("snapshot in time")
        .expect("channel open");
    assert!(snap.events.is_empty());
}

#[test]
fn stop_waits_for_a_delivery_already_running() {
    let rt = tokio::runtime::Runtime::new().expect("runtime");
    let server = rt.block_on(FeedServer::start(StatusCode::OK, ALL_DAY_FEED));
    let (entered_tx, entered_rx) = std::sync::mpsc::channel::<()>();
    let finished = Arc::new(AtomicUsize::new(0));
    let done = finished.clone();
    let mut poller = Poller::spawn_on(
        rt.handle(),
        FeedClient::new(&server.base_url),
        RangeSelector::Day,
        Duration::from_secs(60),
        move |_| {
            let _ = entered_tx.send(());
            std::thread::sleep(Duration::from_millis(200));
            done.fetch_add(1, Ordering::SeqCst);
        },
    );

    entered_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("delivery started");
    poller.stop();
    // The callback had finished by the time stop returned, and nothing follows it.
    assert_eq!(finished.load(Ordering::SeqCst), 1);
    assert!(!poller.is_alive());
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(finished.load(Ordering::SeqCst), 1);
}
