//! In-process stand-in for the upstream feed: answers every path with a canned status/body.

use axum::http::{StatusCode, Uri};
use axum::Router;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

pub struct FeedServer {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    paths: Arc<Mutex<Vec<String>>>,
    _task: tokio::task::JoinHandle<()>,
}

impl FeedServer {
    /// Serve `body` with `status` for any path. Must be called inside a tokio runtime.
    pub async fn start(status: StatusCode, body: &str) -> Self {
        Self::start_delayed(status, body, Duration::ZERO).await
    }

    /// Like `start`, but each response is held back by `delay`.
    pub async fn start_delayed(status: StatusCode, body: &str, delay: Duration) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let paths = Arc::new(Mutex::new(Vec::new()));
        let body = body.to_string();
        let (h, p) = (hits.clone(), paths.clone());
        let app = Router::new().fallback(move |uri: Uri| {
            let (h, p, body) = (h.clone(), p.clone(), body.clone());
            async move {
                h.fetch_add(1, Ordering::SeqCst);
                p.lock().unwrap().push(uri.path().to_string());
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                (status, body)
            }
        });
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local_addr");
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });
        Self {
            base_url: format!("http://{addr}"),
            hits,
            paths,
            _task: task,
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}
