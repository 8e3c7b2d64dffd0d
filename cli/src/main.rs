use clap::Parser;
use quakewatch::{render_event, Args, Config, DashboardView, RunOptions, Source};
use quakewatch_core::{FeedClient, Poller, Snapshot, Storage};
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(config.log_json);

    let opts = RunOptions::resolve(Args::parse(), &config)?;
    info!("quakewatch starting: range={} feed={}", opts.range, opts.feed_url);

    let storage = opts.cache_dir.as_ref().and_then(|dir| match Storage::open(dir) {
        Ok(storage) => Some(storage),
        Err(e) => {
            warn!("Cache unavailable at {}: {}", dir.display(), e);
            None
        }
    });

    // Cached list first, so there's something on screen before the network answers.
    if let Some(storage) = &storage {
        match storage.load_snapshot(opts.range) {
            Ok(Some(snapshot)) => print_view(&opts, &snapshot, Source::Cached)?,
            Ok(None) => info!("No cached snapshot for range={}", opts.range),
            Err(e) => warn!("Cache read failed: {}", e),
        }
    }

    let client = FeedClient::new(opts.feed_url.clone());

    if !opts.watch {
        let events = client.fetch(opts.range).await;
        let snapshot = Snapshot::new(opts.range, events);
        remember(storage.as_ref(), &snapshot);
        print_view(&opts, &snapshot, Source::Live)?;
        return Ok(());
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut poller = Poller::spawn(client, opts.range, opts.interval, move |snapshot| {
        let _ = tx.send(snapshot);
    });
    info!("Watching range={} every {}s", opts.range, opts.interval.as_secs());

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            received = rx.recv() => {
                let Some(snapshot) = received else { break };
                remember(storage.as_ref(), &snapshot);
                print_view(&opts, &snapshot, Source::Live)?;
            }
            _ = &mut shutdown => {
                info!("Shutting down gracefully...");
                break;
            }
        }
    }
    poller.stop();

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "quakewatch=info,quakewatch_core=info".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn remember(storage: Option<&Storage>, snapshot: &Snapshot) {
    if let Some(storage) = storage {
        if let Err(e) = storage.store_live(snapshot.range, &snapshot.events) {
            warn!("Cache write failed: {}", e);
        }
    }
}

fn print_view(opts: &RunOptions, snapshot: &Snapshot, source: Source) -> anyhow::Result<()> {
    if let Some(id) = &opts.event {
        println!("{}", render_event(snapshot, id, opts.json)?);
        return Ok(());
    }
    let filter = opts.filter_at(chrono::Utc::now().timestamp_millis());
    let view = DashboardView::build(snapshot, source, &filter, opts.page, opts.page_size);
    if opts.json {
        println!("{}", view.to_json()?);
    } else {
        println!("{}", view.render_text());
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
