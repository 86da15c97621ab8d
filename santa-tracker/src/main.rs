use std::net::SocketAddr;
use std::process;

use santa_tracker::domain::Timestamp;
use santa_tracker::tracker::{Tracker, TrackerConfig};
use santa_tracker::web::{AppState, create_router};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Address served when `SANTA_ADDR` is unset.
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `SANTA_DEBUG` turns on debug output
/// for the tracker and the HTTP layer.
fn init_tracing() {
    let debug = std::env::var("SANTA_DEBUG")
        .map(|v| matches!(v.trim(), "1" | "true"))
        .unwrap_or(false);
    let default_directives = if debug {
        "santa_tracker=debug,tower_http=debug"
    } else {
        "santa_tracker=info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let config = TrackerConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(2);
    });

    let addr: SocketAddr = std::env::var("SANTA_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()
        .unwrap_or_else(|e| {
            eprintln!("Error: invalid SANTA_ADDR: {e}");
            process::exit(2);
        });

    // Start serving even without a route; it can be posted or reloaded later
    let mut tracker = Tracker::from_config(&config);
    match tracker.load_file(&config.data_file, Timestamp::now()) {
        Ok(summary) => info!(count = summary.count, year = summary.year, "loaded itinerary"),
        Err(e) => warn!(error = %e, "starting without an itinerary"),
    }

    info!(
        data_file = %config.data_file.display(),
        simulated = config.override_start.is_some(),
        update_interval_secs = config.update_interval().num_seconds(),
        "tracker configured"
    );

    let state = AppState::new(tracker, config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap_or_else(|e| {
        eprintln!("Error: cannot bind {addr}: {e}");
        process::exit(1);
    });
    info!("Santa tracker listening on http://{addr}");

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Error: server failed: {e}");
        process::exit(1);
    }
}
