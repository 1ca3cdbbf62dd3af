//! Marketpulse - marketplace analytics from raw listing and login snapshots.
//!
//! # API Endpoints
//!
//! - `POST /analytics` - Compute the report for a posted snapshot
//! - `GET /health` - Health check
//!
//! # Configuration
//!
//! - `MARKETPULSE_PORT` - Listen port (default 3000)
//! - `MARKETPULSE_UTC_OFFSET_MINUTES` - Calendar offset for month/weekday/hour buckets (default 0)
//! - `MARKETPULSE_TOP_LISTINGS` - Size of the top-performing table (default 5)

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use marketpulse::api::{AppState, router};
use marketpulse::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing with environment filter
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("marketpulse=info".parse()?))
        .init();

    // Load configuration from environment
    let config = ServerConfig::from_env();

    info!(
        port = config.port,
        top_listings = config.analytics.top_listings,
        utc_offset = %config.analytics.utc_offset,
        "Starting Marketpulse server"
    );

    // Build router
    let app = router(AppState {
        config: config.analytics,
    });

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    info!(%addr, "Marketpulse is listening");

    axum::serve(listener, app).await?;

    Ok(())
}
