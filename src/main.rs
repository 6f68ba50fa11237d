//! Analytics API proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌────────────────────────────────────────────────┐
//!                          │                ANALYTICS PROXY                 │
//!                          │                                                │
//!     Client Request       │  ┌─────────┐    ┌───────────┐    ┌──────────┐  │
//!     ─────────────────────┼─▶│  http   │───▶│  routing  │───▶│  client  │──┼──▶ Analytics
//!                          │  │ server  │    │ (resolve) │    │ ApiClient│  │    API
//!     Client Response      │  │         │◀───│   Query   │◀───│          │◀─┼───
//!     ◀────────────────────┼──│response │    └───────────┘    └──────────┘  │
//!                          │  └─────────┘                                   │
//!                          │                                                │
//!                          │  ┌──────────────────────────────────────────┐  │
//!                          │  │          Cross-Cutting Concerns          │  │
//!                          │  │  config · observability · lifecycle      │  │
//!                          │  └──────────────────────────────────────────┘  │
//!                          └────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use analytics_proxy::client::{AnalyticsApi, ApiClient};
use analytics_proxy::config::{load_config, load_from_env};
use analytics_proxy::http::HttpServer;
use analytics_proxy::lifecycle::Shutdown;
use analytics_proxy::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "analytics-proxy")]
#[command(about = "HTTP proxy for the analytics management API", long_about = None)]
struct Cli {
    /// TOML config file. Without it, defaults plus UMAMI_API_* variables are used.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => load_from_env()?,
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability)?;

    tracing::info!("analytics-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        prefix = %config.http.path_prefix,
        endpoint = %config.api.endpoint,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let client = ApiClient::new(
        config.api.clone(),
        Duration::from_secs(config.timeouts.upstream_secs),
    )?;
    let client: Arc<dyn AnalyticsApi> = Arc::new(client);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, client);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
