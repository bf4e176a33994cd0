//! Route tree server
//!
//! Serves the todo API through the route tree.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!     Client Request     │  ┌─────────┐    ┌────────────┐               │
//!     ───────────────────┼─▶│  http   │───▶│  routing   │               │
//!                        │  │ server  │    │   tree     │               │
//!                        │  └─────────┘    └─────┬──────┘               │
//!                        │                       │ exact match          │
//!     Client Response    │  ┌─────────┐    ┌─────▼──────┐               │
//!     ◀──────────────────┼──│ 404 if  │◀───│  handler   │               │
//!                        │  │unhandled│    │ (+ params) │               │
//!                        │  └─────────┘    └────────────┘               │
//!                        │                                              │
//!                        │  config · observability · lifecycle          │
//!                        └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use route_tree::config::{apply_overrides, load_config, ConfigOverrides, ServerConfig};
use route_tree::http::HttpServer;
use route_tree::lifecycle::Shutdown;
use route_tree::observability::{logging, metrics};
use route_tree::todos::{self, TodoStore};

#[derive(Parser)]
#[command(name = "route-tree")]
#[command(about = "Todo API served by a tree router", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override `observability.log_level`.
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    let config = apply_overrides(
        config,
        ConfigOverrides {
            bind_address: cli.bind,
            log_level: cli.log_level,
        },
    )?;

    logging::init_logging(&config.observability.log_level);

    tracing::info!("route-tree v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        max_body_bytes = config.limits.max_body_bytes,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, todos::routes(TodoStore::new()))?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
