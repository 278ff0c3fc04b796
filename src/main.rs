//! noui.bot API server.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                  noui-api                    │
//!                         │                                              │
//!     Client Request      │  ┌──────────┐   ┌────────────┐   ┌────────┐  │
//!     ────────────────────┼─▶│ request  │──▶│ API gate   │──▶│  api   │  │
//!                         │  │ id/trace │   │ rate limit │   │handlers│  │
//!                         │  └──────────┘   └─────┬──────┘   └───┬────┘  │
//!                         │                       │ 429          │       │
//!     Client Response     │  ┌──────────┐         │          ┌───▼────┐  │
//!     ◀───────────────────┼──│ security │◀────────┴──────────│ store  │  │
//!                         │  │ headers  │                    └────────┘  │
//!                         │  └──────────┘                                │
//!                         │                                              │
//!                         │  config (+ hot reload) · observability ·     │
//!                         │  lifecycle (signals, graceful shutdown)      │
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use noui_api::config::{load_config, ApiConfig, ConfigWatcher};
use noui_api::observability::{logging, metrics};
use noui_api::{HttpServer, Shutdown};

#[derive(Parser, Debug)]
#[command(name = "noui-api")]
#[command(about = "Agent-first API for noui.bot", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Reload route limits when the config file changes.
    #[arg(long, requires = "config")]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    logging::init();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "noui-api starting");

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ApiConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        rate_limit_enabled = config.rate_limit.enabled,
        window_secs = config.rate_limit.window_secs,
        routes = config.rate_limit.routes.len(),
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

    // The watcher must outlive the server for updates to keep flowing.
    let (_watcher, limit_updates) = match (&args.config, args.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path, config.rate_limit.clone());
            (Some(watcher.run()?), updates)
        }
        _ => (None, mpsc::unbounded_channel().1),
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config);
    server.run(listener, limit_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
