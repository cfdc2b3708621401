//! Path-routed, load-balancing reverse proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                              ┌──────────────────────────────────────────────────────┐
//!                              │                    REVERSE PROXY                      │
//!                              │                                                       │
//!     Client Request           │  ┌─────────┐    ┌─────────┐    ┌──────────────┐      │
//!     ─────────────────────────┼─▶│ server  │───▶│ reverse │───▶│   routing    │      │
//!                              │  │(axum)   │    │ handler │    │ longest pfx  │      │
//!                              │  └─────────┘    └─────────┘    └──────┬───────┘      │
//!                              │                                       │               │
//!                              │                                       ▼               │
//!                              │                               ┌──────────────┐       │
//!                              │                               │load_balancer │       │
//!                              │                               │ round robin  │       │
//!                              │                               │ + breakers   │       │
//!                              │                               └──────┬───────┘       │
//!                              │                                       │               │
//!                              │                                       ▼               │
//!     Client Response          │  ┌─────────┐                   ┌──────────────┐      │
//!     ◀────────────────────────┼──│response │◀──────────────────│   upstream   │◀─────┼──── Backend
//!                              │  │ relay   │  classify, record │    relay     │      │     Server
//!                              │  └─────────┘                   └──────────────┘      │
//!                              └──────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use clap::Parser;

use proxy_gateway::config::{default_config_path, load_config};
use proxy_gateway::observability::{logging, metrics};
use proxy_gateway::{HttpServer, ReverseProxy, Shutdown};

#[derive(Parser)]
#[command(name = "reverse-proxy")]
#[command(about = "Path-routed reverse proxy with per-instance circuit breakers", long_about = None)]
struct Cli {
    /// Path to the configuration file (default: config.yaml beside the executable)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Disable info logs
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.quiet);

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "reverse-proxy failed");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = load_config(&config_path)?;

    tracing::info!(
        path = %config_path.display(),
        services = config.services.len(),
        failure_threshold = config.breaker.failure_threshold,
        reset_timeout_secs = config.breaker.reset_timeout_secs,
        "Configuration loaded"
    );

    if let Some(addr) = &config.observability.metrics_address {
        metrics::init_metrics(addr.parse()?);
    }

    let proxy = Arc::new(ReverseProxy::from_config(&config)?);
    let port: u16 = config.port.parse()?;
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    HttpServer::reverse(proxy)
        .serve(addr, config.tls(), shutdown.subscribe())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
