//! Transparent forward proxy with per-host circuit breakers.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use clap::Parser;

use proxy_gateway::config::{TlsConfig, UpstreamConfig};
use proxy_gateway::observability::{logging, metrics};
use proxy_gateway::resilience::BreakerConfig;
use proxy_gateway::{ForwardProxy, HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "forward-proxy")]
#[command(about = "Forward proxy that fails fast on unhealthy hosts", long_about = None)]
struct Cli {
    /// Port for the proxy server to listen on
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Path to TLS certificate
    #[arg(long)]
    cert_file: Option<String>,

    /// Path to TLS private key
    #[arg(long)]
    key_file: Option<String>,

    /// Disable info logs
    #[arg(short, long)]
    quiet: bool,

    /// Consecutive failures before a host's circuit opens
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    failure_threshold: u32,

    /// Seconds an open circuit waits before letting probes through
    #[arg(long, default_value_t = 30)]
    reset_timeout_secs: u64,

    /// Prometheus scrape endpoint (e.g. 127.0.0.1:9090)
    #[arg(long)]
    metrics_address: Option<SocketAddr>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.quiet);

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "forward-proxy failed");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(addr) = cli.metrics_address {
        metrics::init_metrics(addr);
    }

    let breaker = BreakerConfig {
        failure_threshold: cli.failure_threshold,
        reset_timeout: Duration::from_secs(cli.reset_timeout_secs),
    };
    let proxy = Arc::new(ForwardProxy::new(breaker, &UpstreamConfig::default())?);

    let tls = TlsConfig::new(
        cli.cert_file.unwrap_or_default(),
        cli.key_file.unwrap_or_default(),
    );
    let tls = tls.is_complete().then_some(&tls);

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    HttpServer::forward(proxy)
        .serve(addr, tls, shutdown.subscribe())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
