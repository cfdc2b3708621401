//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the proxy handler as catch-all
//! - Wire up middleware (per-request tracing span)
//! - Bind server to listener, plain or TLS
//! - Stop accepting and drain on shutdown

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    response::Response,
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::{TlsConfig, ValidationError};
use crate::http::forward::ForwardProxy;
use crate::http::reverse::ReverseProxy;
use crate::lifecycle::shutdown;
use crate::load_balancer::PoolError;
use crate::net::{load_tls_config, TlsError};

/// How long TLS connections get to finish in-flight requests on shutdown.
const TLS_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Startup and serving errors. All of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ValidationError),

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error("Could not build upstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error(transparent)]
    Tls(#[from] TlsError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP server for either proxy mode.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Serve the path-routed reverse proxy.
    pub fn reverse(proxy: Arc<ReverseProxy>) -> Self {
        let router = Router::new().fallback(reverse_handler).with_state(proxy);
        Self { router: Self::with_layers(router) }
    }

    /// Serve the transparent forward proxy.
    pub fn forward(proxy: Arc<ForwardProxy>) -> Self {
        let router = Router::new().fallback(forward_handler).with_state(proxy);
        Self { router: Self::with_layers(router) }
    }

    fn with_layers(router: Router) -> Router {
        router.layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "request",
                id = %Uuid::new_v4(),
                method = %request.method(),
                uri = %request.uri()
            )
        }))
    }

    /// Bind `addr` and serve, over TLS when credentials are given.
    pub async fn serve(
        self,
        addr: SocketAddr,
        tls: Option<&TlsConfig>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        match tls {
            Some(tls) => {
                let rustls = load_tls_config(tls).await?;
                self.run_tls(addr, rustls, shutdown).await
            }
            None => {
                let listener = TcpListener::bind(addr)
                    .await
                    .map_err(|source| ServerError::Bind { addr, source })?;
                self.run(listener, shutdown).await
            }
        }
    }

    /// Run plain HTTP on an already bound listener.
    pub async fn run(self, listener: TcpListener, shutdown: broadcast::Receiver<()>) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Starting http server");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Bind `addr` and run HTTPS on it.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let listener = bind_std(addr)?;
        tracing::info!(address = %addr, "Starting https server");

        let handle = axum_server::Handle::new();
        let drain = handle.clone();
        tokio::spawn(async move {
            shutdown::wait(shutdown).await;
            drain.graceful_shutdown(Some(TLS_DRAIN_TIMEOUT));
        });

        axum_server::from_tcp_rustls(listener, tls)
            .handle(handle)
            .serve(self.router.into_make_service_with_connect_info::<SocketAddr>())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

/// Bind the std listener handed to axum-server.
fn bind_std(addr: SocketAddr) -> Result<std::net::TcpListener, ServerError> {
    std::net::TcpListener::bind(addr).map_err(|source| ServerError::Bind { addr, source })
}

async fn reverse_handler(State(proxy): State<Arc<ReverseProxy>>, request: Request<Body>) -> Response {
    proxy.handle(request).await
}

async fn forward_handler(
    State(proxy): State<Arc<ForwardProxy>>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    proxy.handle(request, Some(remote)).await
}
