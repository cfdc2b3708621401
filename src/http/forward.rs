//! Transparent forward proxy.
//!
//! # Responsibilities
//! - Take the destination from the request's own absolute target URL
//! - Gate each destination host with its own lazily created breaker
//! - Forward once and relay the result
//!
//! # Design Decisions
//! - A destination is a group of exactly one instance; no load balancing
//! - Requests without an absolute `http`/`https` target are rejected with 400
//!   and never touch a breaker

use std::net::SocketAddr;
use std::time::Instant;
use axum::{
    body::Body,
    http::{uri::Authority, Request},
    response::Response,
};
use url::Url;

use crate::config::UpstreamConfig;
use crate::http::server::ServerError;
use crate::http::{response, upstream};
use crate::observability::metrics;
use crate::resilience::{BreakerConfig, BreakerRegistry};

const MODE: &str = "forward";

/// Forward proxy state shared by all request tasks.
#[derive(Debug)]
pub struct ForwardProxy {
    breakers: BreakerRegistry,
    client: reqwest::Client,
}

impl ForwardProxy {
    pub fn new(breaker: BreakerConfig, upstream: &UpstreamConfig) -> Result<Self, ServerError> {
        Ok(Self {
            breakers: BreakerRegistry::new(breaker),
            client: upstream::build_client(upstream)?,
        })
    }

    /// Per-host breakers created so far.
    pub fn breakers(&self) -> &BreakerRegistry {
        &self.breakers
    }

    /// Handle one inbound request. Never fails; errors become responses.
    pub async fn handle(&self, request: Request<Body>, remote: Option<SocketAddr>) -> Response {
        let start = Instant::now();
        let uri = request.uri().clone();
        match remote {
            Some(remote) => tracing::info!(method = %request.method(), uri = %uri, remote = %remote, "Proxying request"),
            None => tracing::info!(method = %request.method(), uri = %uri, "Proxying request"),
        }

        let (Some(scheme), Some(authority)) = (uri.scheme_str(), uri.authority()) else {
            tracing::warn!(uri = %uri, "Request target is not an absolute URL");
            metrics::record_request(MODE, 400, "none", start);
            return response::bad_request("Request target must be an absolute http or https URL");
        };
        if scheme != "http" && scheme != "https" {
            metrics::record_request(MODE, 400, "none", start);
            return response::bad_request("Request target must be an absolute http or https URL");
        }
        let host = breaker_key(authority);

        let target = match Url::parse(&uri.to_string()) {
            Ok(target) => target,
            Err(e) => {
                tracing::error!(uri = %uri, error = %e, "Failed to create outgoing request");
                metrics::record_request(MODE, 500, &host, start);
                return response::internal_error(&format!("Error creating request: {}", e));
            }
        };

        let breaker = self.breakers.get_or_create(&host);
        if !breaker.ready() {
            tracing::error!(uri = %uri, "Circuit breaker is open");
            metrics::record_request(MODE, 503, &host, start);
            return response::service_unavailable("Service is not available");
        }

        let (parts, body) = request.into_parts();
        match upstream::relay(&self.client, &breaker, &host, parts.method, target, parts.headers, body).await {
            Ok(response) => {
                metrics::record_request(MODE, response.status().as_u16(), &host, start);
                response
            }
            Err(e) => {
                tracing::error!(uri = %uri, error = %e, "Failed to send outgoing request");
                metrics::record_request(MODE, 503, &host, start);
                response::service_unavailable(&format!("Error sending request: {}", e))
            }
        }
    }
}

/// Breaker identity for a destination: `host[:port]`, never any userinfo.
fn breaker_key(authority: &Authority) -> String {
    match authority.port_u16() {
        Some(port) => format!("{}:{}", authority.host(), port),
        None => authority.host().to_string(),
    }
}
