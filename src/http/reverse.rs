//! Path-routed, load-balancing reverse proxy.
//!
//! # Responsibilities
//! - Build routing groups and their breakers from configuration
//! - Resolve a request to the most specific group
//! - Pick a ready instance, forward once, relay the result
//!
//! # Design Decisions
//! - No ready instance → 503 without any network call
//! - Transport failure → breaker failure + 503, never retried elsewhere

use std::sync::Arc;
use std::time::Instant;
use axum::{body::Body, http::Request, response::Response};

use crate::config::GatewayConfig;
use crate::http::server::ServerError;
use crate::http::{response, upstream};
use crate::load_balancer::ServiceGroup;
use crate::observability::metrics;
use crate::routing::RouteTable;

const MODE: &str = "reverse";

/// Reverse proxy state shared by all request tasks.
#[derive(Debug)]
pub struct ReverseProxy {
    routes: RouteTable,
    client: reqwest::Client,
}

impl ReverseProxy {
    /// Build routing groups from configuration. Each instance gets its own breaker.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, ServerError> {
        let breaker = config.breaker.to_breaker_config();

        let mut groups = Vec::with_capacity(config.services.len());
        for service in &config.services {
            let instances = service.instance_urls()?;
            let group = ServiceGroup::new(service.path.as_str(), instances, breaker)?;
            tracing::info!(
                path = %group.path(),
                instances = group.backends().len(),
                "Configured service"
            );
            groups.push(Arc::new(group));
        }

        let client = upstream::build_client(&config.upstream)?;
        Ok(Self::new(RouteTable::new(groups), client))
    }

    pub fn new(routes: RouteTable, client: reqwest::Client) -> Self {
        Self { routes, client }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Handle one inbound request. Never fails; errors become responses.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        let start = Instant::now();
        let path = request.uri().path().to_string();

        let Some(route) = self.routes.lookup(&path) else {
            tracing::warn!(path = %path, "No route matched");
            metrics::record_request(MODE, 404, "none", start);
            return response::not_found();
        };
        let group = route.group.clone();
        let upstream_path = route.upstream_path.to_string();

        let Some(backend) = group.next_healthy() else {
            tracing::error!(service = %group.path(), "All backends for service are down");
            metrics::record_request(MODE, 503, "none", start);
            return response::service_unavailable("Service unavailable");
        };

        let upstream_id = backend.authority();
        let target = upstream::instance_target(&backend.url, &upstream_path, request.uri().query());
        tracing::info!(service = %group.path(), instance = %backend.url, "Forwarding request");

        let (parts, body) = request.into_parts();
        match upstream::relay(
            &self.client,
            &backend.breaker,
            &upstream_id,
            parts.method,
            target.clone(),
            parts.headers,
            body,
        )
        .await
        {
            Ok(response) => {
                metrics::record_request(MODE, response.status().as_u16(), &upstream_id, start);
                response
            }
            Err(e) => {
                tracing::error!(target_url = %target, error = %e, "Error calling upstream");
                metrics::record_request(MODE, 503, &upstream_id, start);
                response::service_unavailable("Service is not available")
            }
        }
    }
}
