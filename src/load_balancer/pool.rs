//! Routing group management.
//!
//! # Responsibilities
//! - Hold the ordered instances configured for one path prefix
//! - Apply the load balancing algorithm to pick a ready instance

use std::sync::Arc;
use url::Url;

use crate::load_balancer::{
    LoadBalancer,
    backend::Backend,
    round_robin::RoundRobin,
};
use crate::resilience::BreakerConfig;

/// Error building a routing group.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("No instance URL configured for service path: {0}")]
    NoInstances(String),
}

/// One path prefix and the backends that serve it.
#[derive(Debug)]
pub struct ServiceGroup {
    path: String,
    backends: Vec<Arc<Backend>>,
    balancer: Box<dyn LoadBalancer>,
}

impl ServiceGroup {
    /// Create a round-robin group. Each instance gets its own breaker.
    pub fn new(path: impl Into<String>, instances: Vec<Url>, breaker: BreakerConfig) -> Result<Self, PoolError> {
        let path = path.into();
        if instances.is_empty() {
            return Err(PoolError::NoInstances(path));
        }

        let backends = instances
            .into_iter()
            .map(|url| Arc::new(Backend::new(url, breaker)))
            .collect();

        Ok(Self {
            path,
            backends,
            balancer: Box::new(RoundRobin::new()),
        })
    }

    /// The configured path prefix.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn backends(&self) -> &[Arc<Backend>] {
        &self.backends
    }

    /// Pick the next instance whose breaker admits a request.
    pub fn next_healthy(&self) -> Option<Arc<Backend>> {
        let picked = self.balancer.next_server(&self.backends);
        if picked.is_none() {
            tracing::debug!(group = %self.path, backend_count = self.backends.len(), "No healthy backends found in group");
            for b in &self.backends {
                tracing::debug!(url = %b.url, state = %b.breaker.state(), "Backend status");
            }
        }
        picked
    }
}
