//! Backend abstraction.
//!
//! # Responsibilities
//! - Represent a single backend instance (scheme + host, optional base path)
//! - Own the instance's circuit breaker for its whole lifetime

use url::Url;

use crate::resilience::{BreakerConfig, CircuitBreaker};

/// A single backend instance.
#[derive(Debug)]
pub struct Backend {
    /// The instance URL as configured.
    pub url: Url,
    /// Breaker guarding this instance.
    pub breaker: CircuitBreaker,
}

impl Backend {
    /// Create a backend with a fresh, closed breaker.
    pub fn new(url: Url, breaker: BreakerConfig) -> Self {
        Self {
            url,
            breaker: CircuitBreaker::new(breaker),
        }
    }

    /// `host[:port]` of the instance, used as its identity in logs and metrics.
    pub fn authority(&self) -> String {
        match (self.url.host_str(), self.url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            _ => self.url.to_string(),
        }
    }

    /// Return true if the breaker currently admits a request.
    pub fn is_ready(&self) -> bool {
        self.breaker.ready()
    }
}
