//! Lazily populated breaker map for pass-through traffic.
//!
//! # Responsibilities
//! - Hand out one `CircuitBreaker` per destination host
//! - Create breakers on first sight of a host, at most once per host
//!
//! # Design Decisions
//! - Owned by the forward proxy, not a process global
//! - Insertion holds the shard lock for the key, so concurrent first requests
//!   to the same host agree on a single breaker (first writer wins)
//! - Breakers are shared via `Arc`; once handed out they are used without any
//!   registry-level locking

use std::sync::Arc;
use dashmap::DashMap;

use crate::resilience::circuit_breaker::{BreakerConfig, CircuitBreaker};

/// Host → breaker map.
#[derive(Debug)]
pub struct BreakerRegistry {
    config: BreakerConfig,
    breakers: DashMap<String, Arc<CircuitBreaker>>,
}

impl BreakerRegistry {
    /// Create an empty registry. Every breaker it creates uses `config`.
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            config,
            breakers: DashMap::new(),
        }
    }

    /// Get the breaker for `host`, creating it if this is the first request to it.
    pub fn get_or_create(&self, host: &str) -> Arc<CircuitBreaker> {
        if let Some(existing) = self.breakers.get(host) {
            return existing.clone();
        }

        self.breakers
            .entry(host.to_string())
            .or_insert_with(|| {
                tracing::info!(host = %host, "Created new circuit breaker");
                Arc::new(CircuitBreaker::new(self.config))
            })
            .clone()
    }

    /// Look up a breaker without creating one.
    pub fn get(&self, host: &str) -> Option<Arc<CircuitBreaker>> {
        self.breakers.get(host).map(|b| b.clone())
    }

    /// Number of hosts seen so far.
    pub fn len(&self) -> usize {
        self.breakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breakers.is_empty()
    }
}
