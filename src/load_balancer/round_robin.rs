//! Round-robin load balancing strategy.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use crate::load_balancer::{LoadBalancer, backend::Backend};

/// Round-robin selector.
/// Stores an internal counter to rotate through backends.
///
/// Every attempt advances the shared counter, so skipping an unready
/// backend also moves the rotation forward for concurrent callers.
#[derive(Debug, Default)]
pub struct RoundRobin {
    counter: AtomicUsize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LoadBalancer for RoundRobin {
    fn next_server(&self, backends: &[Arc<Backend>]) -> Option<Arc<Backend>> {
        let len = backends.len();

        // At most one full rotation per request.
        for _ in 0..len {
            let index = self.counter.fetch_add(1, Ordering::Relaxed) % len;
            let backend = &backends[index];
            if backend.is_ready() {
                return Some(backend.clone());
            }
        }
        None
    }
}
