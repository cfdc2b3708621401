//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Route matched → ServiceGroup identified
//!     → pool.rs (group's ordered backends)
//!     → round_robin.rs (rotate, skipping backends whose breaker is not ready)
//!     → backend.rs (instance URL + its breaker)
//!     → Return backend or None (all breakers open)
//! ```
//!
//! # Design Decisions
//! - Algorithm is stateless apart from its rotation counter
//! - Readiness comes from each backend's circuit breaker
//! - Bounded work: one full rotation at most per selection

pub mod backend;
pub mod pool;
pub mod round_robin;

use std::sync::Arc;

pub use backend::Backend;
pub use pool::{PoolError, ServiceGroup};
pub use round_robin::RoundRobin;

/// Backend selection strategy.
pub trait LoadBalancer: Send + Sync + std::fmt::Debug {
    /// Pick a ready backend, or None if none admits a request.
    fn next_server(&self, backends: &[Arc<Backend>]) -> Option<Arc<Backend>>;
}
