//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to backend:
//!     → circuit_breaker.rs (ready? otherwise fail fast with 503)
//!     → forward once, no retry
//!     → circuit_breaker.rs (record success / failure from the outcome)
//!
//! Pass-through traffic:
//!     → registry.rs (breaker for the target host, created on first use)
//! ```
//!
//! # Design Decisions
//! - One breaker per backend; one misbehaving backend never gates another
//! - Breaker operations never block and never touch the network
//! - A single failed attempt per request is final (no retry, no backoff)

pub mod circuit_breaker;
pub mod registry;

pub use circuit_breaker::{BreakerConfig, BreakerState, CircuitBreaker};
pub use registry::BreakerRegistry;
