//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout / stderr
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event (upstream, path, state)
//! - Per-request span with a generated id for correlation; never forwarded
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
