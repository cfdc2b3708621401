//! HTTP gateway with per-backend circuit breakers.
//!
//! Two modes share one forwarding core:
//! - reverse proxy: path-prefix routing, round robin over instances whose
//!   breaker is ready
//! - forward proxy: transparent pass-through, one breaker per destination host

pub mod config;
pub mod http;
pub mod net;
pub mod routing;
pub mod load_balancer;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::schema::GatewayConfig;
pub use http::{ForwardProxy, HttpServer, ReverseProxy};
pub use lifecycle::Shutdown;
