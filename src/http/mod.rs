//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, per-request span)
//!     → reverse.rs: route lookup → instance selection (breaker-gated)
//!       forward.rs: target host from the request URL → per-host breaker
//!     → upstream.rs (forward once, classify, update breaker, relay)
//!     → response.rs (plain-text 503/404/400/500 when nothing is relayed)
//!     → Send to client
//! ```

pub mod forward;
pub mod response;
pub mod reverse;
pub mod server;
pub mod upstream;

pub use forward::ForwardProxy;
pub use reverse::ReverseProxy;
pub use server::{HttpServer, ServerError};
