//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Startup
//!     → tls.rs (load PEM certificate + key when configured)
//!     → Hand off to HTTP layer (plain TCP or rustls acceptor)
//! ```
//!
//! # Design Decisions
//! - TLS is optional and handled transparently
//! - Missing or unreadable TLS material is a startup error

pub mod tls;

pub use tls::{load_tls_config, TlsError};
