//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Route warnings and errors to stderr, everything else to stdout
//! - Honour `RUST_LOG`, fall back to a crate-level default
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `--quiet` raises the default level to `warn` (info logs disabled)

use tracing_subscriber::{
    fmt::writer::MakeWriterExt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Default filter directive when `RUST_LOG` is not set.
pub fn default_directive(quiet: bool) -> &'static str {
    if quiet {
        "proxy_gateway=warn,tower_http=warn"
    } else {
        "proxy_gateway=info,tower_http=info"
    }
}

/// Install the global subscriber. Safe to call more than once; later calls are ignored.
pub fn init(quiet: bool) {
    let filter = if quiet {
        EnvFilter::new(default_directive(true))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive(false).into())
    };

    let writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .or_else(std::io::stdout);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
        .try_init();
}
