//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (YAML/JSON/TOML)
//!     → loader.rs (read, pick format by extension, deserialize)
//!     → validation.rs (semantic checks, every error reported)
//!     → GatewayConfig (validated, immutable)
//!     → routing groups and breakers built once at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields besides `services` have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Any load or validation error is fatal at startup

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, default_config_path, ConfigError, ConfigFormat};
pub use schema::GatewayConfig;
pub use schema::TlsConfig;
pub use schema::ServiceConfig;
pub use schema::{BreakerSettings, ObservabilityConfig, UpstreamConfig};
pub use validation::{validate_config, ValidationError};
