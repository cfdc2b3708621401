//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → router.rs (route lookup, longest prefix first)
//!     → matcher.rs (segment-aware prefix match, prefix stripping)
//!     → Return: matched ServiceGroup + upstream path, or NoMatch
//!
//! Route Compilation (at startup):
//!     ServiceGroup[]
//!     → Normalise prefixes
//!     → Sort by prefix length
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route
//! - Most specific prefix wins; `/` is the catch-all

pub mod matcher;
pub mod router;

pub use router::{Route, RouteMatch, RouteTable};
