//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled routes
//! - Look up the most specific route for a request path
//! - Return matched route or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Routes kept sorted longest prefix first; first match wins
//! - O(n) path prefix scan (acceptable for typical route counts)
//! - Explicit NoMatch rather than silent default

use std::sync::Arc;

use crate::load_balancer::ServiceGroup;
use crate::routing::matcher::PathPrefixMatcher;

/// A compiled route: prefix matcher plus the group it forwards to.
#[derive(Debug)]
pub struct Route {
    pub matcher: PathPrefixMatcher,
    pub group: Arc<ServiceGroup>,
}

/// Result of a successful lookup.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub group: &'a Arc<ServiceGroup>,
    /// Request path with the route prefix removed (never empty).
    pub upstream_path: &'a str,
}

/// Longest-prefix route table.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Compile routes from routing groups.
    pub fn new(groups: Vec<Arc<ServiceGroup>>) -> Self {
        let mut routes: Vec<Route> = groups
            .into_iter()
            .map(|group| Route {
                matcher: PathPrefixMatcher::new(group.path()),
                group,
            })
            .collect();
        routes.sort_by(|a, b| b.matcher.prefix().len().cmp(&a.matcher.prefix().len()));
        Self { routes }
    }

    /// Find the most specific route for `path`.
    pub fn lookup<'a>(&'a self, path: &'a str) -> Option<RouteMatch<'a>> {
        self.routes
            .iter()
            .find(|route| route.matcher.matches(path))
            .map(|route| RouteMatch {
                group: &route.group,
                upstream_path: route.matcher.strip(path),
            })
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
