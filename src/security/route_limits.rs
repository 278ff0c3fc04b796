//! Static per-route request ceilings.

use std::collections::HashMap;

use crate::config::RateLimitConfig;

/// Maps an exact request path to its requests-per-window ceiling.
///
/// Lookups are exact: `/api/v1` does not cover `/api/v1/feedback`. Paths
/// without an entry fall back to the default ceiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteLimitTable {
    routes: HashMap<String, u32>,
    default_limit: u32,
}

impl RouteLimitTable {
    pub fn new(default_limit: u32) -> Self {
        Self {
            routes: HashMap::new(),
            default_limit,
        }
    }

    /// Builder-style insertion of a route ceiling.
    pub fn with_route(mut self, path: impl Into<String>, limit: u32) -> Self {
        self.routes.insert(path.into(), limit);
        self
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self {
            routes: config
                .routes
                .iter()
                .map(|(path, limit)| (path.clone(), *limit))
                .collect(),
            default_limit: config.default_limit,
        }
    }

    /// Ceiling for `path`, or the default when the path is not listed.
    pub fn limit_for(&self, path: &str) -> u32 {
        self.routes
            .get(path)
            .copied()
            .unwrap_or(self.default_limit)
    }

    pub fn default_limit(&self) -> u32 {
        self.default_limit
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for RouteLimitTable {
    fn default() -> Self {
        Self::from_config(&RateLimitConfig::default())
    }
}
