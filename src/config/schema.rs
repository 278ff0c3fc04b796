//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the API.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the API server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ApiConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request hardening.
    pub security: SecurityConfig,

    /// Per-route rate limiting.
    pub rate_limit: RateLimitConfig,

    /// Public identity of the site (version marker, doc links).
    pub site: SiteConfig,

    /// Record store settings.
    pub store: StoreConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Attach nosniff / frame-deny / HSTS to every response.
    pub enable_headers: bool,
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 64 * 1024,
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Only paths starting with this prefix are limited.
    pub api_prefix: String,

    /// Fixed window length in seconds.
    pub window_secs: u64,

    /// Ceiling for API paths without an explicit entry.
    pub default_limit: u32,

    /// Exact path -> requests per window.
    pub routes: BTreeMap<String, u32>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        let routes = [
            ("/api/v1/waitlist", 10),
            ("/api/v1/feedback", 30),
            ("/api/v1/apply", 10),
            ("/api/v1/stats", 60),
            ("/api/v1/services", 60),
            ("/api/v1/health", 120),
            ("/api/v1/status", 60),
            ("/api/v1", 100),
        ]
        .into_iter()
        .map(|(path, limit)| (path.to_string(), limit))
        .collect();

        Self {
            enabled: true,
            api_prefix: "/api/".to_string(),
            window_secs: 60,
            default_limit: 100,
            routes,
        }
    }
}

/// Public identity of the site, echoed in headers and discovery documents.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
    /// Value of the `X-Noui-Version` marker.
    pub version: String,
    pub homepage: String,
    pub base_url: String,
    pub docs_url: String,
    pub rate_limit_docs_url: String,
    pub discovery_url: String,
    pub openapi_url: String,
    /// RFC 3339 timestamp.
    pub launch_date: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "noui.bot".to_string(),
            version: "0.2.0".to_string(),
            homepage: "https://noui.bot".to_string(),
            base_url: "https://noui.bot/api/v1".to_string(),
            docs_url: "https://noui.bot/docs".to_string(),
            rate_limit_docs_url: "https://noui.bot/docs#rate-limits".to_string(),
            discovery_url: "https://noui.bot/.well-known/agents.json".to_string(),
            openapi_url: "https://noui.bot/api/openapi.json".to_string(),
            launch_date: "2026-02-19T00:00:00Z".to_string(),
        }
    }
}

/// Record store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Create tables at startup instead of waiting for `POST /api/v1/init`.
    pub auto_init: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { auto_init: true }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Expose a Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Address for the Prometheus exporter.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
