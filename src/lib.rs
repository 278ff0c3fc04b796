//! noui.bot agent-facing API library.

pub mod api;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod store;

pub use config::ApiConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use security::RateLimiter;
