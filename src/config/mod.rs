//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ApiConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//!
//! On file change (--watch):
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → watcher.rs builds a RouteLimitTable if the ceilings changed
//!     → server swaps the table into the rate limiter
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; only route ceilings are hot-swapped
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use watcher::ConfigWatcher;
pub use schema::{
    ApiConfig, ListenerConfig, ObservabilityConfig, RateLimitConfig, SecurityConfig, SiteConfig,
    StoreConfig, TimeoutConfig,
};
