//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → limits.rs (reject oversized bodies)
//!     → rate_limit.rs (per-client, per-route fixed window)
//!         ceilings from route_limits.rs
//!     → Pass to route handlers
//! Outgoing response:
//!     → headers.rs (nosniff, frame deny, HSTS)
//! ```
//!
//! # Design Decisions
//! - Rate limiting is per-process traffic shaping, not access control
//! - Client identity comes from proxy headers and is spoofable
//! - Security headers are attached to every response

pub mod headers;
pub mod limits;
pub mod rate_limit;
pub mod route_limits;

pub use rate_limit::{RateDecision, RateLimiter, RateWindow};
pub use route_limits::RouteLimitTable;
