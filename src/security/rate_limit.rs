//! Fixed-window rate limiter keyed by client and route.
//!
//! # Algorithm
//! ```text
//! key = "{client}:{path}"
//! entry missing or now >= reset_at  → count = 0, reset_at = now + window
//! count += 1
//! allowed = count <= limit_for(path)
//! ```
//!
//! The count is bumped before the comparison, so the request that makes
//! `count == limit` is admitted and the next one is the first denial.
//! Denied requests still count. Each key's window starts on its own first
//! request; there is no global clock alignment.
//!
//! # Limitations
//! Entries are never evicted. Every distinct client/path pair seen stays in
//! the table for the life of the process. `tracked_keys` exposes the size.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use arc_swap::ArcSwap;
use dashmap::DashMap;

use crate::config::RateLimitConfig;
use crate::security::route_limits::RouteLimitTable;

/// Per-key counter state for the current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateWindow {
    /// Requests observed in this window, denied ones included.
    pub count: u32,
    /// Milliseconds since the Unix epoch at which the window resets.
    pub reset_at: u64,
}

/// Outcome of a single limiter check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Milliseconds since the Unix epoch.
    pub reset_at: u64,
}

impl RateDecision {
    /// Whole seconds until the window resets, rounded up.
    pub fn retry_after_secs(&self, now_ms: u64) -> u64 {
        self.reset_at.saturating_sub(now_ms).div_ceil(1000)
    }

    /// Reset time as Unix seconds, rounded up.
    pub fn reset_epoch_secs(&self) -> u64 {
        self.reset_at.div_ceil(1000)
    }
}

/// Process-wide rate limiter state.
///
/// Created once at startup and shared through an `Arc`. The window map is a
/// `DashMap`, so the lookup-reset-increment sequence for one key runs under
/// that key's shard lock and concurrent requests cannot both slip under the
/// ceiling.
pub struct RateLimiter {
    windows: DashMap<String, RateWindow>,
    limits: ArcSwap<RouteLimitTable>,
    window: Duration,
}

impl RateLimiter {
    pub fn new(limits: RouteLimitTable, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            limits: ArcSwap::from_pointee(limits),
            window,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(
            RouteLimitTable::from_config(config),
            Duration::from_secs(config.window_secs),
        )
    }

    /// Check and record a request against the wall clock.
    pub fn check(&self, client: &str, path: &str) -> RateDecision {
        self.check_at(client, path, now_millis())
    }

    /// Check and record a request at an explicit time (ms since epoch).
    pub fn check_at(&self, client: &str, path: &str, now_ms: u64) -> RateDecision {
        let limit = self.limits.load().limit_for(path);
        let window_ms = self.window.as_millis() as u64;

        let mut entry = self
            .windows
            .entry(format!("{}:{}", client, path))
            .or_insert(RateWindow {
                count: 0,
                reset_at: now_ms + window_ms,
            });

        if now_ms >= entry.reset_at {
            *entry = RateWindow {
                count: 0,
                reset_at: now_ms + window_ms,
            };
        }
        entry.count = entry.count.saturating_add(1);

        RateDecision {
            allowed: entry.count <= limit,
            limit,
            remaining: limit.saturating_sub(entry.count),
            reset_at: entry.reset_at,
        }
    }

    /// Current window for a key, if one has been recorded.
    pub fn window(&self, client: &str, path: &str) -> Option<RateWindow> {
        self.windows
            .get(&format!("{}:{}", client, path))
            .map(|w| *w.value())
    }

    /// Replace the route ceilings. Existing windows keep their counts.
    pub fn reload(&self, limits: RouteLimitTable) {
        self.limits.store(Arc::new(limits));
    }

    pub fn limits(&self) -> Arc<RouteLimitTable> {
        self.limits.load_full()
    }

    /// Number of client/path pairs currently held in memory.
    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::from_config(&RateLimitConfig::default())
    }
}

/// Wall clock in milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
