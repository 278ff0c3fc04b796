//! Record storage.
//!
//! # Data Flow
//! ```text
//! handler (validated payload)
//!     → Store trait
//!         → memory.rs (in-process tables)
//!     → StoreStats for /api/v1/stats
//! ```
//!
//! # Design Decisions
//! - `Store` is the seam for an external SQL database; connection
//!   management lives behind it, not in handlers
//! - Schema creation (`init`) is explicit and idempotent
//! - Only aggregate counts ever leave the store through the API

pub mod memory;
pub mod types;

use chrono::{DateTime, Utc};

pub use memory::MemoryStore;
pub use types::{
    ApplicationRecord, FeedbackRecord, StoreError, StoreResult, StoreStats, TableCounts,
    WaitlistEntry, WaitlistOutcome,
};

/// Tables behind the submission endpoints.
pub trait Store: Send + Sync {
    /// Create the tables if they do not exist.
    fn init(&self) -> StoreResult<()>;

    fn is_initialized(&self) -> bool;

    /// Insert an already-normalized email. Duplicates are not an error.
    fn add_to_waitlist(&self, email: &str, source: &str) -> StoreResult<WaitlistOutcome>;

    fn insert_feedback(&self, record: FeedbackRecord) -> StoreResult<()>;

    fn insert_application(&self, record: ApplicationRecord) -> StoreResult<()>;

    /// Totals plus rows created after `since`.
    fn stats(&self, since: DateTime<Utc>) -> StoreResult<StoreStats>;
}
