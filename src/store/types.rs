//! Record types and error definitions for the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Tables have not been created yet.
    #[error("store not initialized")]
    NotInitialized,

    /// A record with this id already exists.
    #[error("duplicate record id: {0}")]
    DuplicateId(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A waitlist signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    pub id: u64,
    /// Normalized (trimmed, lowercased) address.
    pub email: String,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

/// Result of a waitlist insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitlistOutcome {
    Added(WaitlistEntry),
    AlreadyListed,
}

/// Agent feedback: walls hit and services wanted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: String,
    pub agent_name: Option<String>,
    pub agent_url: Option<String>,
    pub contact: Option<String>,
    pub walls: Vec<String>,
    pub needs: Vec<String>,
    pub message: Option<String>,
    pub platform: Option<String>,
    pub use_case: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Builder application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: String,
    pub name: String,
    pub contact: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub skills: Vec<String>,
    pub projects: Vec<String>,
    pub agents: Vec<String>,
    pub interest: Option<String>,
    pub pitch: Option<String>,
    pub availability: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Row counts for the three tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub waitlist: usize,
    pub feedback: usize,
    pub applications: usize,
}

/// Aggregate counts, no PII.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub totals: TableCounts,
    /// Rows created strictly after the `since` cutoff.
    pub recent: TableCounts,
    /// Distinct non-null feedback platforms.
    pub unique_platforms: usize,
}
