//! In-process store backed by `RwLock`ed tables.
//!
//! Data lives as long as the process. Tables do not exist until `init`
//! runs, mirroring a database whose schema has not been created.

use std::collections::HashSet;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use crate::store::types::{
    ApplicationRecord, FeedbackRecord, StoreError, StoreResult, StoreStats, TableCounts,
    WaitlistEntry, WaitlistOutcome,
};
use crate::store::Store;

#[derive(Default)]
struct Tables {
    waitlist: Vec<WaitlistEntry>,
    waitlist_emails: HashSet<String>,
    next_waitlist_id: u64,
    feedback: Vec<FeedbackRecord>,
    applications: Vec<ApplicationRecord>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Option<Tables>>,
}

impl MemoryStore {
    /// Create a store with no tables. Call [`Store::init`] before use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with its tables already in place.
    pub fn initialized() -> Self {
        Self {
            tables: RwLock::new(Some(Tables::empty())),
        }
    }
}

impl Tables {
    fn empty() -> Self {
        Self {
            next_waitlist_id: 1,
            ..Self::default()
        }
    }
}

impl Store for MemoryStore {
    fn init(&self) -> StoreResult<()> {
        let mut tables = self.tables.write().expect("store lock poisoned");
        if tables.is_none() {
            *tables = Some(Tables::empty());
        }
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.tables.read().expect("store lock poisoned").is_some()
    }

    fn add_to_waitlist(&self, email: &str, source: &str) -> StoreResult<WaitlistOutcome> {
        let mut guard = self.tables.write().expect("store lock poisoned");
        let tables = guard.as_mut().ok_or(StoreError::NotInitialized)?;

        if !tables.waitlist_emails.insert(email.to_string()) {
            return Ok(WaitlistOutcome::AlreadyListed);
        }

        let entry = WaitlistEntry {
            id: tables.next_waitlist_id,
            email: email.to_string(),
            source: source.to_string(),
            created_at: Utc::now(),
        };
        tables.next_waitlist_id += 1;
        tables.waitlist.push(entry.clone());
        Ok(WaitlistOutcome::Added(entry))
    }

    fn insert_feedback(&self, record: FeedbackRecord) -> StoreResult<()> {
        let mut guard = self.tables.write().expect("store lock poisoned");
        let tables = guard.as_mut().ok_or(StoreError::NotInitialized)?;

        if tables.feedback.iter().any(|f| f.id == record.id) {
            return Err(StoreError::DuplicateId(record.id));
        }
        tables.feedback.push(record);
        Ok(())
    }

    fn insert_application(&self, record: ApplicationRecord) -> StoreResult<()> {
        let mut guard = self.tables.write().expect("store lock poisoned");
        let tables = guard.as_mut().ok_or(StoreError::NotInitialized)?;

        if tables.applications.iter().any(|a| a.id == record.id) {
            return Err(StoreError::DuplicateId(record.id));
        }
        tables.applications.push(record);
        Ok(())
    }

    fn stats(&self, since: DateTime<Utc>) -> StoreResult<StoreStats> {
        let guard = self.tables.read().expect("store lock poisoned");
        let tables = guard.as_ref().ok_or(StoreError::NotInitialized)?;

        let unique_platforms = tables
            .feedback
            .iter()
            .filter_map(|f| f.platform.as_deref())
            .collect::<HashSet<_>>()
            .len();

        Ok(StoreStats {
            totals: TableCounts {
                waitlist: tables.waitlist.len(),
                feedback: tables.feedback.len(),
                applications: tables.applications.len(),
            },
            recent: TableCounts {
                waitlist: tables.waitlist.iter().filter(|w| w.created_at > since).count(),
                feedback: tables.feedback.iter().filter(|f| f.created_at > since).count(),
                applications: tables
                    .applications
                    .iter()
                    .filter(|a| a.created_at > since)
                    .count(),
            },
            unique_platforms,
        })
    }
}
