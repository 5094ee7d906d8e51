//! Append-only record history with case-insensitive dedup.

use crate::error::{Result, StoreError};
use crate::record::{EmailRecord, RecordMeta};
use harvest_core::{RecordId, Verified};
use std::collections::HashSet;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// History and seen set, always updated under one lock.
#[derive(Debug, Default)]
struct StoreState {
    records: Vec<EmailRecord>,
    seen: HashSet<String>,
}

/// Shared, thread-safe record store.
///
/// Every observation is kept, duplicates included. An address is a
/// duplicate when its lower-cased form was accepted earlier in the life of
/// this store, including earlier in the same batch. Cloning yields another
/// handle to the same store.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    state: Arc<RwLock<StoreState>>,
}

impl RecordStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a store from a previously exported history.
    ///
    /// Every stored address is marked as seen, so dedup spans sessions.
    #[must_use]
    pub fn from_records(records: Vec<EmailRecord>) -> Self {
        let seen = records.iter().map(EmailRecord::email_key).collect();
        let state = StoreState { records, seen };

        debug!(
            records = state.records.len(),
            unique = state.seen.len(),
            "restored record store"
        );

        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Append one record per address, in order, and return the non-duplicates.
    ///
    /// The whole batch is applied atomically with respect to other writers
    /// and readers.
    pub fn add_records<I, S>(&self, emails: I, meta: &RecordMeta) -> Vec<EmailRecord>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = self.state.write().expect("acquire write lock on records");

        let mut added = Vec::new();
        let mut duplicates = 0usize;

        for email in emails {
            let email = email.into();
            let key = email.to_lowercase();
            let duplicate = state.seen.contains(&key);

            let record = EmailRecord::observed(email, meta, duplicate);
            if duplicate {
                duplicates += 1;
            } else {
                state.seen.insert(key);
                added.push(record.clone());
            }
            state.records.push(record);
        }

        debug!(
            added = added.len(),
            duplicates,
            total = state.records.len(),
            "appended email records"
        );

        added
    }

    /// Empty the history and the seen set together.
    pub fn clear(&self) {
        let mut state = self.state.write().expect("acquire write lock on records");
        let removed = state.records.len();
        state.records.clear();
        state.seen.clear();

        info!(removed, "cleared record store");
    }

    /// Set the deliverability verdict of one record.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if no record has `id`.
    pub fn set_verified(&self, id: &RecordId, verified: Verified) -> Result<()> {
        let mut state = self.state.write().expect("acquire write lock on records");

        let record = state
            .records
            .iter_mut()
            .find(|record| &record.id == id)
            .ok_or_else(|| StoreError::NotFound {
                id: id.to_string(),
            })?;
        record.verified = verified;

        debug!(id = %id, verified = %verified, "updated verification state");
        Ok(())
    }

    /// Snapshot of the full history in insertion order.
    #[must_use]
    pub fn records(&self) -> Vec<EmailRecord> {
        self.read().records.clone()
    }

    /// Snapshot of the non-duplicate records in insertion order.
    #[must_use]
    pub fn unique_records(&self) -> Vec<EmailRecord> {
        self.read()
            .records
            .iter()
            .filter(|record| !record.duplicate)
            .cloned()
            .collect()
    }

    /// Number of records in the history, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().records.len()
    }

    /// Whether the history is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().records.is_empty()
    }

    /// Number of distinct addresses seen.
    #[must_use]
    pub fn unique_count(&self) -> usize {
        self.read().seen.len()
    }

    /// Whether `email` was already seen, ignoring case.
    #[must_use]
    pub fn contains_email(&self, email: &str) -> bool {
        self.read().seen.contains(&email.to_lowercase())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, StoreState> {
        self.state.read().expect("acquire read lock on records")
    }
}
