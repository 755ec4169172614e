//! Capped, rotating audit log of executed queries.

use std::path::Path;

use crate::backend::{AuditBackend, SqliteAuditBackend};
use crate::error::HistoryError;
use crate::record::AuditRecord;
use crate::slot::{LastQuery, LastQuerySlot};

/// Records kept when no capacity is configured.
pub const DEFAULT_CAPACITY: usize = 24;

/// The audit log, its cleaned-state document and the last-query slot.
///
/// When the backend could not be reached every record operation is a no-op
/// returning empty/false, so searching keeps working without history.
/// Backend failures are logged here and never reach callers.
pub struct AuditStore<B = SqliteAuditBackend> {
    backend: Option<B>,
    capacity: usize,
    slot: Option<LastQuerySlot>,
}

impl AuditStore<SqliteAuditBackend> {
    /// Open the history database at `path`, or fall back to a disconnected
    /// store if it cannot be opened.
    pub fn connect(path: &Path, capacity: usize) -> Self {
        match SqliteAuditBackend::open(path) {
            Ok(backend) => Self::new(backend, capacity),
            Err(e) => {
                log::warn!(
                    "History database error: {}. Search history is unavailable; \
                     you can keep working without it.",
                    e
                );
                Self::disconnected()
            }
        }
    }
}

impl<B: AuditBackend> AuditStore<B> {
    /// A store over `backend` holding at most `capacity` records (minimum 1).
    pub fn new(backend: B, capacity: usize) -> Self {
        Self {
            backend: Some(backend),
            capacity: capacity.max(1),
            slot: None,
        }
    }

    /// A store with no backend.
    pub fn disconnected() -> Self {
        Self {
            backend: None,
            capacity: DEFAULT_CAPACITY,
            slot: None,
        }
    }

    pub fn with_last_query_slot(mut self, slot: LastQuerySlot) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn is_connected(&self) -> bool {
        self.backend.is_some()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn last_query_slot(&self) -> Option<&LastQuerySlot> {
        self.slot.as_ref()
    }

    pub(crate) fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    /// Insert a record, evicting the oldest ones while the log is over
    /// capacity, and mark the history as not cleaned. Insert and eviction
    /// happen in one transaction.
    pub fn append(&mut self, record: &AuditRecord) {
        let capacity = self.capacity;
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        let result = backend.atomically(|b| {
            b.insert_one(record)?;
            while b.count()? > capacity {
                match b.oldest_id()? {
                    Some(id) => b.delete_one(id)?,
                    None => break,
                }
            }
            b.write_cleaned(false)
        });
        degrade("append", result);
    }

    /// Delete every record, empty the last-query slot and mark the history
    /// as cleaned. Idempotent.
    pub fn clear(&mut self) {
        if let Some(slot) = &self.slot {
            degrade("last query reset", slot.clear());
        }
        if let Some(backend) = self.backend.as_mut() {
            let result = backend.atomically(|b| {
                let removed = b.delete_many()?;
                b.write_cleaned(true)?;
                Ok(removed)
            });
            if let Some(removed) = degrade("clear", result) {
                log::debug!("Cleared {} history records", removed);
            }
        }
    }

    /// True iff the log currently holds no records. Recomputed from the
    /// backend rather than trusted from the stored flag. Always false when
    /// disconnected.
    pub fn is_cleaned(&self) -> bool {
        self.backend
            .as_ref()
            .and_then(|b| degrade("count", b.count()))
            .is_some_and(|count| count == 0)
    }

    /// The stored cleaned flag, if the state document exists.
    pub fn cleaned_flag(&self) -> Option<bool> {
        self.backend
            .as_ref()
            .and_then(|b| degrade("state read", b.read_cleaned()))
            .flatten()
    }

    /// Number of records (0 when disconnected).
    pub fn len(&self) -> usize {
        self.backend
            .as_ref()
            .and_then(|b| degrade("count", b.count()))
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All records, oldest first.
    pub fn records(&self) -> Vec<AuditRecord> {
        self.backend
            .as_ref()
            .and_then(|b| degrade("read", b.find_all()))
            .unwrap_or_default()
    }

    /// Overwrite the last-query slot.
    pub fn write_last_query(&self, last: &LastQuery) {
        if let Some(slot) = &self.slot {
            degrade("last query write", slot.write(last));
        }
    }

    /// Rendered text of the last query; `None` means there is no previous
    /// query.
    pub fn read_last_query(&self) -> Option<String> {
        self.slot
            .as_ref()
            .and_then(|slot| degrade("last query read", slot.read()))
            .flatten()
    }

    /// Structured last query for replay.
    pub fn last_query(&self) -> Option<LastQuery> {
        self.slot
            .as_ref()
            .and_then(|slot| degrade("last query read", slot.read_replay()))
            .flatten()
    }

    /// Record the current cleaned state at the start of a session.
    pub fn begin_session(&mut self) {
        let cleaned = self.is_cleaned();
        if let Some(backend) = self.backend.as_mut() {
            degrade("state write", backend.write_cleaned(cleaned));
        }
    }

    /// Drop the state document so the next session recomputes it.
    pub fn end_session(&mut self) {
        if let Some(backend) = self.backend.as_mut() {
            degrade("state reset", backend.delete_state());
        }
    }
}

fn degrade<T>(operation: &str, result: Result<T, HistoryError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("History {} failed: {}", operation, e);
            None
        }
    }
}
