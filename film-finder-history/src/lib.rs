//! Query history for film-finder.
//!
//! A capped, rotating audit log of executed queries stored as JSON
//! documents, the "history cleaned" state, the persisted last-query slot
//! and top-N analytics over the log.

pub mod analytics;
pub mod backend;
pub mod error;
pub mod record;
pub mod slot;
pub mod store;

pub use analytics::{Analytics, TopQueries, TopQuery};
pub use backend::{AuditBackend, SqliteAuditBackend, ValueCount};
pub use error::HistoryError;
pub use record::{AuditRecord, ResultStatus};
pub use slot::{LastQuery, LastQuerySlot};
pub use store::{AuditStore, DEFAULT_CAPACITY};
