//! Document-store backend for the audit log.
//!
//! Records are stored as JSON documents in insertion order (monotonic id).
//! A second single-document table holds the "history cleaned" state.

use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, OptionalExtension, params};

use crate::error::HistoryError;
use crate::record::AuditRecord;

/// How long a writer waits for a locked history database.
pub const SELECTION_TIMEOUT: Duration = Duration::from_millis(3000);

/// A search value and how many records carry it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueCount {
    pub value: String,
    pub count: u64,
}

/// The operations [`crate::AuditStore`] needs from a document store.
pub trait AuditBackend {
    /// Insert a record and return its id.
    fn insert_one(&mut self, record: &AuditRecord) -> Result<i64, HistoryError>;

    fn count(&self) -> Result<usize, HistoryError>;

    /// Id of the record with the lowest insertion order.
    fn oldest_id(&self) -> Result<Option<i64>, HistoryError>;

    fn delete_one(&mut self, id: i64) -> Result<(), HistoryError>;

    /// Delete every record, returning how many were removed.
    fn delete_many(&mut self) -> Result<usize, HistoryError>;

    /// All records, oldest first.
    fn find_all(&self) -> Result<Vec<AuditRecord>, HistoryError>;

    /// Group by search value, count, sort by count descending and truncate.
    ///
    /// Equal counts are ordered by the earliest surviving insertion of the
    /// value. Records without a search value are skipped.
    fn top_values(&self, limit: usize) -> Result<Vec<ValueCount>, HistoryError>;

    /// Search key of the first record (by insertion order) with `value`.
    fn first_key_for_value(&self, value: &str) -> Result<Option<String>, HistoryError>;

    fn read_cleaned(&self) -> Result<Option<bool>, HistoryError>;

    fn write_cleaned(&mut self, cleaned: bool) -> Result<(), HistoryError>;

    /// Remove the state document entirely.
    fn delete_state(&mut self) -> Result<(), HistoryError>;

    /// Run `f` so that its writes are applied all together or not at all.
    fn atomically<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, HistoryError>,
    ) -> Result<T, HistoryError>
    where
        Self: Sized;
}

/// [`AuditBackend`] on a SQLite file using JSON documents.
pub struct SqliteAuditBackend {
    conn: Connection,
}

impl SqliteAuditBackend {
    /// Open or create the history database at `path`.
    pub fn open(path: &Path) -> Result<Self, HistoryError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(SELECTION_TIMEOUT)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::init(conn)
    }

    /// In-memory backend. Useful for testing.
    pub fn open_memory() -> Result<Self, HistoryError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, HistoryError> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self { conn })
    }
}

impl AuditBackend for SqliteAuditBackend {
    fn insert_one(&mut self, record: &AuditRecord) -> Result<i64, HistoryError> {
        let document = serde_json::to_string(record)?;
        self.conn.execute(
            "INSERT INTO audit_log (document) VALUES (?1)",
            params![document],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn count(&self) -> Result<usize, HistoryError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM audit_log", [], |row| row.get(0))?;
        Ok(count.max(0) as usize)
    }

    fn oldest_id(&self) -> Result<Option<i64>, HistoryError> {
        Ok(self
            .conn
            .query_row(
                "SELECT id FROM audit_log ORDER BY id ASC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn delete_one(&mut self, id: i64) -> Result<(), HistoryError> {
        self.conn
            .execute("DELETE FROM audit_log WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn delete_many(&mut self) -> Result<usize, HistoryError> {
        Ok(self.conn.execute("DELETE FROM audit_log", [])?)
    }

    fn find_all(&self) -> Result<Vec<AuditRecord>, HistoryError> {
        let mut stmt = self
            .conn
            .prepare("SELECT document FROM audit_log ORDER BY id ASC")?;
        let documents = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        documents
            .iter()
            .map(|doc| serde_json::from_str(doc).map_err(Into::into))
            .collect()
    }

    fn top_values(&self, limit: usize) -> Result<Vec<ValueCount>, HistoryError> {
        let mut stmt = self.conn.prepare(
            "SELECT json_extract(document, '$.search_value') AS value,
                    COUNT(*) AS hits,
                    MIN(id) AS first_seen
             FROM audit_log
             WHERE json_extract(document, '$.search_value') IS NOT NULL
             GROUP BY value
             ORDER BY hits DESC, first_seen ASC
             LIMIT ?1",
        )?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map(params![limit], |row| {
            Ok(ValueCount {
                value: row.get(0)?,
                count: row.get::<_, i64>(1)?.max(0) as u64,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn first_key_for_value(&self, value: &str) -> Result<Option<String>, HistoryError> {
        let key: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT json_extract(document, '$.search_key')
                 FROM audit_log
                 WHERE json_extract(document, '$.search_value') = ?1
                 ORDER BY id ASC
                 LIMIT 1",
                params![value],
                |row| row.get(0),
            )
            .optional()?;
        Ok(key.flatten())
    }

    fn read_cleaned(&self) -> Result<Option<bool>, HistoryError> {
        let document: Option<String> = self
            .conn
            .query_row("SELECT document FROM audit_state WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;
        let Some(document) = document else {
            return Ok(None);
        };
        let state: StateDocument = serde_json::from_str(&document)?;
        Ok(Some(state.cleaned))
    }

    fn write_cleaned(&mut self, cleaned: bool) -> Result<(), HistoryError> {
        let document = serde_json::to_string(&StateDocument { cleaned })?;
        self.conn.execute(
            "INSERT INTO audit_state (id, document) VALUES (1, ?1)
             ON CONFLICT(id) DO UPDATE SET document = excluded.document",
            params![document],
        )?;
        Ok(())
    }

    fn delete_state(&mut self) -> Result<(), HistoryError> {
        self.conn.execute("DELETE FROM audit_state", [])?;
        Ok(())
    }

    fn atomically<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, HistoryError>,
    ) -> Result<T, HistoryError> {
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        let result = f(self).and_then(|value| {
            self.conn.execute_batch("COMMIT")?;
            Ok(value)
        });
        if result.is_err() {
            // Nothing to roll back if COMMIT already ended the transaction.
            if !self.conn.is_autocommit() {
                let _ = self.conn.execute_batch("ROLLBACK");
            }
        }
        result
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
struct StateDocument {
    cleaned: bool,
}

const SCHEMA_SQL: &str = r#"
-- Executed queries, one JSON document per row, in insertion order
CREATE TABLE IF NOT EXISTS audit_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    document TEXT NOT NULL
);

-- Single "history cleaned" document
CREATE TABLE IF NOT EXISTS audit_state (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    document TEXT NOT NULL
);
"#;
