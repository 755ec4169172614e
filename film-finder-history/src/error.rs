use thiserror::Error;

/// Failures inside the history layer. These never escape [`crate::AuditStore`];
/// they are logged and the operation degrades to a no-op.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Directory for the last query does not exist: {0}")]
    MissingDirectory(String),

    #[error("Path is not a directory: {0}")]
    NotADirectory(String),
}
