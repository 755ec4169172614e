//! Username/password account store.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Minimum length for both usernames and passwords.
pub const MIN_CREDENTIAL_LEN: usize = 5;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Username is too short ({MIN_CREDENTIAL_LEN} characters minimum)")]
    UsernameTooShort,
    #[error("Password must be at least {MIN_CREDENTIAL_LEN} characters")]
    PasswordTooShort,
    #[error("Username already exists: {0}")]
    UsernameTaken(String),
}

/// Accounts kept in a SQLite `users` table.
pub struct AccountStore {
    conn: Connection,
}

impl AccountStore {
    /// Open or create the account database at `path`.
    pub fn open(path: &Path) -> Result<Self, AccountError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::init(conn)
    }

    /// In-memory store. Useful for testing.
    pub fn open_memory() -> Result<Self, AccountError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, AccountError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );",
        )?;
        Ok(Self { conn })
    }

    /// Whether a username is taken. Comparison is case-sensitive.
    pub fn user_exists(&self, username: &str) -> Result<bool, AccountError> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM users WHERE username = ?1 LIMIT 1",
                params![username],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Check a username/password pair. Unknown users simply fail.
    pub fn verify(&self, username: &str, password: &str) -> Result<bool, AccountError> {
        let stored: Option<String> = self
            .conn
            .query_row(
                "SELECT password_hash FROM users WHERE username = ?1 LIMIT 1",
                params![username],
                |row| row.get(0),
            )
            .optional()?;
        Ok(stored.is_some_and(|hash| hash == password_hash(username, password)))
    }

    /// Register a new account.
    pub fn create_user(&self, username: &str, password: &str) -> Result<(), AccountError> {
        if username.chars().count() < MIN_CREDENTIAL_LEN {
            return Err(AccountError::UsernameTooShort);
        }
        if password.chars().count() < MIN_CREDENTIAL_LEN {
            return Err(AccountError::PasswordTooShort);
        }
        if self.user_exists(username)? {
            return Err(AccountError::UsernameTaken(username.to_string()));
        }
        self.conn.execute(
            "INSERT INTO users (username, password_hash) VALUES (?1, ?2)",
            params![username, password_hash(username, password)],
        )?;
        log::debug!("Created account '{}'", username);
        Ok(())
    }

    pub fn user_count(&self) -> Result<i64, AccountError> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?)
    }
}

/// Hex SHA-256 of the password salted with its username.
fn password_hash(username: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(username.as_bytes());
    hasher.update([0u8]);
    hasher.update(password.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}
