//! Read-only catalog driver.
//!
//! Every query opens its own read-only connection, binds parameters through
//! SQLite's named-parameter API and fetches all rows eagerly. The connection
//! is released when it goes out of scope, on every exit path.

use std::path::{Path, PathBuf};
use std::time::Duration;

use film_finder_core::{ParamMap, QueryTemplate, RenderError, Row, SqlValue};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{Connection, OpenFlags, ToSql};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("{0}")]
    Template(#[from] RenderError),
    #[error("Catalog database not found: {}", .0.display())]
    Missing(PathBuf),
}

/// A source of catalog connections.
pub trait Catalog {
    type Connection: CatalogConnection;

    fn connect(&self) -> Result<Self::Connection, CatalogError>;
}

/// An open catalog connection.
pub trait CatalogConnection {
    /// Execute `template` with `params` bound by the driver and return every row.
    fn execute(
        &mut self,
        template: &QueryTemplate,
        params: &ParamMap,
    ) -> Result<Vec<Row>, CatalogError>;
}

/// Catalog stored in a SQLite file, opened read-only.
#[derive(Debug, Clone)]
pub struct SqliteCatalog {
    path: PathBuf,
    busy_timeout: Duration,
}

impl SqliteCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Catalog for SqliteCatalog {
    type Connection = SqliteConnection;

    fn connect(&self) -> Result<SqliteConnection, CatalogError> {
        if !self.path.is_file() {
            return Err(CatalogError::Missing(self.path.clone()));
        }
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(self.busy_timeout)?;
        log::debug!("Opened catalog {} (read-only)", self.path.display());
        Ok(SqliteConnection { conn })
    }
}

/// A read-only connection to a [`SqliteCatalog`].
pub struct SqliteConnection {
    conn: Connection,
}

impl CatalogConnection for SqliteConnection {
    fn execute(
        &mut self,
        template: &QueryTemplate,
        params: &ParamMap,
    ) -> Result<Vec<Row>, CatalogError> {
        let sql = template.to_named_sql(':')?;
        let bound: Vec<(String, Value)> = params
            .iter()
            .map(|(name, value)| (format!(":{}", name), to_sqlite(value)))
            .collect();
        let named: Vec<(&str, &dyn ToSql)> = bound
            .iter()
            .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
            .collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let columns = stmt.column_count();
        let mut rows = stmt.query(named.as_slice())?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(columns);
            for i in 0..columns {
                values.push(from_sqlite(row.get_ref(i)?));
            }
            out.push(values);
        }
        Ok(out)
    }
}

fn to_sqlite(value: &SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(i) => Value::Integer(*i),
        SqlValue::Text(s) => Value::Text(s.clone()),
    }
}

fn from_sqlite(value: ValueRef<'_>) -> SqlValue {
    match value {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Integer(i) => SqlValue::Integer(i),
        ValueRef::Real(f) => SqlValue::Text(f.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            SqlValue::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}
