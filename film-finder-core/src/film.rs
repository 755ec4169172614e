//! Typed view of catalog result rows.

use crate::value::{Row, SqlValue};

/// A film as returned by the `main_table`/`actors_table` searches:
/// title, release year, genre and actor list (or a single actor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilmRow {
    pub title: String,
    pub release_year: Option<i64>,
    pub genre: Option<String>,
    pub actors: Vec<String>,
}

impl FilmRow {
    /// Interpret a result row. Returns `None` when the row does not have a
    /// text title in its first column.
    pub fn from_row(row: &Row) -> Option<Self> {
        let title = row.first()?.as_text()?.to_string();
        let release_year = row.get(1).and_then(SqlValue::as_integer);
        let genre = row.get(2).and_then(SqlValue::as_text).map(str::to_string);
        let actors = row
            .get(3)
            .and_then(SqlValue::as_text)
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Some(Self {
            title,
            release_year,
            genre,
            actors,
        })
    }
}
