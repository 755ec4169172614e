//! The persisted "last query" slot.
//!
//! `last_query.txt` holds the rendered text of the most recent logged query
//! and is overwritten on every write. A sidecar `last_query.replay.json`
//! keeps the template and parameters so the query can be run again through
//! the driver's binding instead of the rendered text.

use std::fs;
use std::path::{Path, PathBuf};

use film_finder_core::{ParamMap, QueryTemplate, RetryHint};
use serde::{Deserialize, Serialize};

use crate::error::HistoryError;

pub const LAST_QUERY_FILE: &str = "last_query.txt";
pub const REPLAY_FILE: &str = "last_query.replay.json";

/// The structured form of the last query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastQuery {
    pub rendered: String,
    pub template: QueryTemplate,
    pub params: ParamMap,
    /// Hint of the search that produced the query, so a replay shows it
    /// the same way.
    #[serde(default)]
    pub retry: Option<RetryHint>,
}

/// File-backed last-query slot.
#[derive(Debug, Clone)]
pub struct LastQuerySlot {
    text_path: PathBuf,
    replay_path: PathBuf,
}

impl LastQuerySlot {
    /// Use `dir` for the slot files. The directory must already exist; the
    /// files are created on first write.
    pub fn in_dir(dir: &Path) -> Result<Self, HistoryError> {
        if !dir.exists() {
            return Err(HistoryError::MissingDirectory(dir.display().to_string()));
        }
        if !dir.is_dir() {
            return Err(HistoryError::NotADirectory(dir.display().to_string()));
        }
        Ok(Self {
            text_path: dir.join(LAST_QUERY_FILE),
            replay_path: dir.join(REPLAY_FILE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.text_path
    }

    /// Overwrite both files.
    pub fn write(&self, last: &LastQuery) -> Result<(), HistoryError> {
        fs::write(&self.text_path, &last.rendered)?;
        fs::write(&self.replay_path, serde_json::to_string_pretty(last)?)?;
        Ok(())
    }

    /// Rendered text of the last query. `None` when the slot is empty or
    /// has never been written.
    pub fn read(&self) -> Result<Option<String>, HistoryError> {
        match fs::read_to_string(&self.text_path) {
            Ok(text) if text.is_empty() => Ok(None),
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Structured form of the last query, if one is stored.
    pub fn read_replay(&self) -> Result<Option<LastQuery>, HistoryError> {
        if self.read()?.is_none() {
            return Ok(None);
        }
        match fs::read_to_string(&self.replay_path) {
            Ok(json) if json.trim().is_empty() => Ok(None),
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Empty both files.
    pub fn clear(&self) -> Result<(), HistoryError> {
        fs::write(&self.text_path, "")?;
        fs::write(&self.replay_path, "")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LastQuery {
        LastQuery {
            rendered: "WHERE YEAR = 1999".to_string(),
            template: QueryTemplate::new("WHERE year = %(y)s"),
            params: ParamMap::new().with("y", 1999),
            retry: None,
        }
    }

    #[test]
    fn unwritten_slot_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let slot = LastQuerySlot::in_dir(dir.path()).unwrap();
        assert_eq!(slot.read().unwrap(), None);
        assert_eq!(slot.read_replay().unwrap(), None);
    }

    #[test]
    fn write_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let slot = LastQuerySlot::in_dir(dir.path()).unwrap();
        slot.write(&sample()).unwrap();
        let mut second = sample();
        second.rendered = "WHERE YEAR = 2000".to_string();
        second.params = ParamMap::new().with("y", 2000);
        slot.write(&second).unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("WHERE YEAR = 2000"));
        assert_eq!(slot.read_replay().unwrap(), Some(second));
    }

    #[test]
    fn clear_empties_slot() {
        let dir = tempfile::tempdir().unwrap();
        let slot = LastQuerySlot::in_dir(dir.path()).unwrap();
        slot.write(&sample()).unwrap();
        slot.clear().unwrap();
        assert_eq!(slot.read().unwrap(), None);
        assert_eq!(slot.read_replay().unwrap(), None);
    }

    #[test]
    fn missing_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            LastQuerySlot::in_dir(&missing),
            Err(HistoryError::MissingDirectory(_))
        ));
        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            LastQuerySlot::in_dir(&file),
            Err(HistoryError::NotADirectory(_))
        ));
    }

    #[test]
    fn replay_file_without_hint_still_loads() {
        let dir = tempfile::tempdir().unwrap();
        let slot = LastQuerySlot::in_dir(dir.path()).unwrap();
        fs::write(dir.path().join(LAST_QUERY_FILE), "WHERE YEAR = 1999").unwrap();
        fs::write(
            dir.path().join(REPLAY_FILE),
            r#"{"rendered":"WHERE YEAR = 1999","template":"WHERE year = %(y)s","params":{"y":1999}}"#,
        )
        .unwrap();
        assert_eq!(slot.read_replay().unwrap(), Some(sample()));
    }

    #[test]
    fn hint_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let slot = LastQuerySlot::in_dir(dir.path()).unwrap();
        let mut last = sample();
        last.retry = Some(RetryHint::Actor);
        slot.write(&last).unwrap();
        assert_eq!(
            slot.read_replay().unwrap().and_then(|l| l.retry),
            Some(RetryHint::Actor)
        );
    }
}
