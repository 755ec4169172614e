//! Audit records.

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Whether a logged query found anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultStatus {
    Success,
    Failure,
}

impl std::fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "Success"),
            Self::Failure => write!(f, "Failure"),
        }
    }
}

/// One executed query as stored in the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub time: NaiveDateTime,
    pub query: String,
    pub search_key: Option<String>,
    pub search_value: Option<String>,
    pub result: ResultStatus,
}

impl AuditRecord {
    /// A record stamped with the current local time, to the second.
    pub fn now(
        query: impl Into<String>,
        search_key: Option<String>,
        search_value: Option<String>,
        result: ResultStatus,
    ) -> Self {
        let time = Local::now().naive_local();
        Self {
            time: time.with_nanosecond(0).unwrap_or(time),
            query: query.into(),
            search_key,
            search_value,
            result,
        }
    }
}
