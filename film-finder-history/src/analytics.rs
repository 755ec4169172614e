//! Most frequent search values in the audit log.

use std::num::NonZeroUsize;

use crate::backend::AuditBackend;
use crate::store::AuditStore;

/// Key reported when no record with a ranked value carries a search key.
pub const UNKNOWN_KEY: &str = "unknown";

/// One ranked search value with a representative key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopQuery {
    pub search_key: String,
    pub search_value: String,
    pub frequency: u64,
}

/// Result of a top-N request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopQueries {
    /// Values by descending frequency, ties by first insertion.
    Ranked(Vec<TopQuery>),
    /// The log holds no records.
    HistoryEmpty,
    /// The history backend is not connected or failed.
    Unavailable,
}

/// Aggregations over an [`AuditStore`].
pub struct Analytics<'a, B> {
    store: &'a AuditStore<B>,
}

impl<'a, B: AuditBackend> Analytics<'a, B> {
    pub fn new(store: &'a AuditStore<B>) -> Self {
        Self { store }
    }

    /// The `n` most frequent search values.
    ///
    /// The key shown for each value is taken from the first record holding
    /// that value; a value searched under several keys reports only one.
    pub fn top_n(&self, n: NonZeroUsize) -> TopQueries {
        let Some(backend) = self.store.backend() else {
            return TopQueries::Unavailable;
        };
        if self.store.is_cleaned() {
            return TopQueries::HistoryEmpty;
        }

        let values = match backend.top_values(n.get()) {
            Ok(values) => values,
            Err(e) => {
                log::warn!("History aggregation failed: {}", e);
                return TopQueries::Unavailable;
            }
        };

        let mut ranked = Vec::with_capacity(values.len());
        for entry in values {
            let key = match backend.first_key_for_value(&entry.value) {
                Ok(key) => key,
                Err(e) => {
                    log::warn!("History lookup failed: {}", e);
                    None
                }
            };
            ranked.push(TopQuery {
                search_key: key.unwrap_or_else(|| UNKNOWN_KEY.to_string()),
                search_value: entry.value,
                frequency: entry.count,
            });
        }
        TopQueries::Ranked(ranked)
    }
}
