use std::num::NonZeroUsize;

use film_finder_core::{ParamMap, QueryTemplate};
use film_finder_history::*;

fn memory_store(capacity: usize) -> AuditStore {
    AuditStore::new(SqliteAuditBackend::open_memory().unwrap(), capacity)
}

fn record(value: &str) -> AuditRecord {
    AuditRecord::now(
        format!("WHERE genre = '{}'", value),
        Some("Genre".to_string()),
        Some(value.to_string()),
        ResultStatus::Success,
    )
}

fn top(store: &AuditStore, n: usize) -> TopQueries {
    Analytics::new(store).top_n(NonZeroUsize::new(n).unwrap())
}

#[test]
fn log_never_exceeds_capacity() {
    let mut store = memory_store(3);
    for i in 0..10 {
        store.append(&record(&format!("g{}", i)));
        assert!(store.len() <= 3);
    }
    let values: Vec<_> = store
        .records()
        .into_iter()
        .map(|r| r.search_value.unwrap())
        .collect();
    assert_eq!(values, vec!["g7", "g8", "g9"]);
}

#[test]
fn thirty_searches_keep_the_last_twenty_four() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = AuditStore::connect(&dir.path().join("history.db"), DEFAULT_CAPACITY);
    assert!(store.is_connected());
    for i in 1..=30 {
        store.append(&record(&format!("search {}", i)));
    }
    let records = store.records();
    assert_eq!(records.len(), 24);
    assert_eq!(records[0].search_value.as_deref(), Some("search 7"));
    assert_eq!(records[23].search_value.as_deref(), Some("search 30"));
}

#[test]
fn capacity_is_at_least_one() {
    let mut store = memory_store(0);
    assert_eq!(store.capacity(), 1);
    store.append(&record("a"));
    store.append(&record("b"));
    assert_eq!(store.len(), 1);
}

#[test]
fn cleaned_flag_tracks_inserts_and_clears() {
    let mut store = memory_store(24);
    assert!(store.is_cleaned());
    assert_eq!(store.cleaned_flag(), None);

    store.begin_session();
    assert_eq!(store.cleaned_flag(), Some(true));

    store.append(&record("Drama"));
    assert!(!store.is_cleaned());
    assert_eq!(store.cleaned_flag(), Some(false));

    store.clear();
    assert!(store.is_cleaned());
    assert_eq!(store.cleaned_flag(), Some(true));

    // Clearing twice leaves the same state.
    store.clear();
    assert!(store.is_cleaned());
    assert_eq!(store.len(), 0);

    store.end_session();
    assert_eq!(store.cleaned_flag(), None);
}

#[test]
fn top_two_ranks_by_frequency_then_first_insertion() {
    let mut store = memory_store(24);
    // Comedy is first inserted before Horror; both end with three hits.
    let order = [
        "Drama", "Comedy", "Drama", "Horror", "Drama", "Horror", "Comedy", "Drama", "Horror",
        "Comedy", "Drama",
    ];
    for value in order {
        store.append(&record(value));
    }

    let TopQueries::Ranked(ranked) = top(&store, 2) else {
        panic!("expected ranked results");
    };
    assert_eq!(
        ranked,
        vec![
            TopQuery {
                search_key: "Genre".to_string(),
                search_value: "Drama".to_string(),
                frequency: 5,
            },
            TopQuery {
                search_key: "Genre".to_string(),
                search_value: "Comedy".to_string(),
                frequency: 3,
            },
        ]
    );
}

#[test]
fn top_n_larger_than_distinct_values() {
    let mut store = memory_store(24);
    store.append(&record("Drama"));
    store.append(&record("Drama"));
    store.append(&record("Action"));
    let TopQueries::Ranked(ranked) = top(&store, 10) else {
        panic!("expected ranked results");
    };
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].frequency, 2);
}

#[test]
fn records_without_value_are_not_ranked() {
    let mut store = memory_store(24);
    store.append(&AuditRecord::now(
        "SELECT 1",
        None,
        None,
        ResultStatus::Success,
    ));
    store.append(&record("Drama"));
    let TopQueries::Ranked(ranked) = top(&store, 5) else {
        panic!("expected ranked results");
    };
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].search_value, "Drama");
}

#[test]
fn missing_key_reports_unknown() {
    let mut store = memory_store(24);
    store.append(&AuditRecord::now(
        "SELECT 1",
        None,
        Some("loose".to_string()),
        ResultStatus::Failure,
    ));
    let TopQueries::Ranked(ranked) = top(&store, 1) else {
        panic!("expected ranked results");
    };
    assert_eq!(ranked[0].search_key, "unknown");
}

#[test]
fn empty_history_is_reported() {
    let store = memory_store(24);
    assert_eq!(top(&store, 3), TopQueries::HistoryEmpty);
}

#[test]
fn clear_empties_last_query_slot() {
    let dir = tempfile::tempdir().unwrap();
    let slot = LastQuerySlot::in_dir(dir.path()).unwrap();
    let mut store = memory_store(24).with_last_query_slot(slot);

    store.append(&record("Drama"));
    store.write_last_query(&LastQuery {
        rendered: "WHERE genre = 'Drama'".to_string(),
        template: QueryTemplate::new("WHERE genre = %(genre)s"),
        params: ParamMap::new().with("genre", "Drama"),
        retry: None,
    });
    assert_eq!(
        store.read_last_query().as_deref(),
        Some("WHERE genre = 'Drama'")
    );
    assert!(store.last_query().is_some());

    store.clear();
    assert!(store.is_cleaned());
    assert_eq!(store.read_last_query(), None);
    assert_eq!(store.last_query(), None);
}

#[test]
fn disconnected_store_is_a_no_op() {
    let mut store: AuditStore = AuditStore::disconnected();
    store.append(&record("Drama"));
    assert!(!store.is_connected());
    assert_eq!(store.len(), 0);
    assert!(store.records().is_empty());
    assert!(!store.is_cleaned());
    assert_eq!(store.cleaned_flag(), None);
    store.clear();
    store.begin_session();
    store.end_session();
    assert_eq!(top(&store, 3), TopQueries::Unavailable);
    assert_eq!(store.read_last_query(), None);
}

#[test]
fn unreachable_database_degrades() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("history.db");
    let store = AuditStore::connect(&path, DEFAULT_CAPACITY);
    assert!(!store.is_connected());
}

#[test]
fn history_persists_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.db");
    {
        let mut store = AuditStore::connect(&path, 24);
        store.append(&record("Drama"));
    }
    let store = AuditStore::connect(&path, 24);
    assert_eq!(store.len(), 1);
    assert_eq!(store.records()[0].result, ResultStatus::Success);
}
