//! Integration tests for tagwatch-store
//!
//! These tests verify durability of appends against an on-disk database.

use chrono::{FixedOffset, TimeZone};
use tagwatch_domain::{DedupMode, EntryStore, Record};
use tagwatch_store::{SharedStore, SqliteStore, StoreError};
use tempfile::TempDir;

fn record(seq: u32, tag_id: &str) -> Record {
    Record {
        sequence_index: seq,
        tag_id: tag_id.to_string(),
        message: format!("message for {}", tag_id),
        captured_at: FixedOffset::west_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 9, 15, 14, 30, 0)
            .unwrap(),
    }
}

#[test]
fn test_append_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("page_content.db");

    let written = {
        let mut store = SqliteStore::open(&path, DedupMode::Exact).unwrap();
        store.append(&record(1, "persisted")).unwrap()
    };

    let store = SqliteStore::open(&path, DedupMode::Exact).unwrap();
    let entries = store.list_all().unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0], written);
    assert!(store.exists_by_tag("persisted").unwrap());
}

#[test]
fn test_ids_keep_increasing_after_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("page_content.db");

    let first = {
        let mut store = SqliteStore::open(&path, DedupMode::Exact).unwrap();
        store.append(&record(1, "a")).unwrap()
    };

    let mut store = SqliteStore::open(&path, DedupMode::Exact).unwrap();
    let second = store.append(&record(1, "b")).unwrap();

    assert!(second.id > first.id);
}

#[test]
fn test_reopen_in_other_mode_sees_same_rows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("page_content.db");

    {
        let mut store = SqliteStore::open(&path, DedupMode::Exact).unwrap();
        store.append(&record(1, "42")).unwrap();
    }

    let legacy = SqliteStore::open(&path, DedupMode::Substring).unwrap();
    assert_eq!(legacy.dedup_mode(), DedupMode::Substring);
    assert!(legacy.exists_by_tag("4").unwrap());
}

#[test]
fn test_shared_store_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("page_content.db");

    let mut store = SharedStore::new(SqliteStore::open(&path, DedupMode::Exact).unwrap());
    store.append(&record(1, "x")).unwrap();
    store.append(&record(2, "y")).unwrap();

    let entries = store.clone().list_all().unwrap();
    let contents: Vec<&str> = entries.iter().map(|e| e.content.as_str()).collect();
    assert_eq!(contents.len(), 2);
    assert!(contents[0].contains("TAG ID: x"));
    assert!(contents[1].contains("TAG ID: y"));
}

/// Database laid out the way the service stored pages before tag ids had a column
fn write_legacy_database(path: &std::path::Path, rows: &[(&str, &str)]) {
    let conn = rusqlite::Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE page_content (
            id INTEGER NOT NULL PRIMARY KEY,
            content TEXT NOT NULL,
            timestamp DATETIME
        );
        CREATE INDEX ix_page_content_id ON page_content (id);",
    )
    .unwrap();
    for (content, timestamp) in rows {
        conn.execute(
            "INSERT INTO page_content (content, timestamp) VALUES (?1, ?2)",
            rusqlite::params![content, timestamp],
        )
        .unwrap();
    }
}

fn legacy_dump(seq: u32, tag_id: &str, message: &str) -> String {
    format!(
        "{{'id': {}, 'tag_id': '{}', 'message': '{}', 'timestamp': datetime.datetime(2024, 6, 1, 10, 0, 0, 123456)}}",
        seq, tag_id, message
    )
}

#[test]
fn test_legacy_database_is_upgraded_on_open() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("page_content.db");
    let first = legacy_dump(1, "42", "door open");
    let repeat = legacy_dump(1, "42", "door open");
    let second = legacy_dump(2, "7", "door closed");
    write_legacy_database(
        &path,
        &[
            (first.as_str(), "2024-06-01 10:00:00.123456"),
            (repeat.as_str(), "2024-06-01 10:00:30.000000"),
            (second.as_str(), "2024-06-01 10:01:00.000000"),
        ],
    );

    let mut store = SqliteStore::open(&path, DedupMode::Exact).unwrap();
    let entries = store.list_all().unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, 1);
    assert_eq!(entries[0].tag_id, "42");
    assert_eq!(entries[0].message, "door open");
    assert_eq!(entries[0].content, first);
    assert_eq!(entries[0].timestamp.to_rfc3339(), "2024-06-01T10:00:00.123456+00:00");
    assert_eq!(entries[1].id, 3);
    assert_eq!(entries[1].tag_id, "7");

    assert!(store.exists_by_tag("42").unwrap());
    assert!(!store.exists_by_tag("4").unwrap());

    let appended = store.append(&record(3, "99")).unwrap();
    assert!(appended.id > 3);
    assert_eq!(store.count().unwrap(), 3);
}

#[test]
fn test_upgraded_legacy_rows_match_in_substring_mode() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("page_content.db");
    let dump = legacy_dump(1, "42", "x");
    write_legacy_database(&path, &[(dump.as_str(), "2024-06-01 10:00:00")]);

    let store = SqliteStore::open(&path, DedupMode::Substring).unwrap();
    assert!(store.exists_by_tag("42").unwrap());
    assert!(store.exists_by_tag("4").unwrap());
    assert!(!store.exists_by_tag("5").unwrap());
    assert_eq!(store.list_all().unwrap().len(), 1);
}

#[test]
fn test_upgraded_database_reopens_without_change() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("page_content.db");
    let dump = legacy_dump(1, "a", "x");
    write_legacy_database(&path, &[(dump.as_str(), "2024-06-01 10:00:00")]);

    let before = SqliteStore::open(&path, DedupMode::Exact).unwrap().list_all().unwrap();
    let after = SqliteStore::open(&path, DedupMode::Exact).unwrap().list_all().unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_unreadable_legacy_database_is_refused_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("page_content.db");
    write_legacy_database(&path, &[("not a record dump", "2024-06-01 10:00:00")]);

    let err = SqliteStore::open(&path, DedupMode::Substring).err().unwrap();
    assert!(matches!(err, StoreError::InvalidData(_)));

    let conn = rusqlite::Connection::open(&path).unwrap();
    let content: String = conn
        .query_row("SELECT content FROM page_content", [], |row| row.get(0))
        .unwrap();
    assert_eq!(content, "not a record dump");
}
