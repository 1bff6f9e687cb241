//! Tagwatch Storage Layer
//!
//! Implements the EntryStore trait on SQLite.
//!
//! # Architecture
//!
//! - One `page_content` table with typed columns plus the human-readable `content` dump
//! - `tag_id` carries a UNIQUE constraint, so a tag can never be stored twice
//! - Every append and every full read runs in its own transaction
//! - A `page_content` table from before the `tag_id` column is upgraded on open
//!
//! # Examples
//!
//! ```no_run
//! use tagwatch_domain::DedupMode;
//! use tagwatch_store::SqliteStore;
//!
//! let store = SqliteStore::open("page_content.db", DedupMode::Exact).unwrap();
//! // Store is now ready for dedup checks and appends
//! ```

#![warn(missing_docs)]

mod legacy;
mod shared;

pub use shared::SharedStore;

use chrono::{DateTime, FixedOffset};
use rusqlite::{params, Connection, ErrorCode, Row};
use std::path::Path;
use tagwatch_domain::record::tag_fragment;
use tagwatch_domain::{DedupMode, EntryStore, Record, StoredEntry};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The UNIQUE constraint on tag_id rejected the append
    #[error("Duplicate tag id: {0}")]
    DuplicateTag(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A thread panicked while holding the shared connection
    #[error("Store lock poisoned")]
    Poisoned,
}

const SELECT_ENTRIES: &str =
    "SELECT id, tag_id, message, content, timestamp FROM page_content ORDER BY id ASC";

/// SQLite-based implementation of EntryStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Share a store between tasks with
/// [`SharedStore`].
pub struct SqliteStore {
    conn: Connection,
    dedup_mode: DedupMode,
}

impl SqliteStore {
    /// Open (or create) the database at `path`
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn open<P: AsRef<Path>>(path: P, dedup_mode: DedupMode) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn, dedup_mode };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open a fresh in-memory database
    pub fn in_memory(dedup_mode: DedupMode) -> Result<Self, StoreError> {
        Self::open(":memory:", dedup_mode)
    }

    /// The lookup strategy used by `exists_by_tag`
    pub fn dedup_mode(&self) -> DedupMode {
        self.dedup_mode
    }

    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        if legacy::needs_upgrade(&self.conn)? {
            legacy::upgrade(&mut self.conn, schema)?;
        }
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<StoredEntry> {
        let raw_timestamp: String = row.get(4)?;
        let timestamp = parse_timestamp(&raw_timestamp).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(StoredEntry {
            id: row.get(0)?,
            tag_id: row.get(1)?,
            message: row.get(2)?,
            content: row.get(3)?,
            timestamp,
        })
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map_err(|e| StoreError::InvalidData(format!("Bad timestamp {:?}: {}", raw, e)))
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

impl EntryStore for SqliteStore {
    type Error = StoreError;

    fn exists_by_tag(&self, tag_id: &str) -> Result<bool, Self::Error> {
        let exists = match self.dedup_mode {
            DedupMode::Exact => self.conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM page_content WHERE tag_id = ?1)",
                params![tag_id],
                |row| row.get(0),
            )?,
            // instr() takes the fragment literally; LIKE would treat % and _ as wildcards.
            // Upgraded legacy rows keep their old content, so they are matched on the
            // tag column with the same prefix reach.
            DedupMode::Substring => self.conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM page_content
                 WHERE instr(content, ?1) > 0 OR substr(tag_id, 1, length(?2)) = ?2)",
                params![tag_fragment(tag_id), tag_id],
                |row| row.get(0),
            )?,
        };
        Ok(exists)
    }

    fn append(&mut self, record: &Record) -> Result<StoredEntry, Self::Error> {
        let content = record.content();
        let tx = self.conn.transaction()?;

        let inserted = tx.execute(
            "INSERT INTO page_content (tag_id, message, sequence_index, content, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                &record.tag_id,
                &record.message,
                record.sequence_index,
                &content,
                record.captured_at.to_rfc3339(),
            ],
        );
        if let Err(e) = inserted {
            if is_unique_violation(&e) {
                return Err(StoreError::DuplicateTag(record.tag_id.clone()));
            }
            return Err(e.into());
        }

        let id = tx.last_insert_rowid();
        tx.commit()?;
        debug!("Committed entry {} for tag {}", id, record.tag_id);

        Ok(StoredEntry {
            id,
            tag_id: record.tag_id.clone(),
            message: record.message.clone(),
            content,
            timestamp: record.captured_at,
        })
    }

    fn list_all(&self) -> Result<Vec<StoredEntry>, Self::Error> {
        let tx = self.conn.unchecked_transaction()?;
        let entries = {
            let mut stmt = tx.prepare(SELECT_ENTRIES)?;
            let rows = stmt.query_map([], Self::row_to_entry)?;
            rows.collect::<Result<Vec<_>, _>>()?
        };
        tx.commit()?;
        Ok(entries)
    }

    fn count(&self) -> Result<usize, Self::Error> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM page_content", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
