//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{Record, StoredEntry};
use serde::{Deserialize, Serialize};

/// How `exists_by_tag` decides whether a tag was already stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupMode {
    /// Equality on the tag_id column
    #[default]
    Exact,

    /// Legacy check: any stored content containing `TAG ID: <tag_id>`.
    ///
    /// Matches tag ids that are prefixes of stored ones ("4" hits "42"). Rows
    /// upgraded from the old table layout carry a different content format and
    /// are matched on their recovered tag id with the same prefix rule.
    Substring,
}

/// Trait for persisting and reading extracted records
///
/// Implemented by the infrastructure layer (tagwatch-store)
pub trait EntryStore {
    /// Error type for store operations
    type Error;

    /// Whether an entry for this tag id is already stored
    fn exists_by_tag(&self, tag_id: &str) -> Result<bool, Self::Error>;

    /// Durably append a record, returning the committed entry
    fn append(&mut self, record: &Record) -> Result<StoredEntry, Self::Error>;

    /// All entries in insertion order
    fn list_all(&self) -> Result<Vec<StoredEntry>, Self::Error>;

    /// Number of stored entries
    fn count(&self) -> Result<usize, Self::Error>;
}
