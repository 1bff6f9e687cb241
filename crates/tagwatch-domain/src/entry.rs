//! Persisted entries

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A durable row representing one appended [`Record`](crate::Record)
///
/// Entries are immutable once written. Only `id`, `content` and `timestamp`
/// are part of the external JSON shape; the structured columns are kept for
/// queries and are skipped during serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
    /// Store-assigned, monotonically increasing primary key
    pub id: i64,

    /// Tag identifier of the originating record
    #[serde(skip)]
    pub tag_id: String,

    /// Trimmed message of the originating record
    #[serde(skip)]
    pub message: String,

    /// Full human-readable dump of the originating record
    pub content: String,

    /// The record's `captured_at`, serialized as RFC 3339
    pub timestamp: DateTime<FixedOffset>,
}
