//! Record module - the transient unit produced by one parse

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Literal marker that introduces a tag identifier in fetched text
pub const TAG_MARKER: &str = "TAG ID:";

/// One tag/message pair extracted from a fetched page
///
/// A Record lives for a single poll cycle. It is either appended to the
/// store (becoming a [`StoredEntry`](crate::StoredEntry)) or discarded.
///
/// # Examples
///
/// ```
/// use chrono::{FixedOffset, TimeZone};
/// use tagwatch_domain::Record;
///
/// let offset = FixedOffset::west_opt(3 * 3600).unwrap();
/// let record = Record {
///     sequence_index: 1,
///     tag_id: "abc123".to_string(),
///     message: "hello world".to_string(),
///     captured_at: offset.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
/// };
///
/// assert!(record.content().contains("TAG ID: abc123"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// 1-based rank within a single parse batch; not a durable identifier
    pub sequence_index: u32,

    /// Business identifier; stored records are unique per tag_id
    pub tag_id: String,

    /// Free-text payload, whitespace-trimmed
    pub message: String,

    /// Wall-clock time of extraction in the configured civil timezone
    pub captured_at: DateTime<FixedOffset>,
}

impl Record {
    /// The literal fragment identifying this record's tag inside stored content
    pub fn tag_fragment(&self) -> String {
        tag_fragment(&self.tag_id)
    }

    /// Human-readable dump persisted as `StoredEntry::content`
    ///
    /// Always contains `TAG ID: <tag_id>` so legacy substring lookups keep working.
    pub fn content(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} ---- {} @ {}",
            self.sequence_index,
            self.tag_fragment(),
            self.message,
            self.captured_at.to_rfc3339()
        )
    }
}

/// Build the `TAG ID: <tag_id>` fragment for an arbitrary identifier
pub fn tag_fragment(tag_id: &str) -> String {
    format!("{} {}", TAG_MARKER, tag_id)
}
