//! Upgrade of databases written before tag ids had their own column.
//!
//! The older service kept `page_content(id, content, timestamp)` where `content`
//! is the printed form of a record map, e.g.
//! `{'id': 1, 'tag_id': '42', 'message': 'hello', 'timestamp': datetime.datetime(...)}`,
//! and `timestamp` is naive civil time (`2024-06-01 10:00:00.123456`).
//!
//! On open such a table is rebuilt under the current schema: row ids and content
//! are kept, `tag_id`, `message` and `sequence_index` are recovered from the
//! content, and the timestamp is stored as RFC 3339 with a zero offset since the
//! zone was never recorded. When a tag occurs more than once the earliest row wins.

use crate::StoreError;
use chrono::{DateTime, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{info, warn};

const NAIVE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// A legacy row with its fields recovered
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LegacyRow {
    pub sequence_index: u32,
    pub tag_id: String,
    pub message: String,
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool, StoreError> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![table],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> Result<bool, StoreError> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let names = stmt.query_map([], |row| row.get::<_, String>(1))?;
    for name in names {
        if name? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Whether `page_content` exists in the pre-`tag_id` layout
pub(crate) fn needs_upgrade(conn: &Connection) -> Result<bool, StoreError> {
    Ok(table_exists(conn, "page_content")?
        && !table_has_column(conn, "page_content", "tag_id")?)
}

/// Rebuild a legacy `page_content` table in one transaction.
///
/// Returns the number of rows carried over. Any row whose content or timestamp
/// cannot be read fails the whole upgrade and leaves the database untouched.
pub(crate) fn upgrade(conn: &mut Connection, schema: &str) -> Result<usize, StoreError> {
    let tx = conn.transaction()?;
    tx.execute_batch("ALTER TABLE page_content RENAME TO page_content_legacy")?;
    tx.execute_batch(schema)?;

    let legacy: Vec<(i64, String, Option<String>)> = {
        let mut stmt =
            tx.prepare("SELECT id, content, timestamp FROM page_content_legacy ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?;
        rows.collect::<Result<_, _>>()?
    };

    let mut carried = 0;
    let mut skipped = 0;
    for (id, content, raw_timestamp) in &legacy {
        let row = parse_content(content).ok_or_else(|| {
            StoreError::InvalidData(format!("Unreadable legacy content in row {}", id))
        })?;
        let raw_timestamp = raw_timestamp.as_deref().ok_or_else(|| {
            StoreError::InvalidData(format!("Missing legacy timestamp in row {}", id))
        })?;
        let timestamp = parse_timestamp(raw_timestamp)?;

        let inserted = tx.execute(
            "INSERT OR IGNORE INTO page_content
                (id, tag_id, message, sequence_index, content, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![id, row.tag_id, row.message, row.sequence_index, content, timestamp],
        )?;
        if inserted == 0 {
            skipped += 1;
        } else {
            carried += 1;
        }
    }

    tx.execute_batch("DROP TABLE page_content_legacy")?;
    tx.commit()?;

    if skipped > 0 {
        warn!("Dropped {} legacy rows repeating an already stored tag id", skipped);
    }
    info!("Upgraded legacy page_content table ({} rows)", carried);
    Ok(carried)
}

/// Recover the record fields from a legacy content dump
pub(crate) fn parse_content(content: &str) -> Option<LegacyRow> {
    let tag_id = quoted_field(content, "tag_id")?;
    if tag_id.is_empty() {
        return None;
    }
    Some(LegacyRow {
        sequence_index: integer_field(content, "id")?,
        tag_id,
        message: quoted_field(content, "message")?,
    })
}

/// Naive legacy timestamp as RFC 3339 with a zero offset
pub(crate) fn parse_timestamp(raw: &str) -> Result<String, StoreError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.to_rfc3339());
    }
    NaiveDateTime::parse_from_str(raw, NAIVE_FORMAT)
        .map(|naive| naive.and_utc().fixed_offset().to_rfc3339())
        .map_err(|e| StoreError::InvalidData(format!("Bad legacy timestamp {:?}: {}", raw, e)))
}

fn field_start<'a>(content: &'a str, key: &str) -> Option<&'a str> {
    let label = format!("'{}': ", key);
    content.find(&label).map(|at| &content[at + label.len()..])
}

fn integer_field(content: &str, key: &str) -> Option<u32> {
    let rest = field_start(content, key)?;
    let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    rest[..end].parse().ok()
}

// Printed strings use single quotes unless they contain one, and escape with backslashes
fn quoted_field(content: &str, key: &str) -> Option<String> {
    let mut chars = field_start(content, key)?.chars();
    let quote = chars.next().filter(|c| *c == '\'' || *c == '"')?;

    let mut value = String::new();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next()? {
                'n' => value.push('\n'),
                't' => value.push('\t'),
                'r' => value.push('\r'),
                other => value.push(other),
            },
            c if c == quote => return Some(value),
            c => value.push(c),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = "{'id': 3, 'tag_id': '42', 'message': 'door open', \
        'timestamp': datetime.datetime(2024, 6, 1, 10, 0, tzinfo=<DstTzInfo 'America/Sao_Paulo' -03-1 day, 21:00:00 STD>)}";

    #[test]
    fn test_parse_content_reads_fields() {
        let row = parse_content(DUMP).unwrap();
        assert_eq!(
            row,
            LegacyRow {
                sequence_index: 3,
                tag_id: "42".to_string(),
                message: "door open".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_content_handles_quotes_in_tag() {
        let dump = r#"{'id': 1, 'tag_id': "it's", 'message': 'm'}"#;
        assert_eq!(parse_content(dump).unwrap().tag_id, "it's");

        let escaped = r#"{'id': 1, 'tag_id': 'a\'b"c', 'message': 'm'}"#;
        assert_eq!(parse_content(escaped).unwrap().tag_id, "a'b\"c");
    }

    #[test]
    fn test_parse_content_rejects_other_text() {
        assert!(parse_content("TAG ID: 42 ---- hi").is_none());
        assert!(parse_content("{'id': 1, 'message': 'no tag'}").is_none());
        assert!(parse_content("{'id': 1, 'tag_id': '', 'message': 'm'}").is_none());
    }

    #[test]
    fn test_parse_timestamp_naive_and_offset() {
        assert_eq!(
            parse_timestamp("2024-06-01 10:00:00.123456").unwrap(),
            "2024-06-01T10:00:00.123456+00:00"
        );
        assert_eq!(parse_timestamp("2024-06-01 10:00:00").unwrap(), "2024-06-01T10:00:00+00:00");
        assert_eq!(
            parse_timestamp("2024-06-01T10:00:00-03:00").unwrap(),
            "2024-06-01T10:00:00-03:00"
        );
        assert!(matches!(parse_timestamp("yesterday"), Err(StoreError::InvalidData(_))));
    }
}
