//! Read-all query over the store, as exposed by `GET /content`

use std::fmt::Display;
use tagwatch_domain::{EntryStore, StoredEntry};
use thiserror::Error;

/// Query failures surfaced to the read endpoint
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    /// Nothing stored yet
    #[error("No content found")]
    NotFound,

    /// Store failure
    #[error("Store error: {0}")]
    Store(String),
}

/// All stored entries in insertion order
///
/// An empty store is reported as [`QueryError::NotFound`] rather than an
/// empty list; the read endpoint turns it into a 404.
pub fn get_all<S>(store: &S) -> Result<Vec<StoredEntry>, QueryError>
where
    S: EntryStore,
    S::Error: Display,
{
    let entries = store
        .list_all()
        .map_err(|e| QueryError::Store(e.to_string()))?;

    if entries.is_empty() {
        return Err(QueryError::NotFound);
    }
    Ok(entries)
}
