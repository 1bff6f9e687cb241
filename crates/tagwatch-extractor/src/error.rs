//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur while configuring extraction
///
/// Parsing itself never fails: text without matches yields no records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractorError {
    /// Timezone name is not in the IANA database
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
}
