//! Main Extractor implementation

use crate::grammar::find_spans;
use crate::ExtractorError;
use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use tagwatch_domain::Record;
use tracing::debug;

/// Civil timezone used when none is configured
pub const DEFAULT_TIMEZONE: &str = "America/Sao_Paulo";

/// Extracts [`Record`]s from raw page text
///
/// Each record is stamped at extraction time in a fixed civil timezone,
/// independent of the host locale.
#[derive(Debug, Clone, Copy)]
pub struct TagExtractor {
    timezone: Tz,
}

impl TagExtractor {
    /// Create an extractor stamping records in `timezone`
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Create an extractor from an IANA zone name such as `America/Sao_Paulo`
    ///
    /// # Errors
    ///
    /// Returns [`ExtractorError::UnknownTimezone`] if the name is not a known zone.
    pub fn from_timezone_name(name: &str) -> Result<Self, ExtractorError> {
        let timezone = name
            .parse::<Tz>()
            .map_err(|_| ExtractorError::UnknownTimezone(name.to_string()))?;
        Ok(Self::new(timezone))
    }

    /// The zone records are stamped in
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Current wall-clock time in the configured zone
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.timezone).fixed_offset()
    }

    /// Extract every record in `raw`, stamping each with the current time
    pub fn extract(&self, raw: &str) -> Vec<Record> {
        self.extract_with_clock(raw, || self.now())
    }

    /// Extract every record in `raw`, calling `clock` once per record
    pub fn extract_with_clock<C>(&self, raw: &str, mut clock: C) -> Vec<Record>
    where
        C: FnMut() -> DateTime<FixedOffset>,
    {
        let records: Vec<Record> = find_spans(raw)
            .into_iter()
            .zip(1u32..)
            .map(|(span, sequence_index)| Record {
                sequence_index,
                tag_id: span.tag_id.to_string(),
                message: span.message.trim().to_string(),
                captured_at: clock(),
            })
            .collect();

        debug!("Extracted {} records from {} bytes", records.len(), raw.len());
        records
    }
}

impl Default for TagExtractor {
    fn default() -> Self {
        Self::new(chrono_tz::America::Sao_Paulo)
    }
}
