//! One fetch, parse, dedup and store cycle

use crate::{PageSource, PollerMetrics};
use std::fmt::Display;
use tagwatch_domain::EntryStore;
use tagwatch_extractor::TagExtractor;
use tracing::{debug, info, warn};

/// How a cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Fetch failed; nothing parsed or stored
    FetchFailed,
    /// Body identical to the cached one; nothing parsed or stored
    Unchanged,
    /// Body was new and went through extraction
    Processed,
}

/// Result of one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// How the cycle ended
    pub outcome: CycleOutcome,
    /// Records produced by the extractor
    pub extracted: usize,
    /// Records appended to the store
    pub stored: usize,
    /// Records skipped as already stored
    pub duplicates: usize,
    /// Records lost to store errors
    pub failed: usize,
}

impl CycleReport {
    fn empty(outcome: CycleOutcome) -> Self {
        Self {
            outcome,
            extracted: 0,
            stored: 0,
            duplicates: 0,
            failed: 0,
        }
    }
}

/// Owns everything one monitored page needs between cycles
///
/// The raw-content cache lives here, so two pollers never share it.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use tagwatch_domain::DedupMode;
/// use tagwatch_extractor::TagExtractor;
/// use tagwatch_poller::{HttpPageSource, Poller};
/// use tagwatch_store::SqliteStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let source = HttpPageSource::new("http://192.168.18.40/", Duration::from_secs(10))?;
/// let store = SqliteStore::open("page_content.db", DedupMode::Exact)?;
/// let mut poller = Poller::new(source, store, TagExtractor::default());
///
/// let report = poller.cycle().await;
/// println!("stored {} new records", report.stored);
/// # Ok(())
/// # }
/// ```
pub struct Poller<P, S> {
    source: P,
    store: S,
    extractor: TagExtractor,
    last_content: Option<String>,
    metrics: PollerMetrics,
}

impl<P, S> Poller<P, S>
where
    P: PageSource,
    S: EntryStore,
    S::Error: Display,
{
    /// Create a poller with an empty cache
    pub fn new(source: P, store: S, extractor: TagExtractor) -> Self {
        Self {
            source,
            store,
            extractor,
            last_content: None,
            metrics: PollerMetrics::new(),
        }
    }

    /// The last successfully fetched raw body, if any
    pub fn last_content(&self) -> Option<&str> {
        self.last_content.as_deref()
    }

    /// The store records are appended to
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &PollerMetrics {
        &self.metrics
    }

    /// Run one cycle: fetch, compare with the cache, then parse and store
    ///
    /// Never fails: fetch and store errors are logged and counted.
    pub async fn cycle(&mut self) -> CycleReport {
        self.metrics.record_cycle();

        let body = match self.source.fetch().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Error monitoring page: {}", e);
                self.metrics.record_fetch_failure();
                return CycleReport::empty(CycleOutcome::FetchFailed);
            }
        };

        // Exact comparison on the raw body, before trimming
        if self.last_content.as_deref() == Some(body.as_str()) {
            debug!("Page unchanged, skipping parse");
            self.metrics.record_unchanged();
            return CycleReport::empty(CycleOutcome::Unchanged);
        }

        let report = self.process(body.trim());
        self.last_content = Some(body);
        report
    }

    /// Extract records from `text` and append those whose tag is new
    pub fn process(&mut self, text: &str) -> CycleReport {
        let records = self.extractor.extract(text);
        let mut report = CycleReport::empty(CycleOutcome::Processed);
        report.extracted = records.len();

        if records.is_empty() {
            info!("No valid entries found in the content, skipping save");
            return report;
        }

        for record in &records {
            match self.store.exists_by_tag(&record.tag_id) {
                Ok(true) => {
                    info!("Content with TAG ID {} already exists, skipping save", record.tag_id);
                    report.duplicates += 1;
                }
                Ok(false) => match self.store.append(record) {
                    Ok(entry) => {
                        info!("Content with TAG ID {} saved as entry {}", record.tag_id, entry.id);
                        report.stored += 1;
                    }
                    Err(e) => {
                        warn!("Failed to save TAG ID {}: {}", record.tag_id, e);
                        report.failed += 1;
                    }
                },
                Err(e) => {
                    warn!("Failed to check TAG ID {}: {}", record.tag_id, e);
                    report.failed += 1;
                }
            }
        }

        self.metrics
            .record_batch(report.extracted, report.stored, report.duplicates, report.failed);
        report
    }
}
