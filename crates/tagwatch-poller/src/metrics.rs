//! Metrics collection for Poller operations

/// Counters accumulated across poll cycles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollerMetrics {
    /// Cycles started
    pub cycle_count: usize,

    /// Cycles whose fetch failed (network, timeout, non-200)
    pub fetch_failures: usize,

    /// Cycles skipped because the body matched the cached one
    pub unchanged_cycles: usize,

    /// Records produced by the extractor
    pub records_extracted: usize,

    /// Records appended to the store
    pub records_stored: usize,

    /// Records skipped because their tag was already stored
    pub duplicates_skipped: usize,

    /// Records lost to store errors
    pub store_failures: usize,
}

impl PollerMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the start of a cycle
    pub fn record_cycle(&mut self) {
        self.cycle_count += 1;
    }

    /// Record a failed fetch
    pub fn record_fetch_failure(&mut self) {
        self.fetch_failures += 1;
    }

    /// Record a cycle skipped on an unchanged body
    pub fn record_unchanged(&mut self) {
        self.unchanged_cycles += 1;
    }

    /// Fold one processed batch into the totals
    pub fn record_batch(&mut self, extracted: usize, stored: usize, duplicates: usize, failed: usize) {
        self.records_extracted += extracted;
        self.records_stored += stored;
        self.duplicates_skipped += duplicates;
        self.store_failures += failed;
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        [
            "Poller Metrics Summary".to_string(),
            "======================".to_string(),
            format!("Cycles: {}", self.cycle_count),
            format!("Fetch failures: {}", self.fetch_failures),
            format!("Unchanged cycles: {}", self.unchanged_cycles),
            format!("Records extracted: {}", self.records_extracted),
            format!("Records stored: {}", self.records_stored),
            format!("Duplicates skipped: {}", self.duplicates_skipped),
            format!("Store failures: {}", self.store_failures),
        ]
        .join("\n")
    }
}
