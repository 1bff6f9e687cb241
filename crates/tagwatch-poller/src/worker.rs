//! Background worker for continuous polling

use crate::{
    CycleOutcome, CycleReport, HttpPageSource, PageSource, Poller, PollerConfig, PollerError,
    PollerMetrics,
};
use std::fmt::Display;
use std::time::Duration;
use tagwatch_domain::EntryStore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Background worker that runs poll cycles on a fixed interval
///
/// Alternates between Cycling (one [`Poller::cycle`]) and Idle (sleeping for
/// the interval) until its shutdown token is cancelled. Cancellation
/// interrupts a pending fetch or sleep.
///
/// # Examples
///
/// ```no_run
/// use tagwatch_domain::DedupMode;
/// use tagwatch_poller::{PollerConfig, PollerWorker};
/// use tagwatch_store::{SharedStore, SqliteStore};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = PollerConfig::for_url("http://192.168.18.40/");
///     let store = SharedStore::new(SqliteStore::open("page_content.db", DedupMode::Exact)?);
///     let handle = PollerWorker::from_config(&config, store)?.start();
///
///     tokio::signal::ctrl_c().await?;
///     let metrics = handle.stop().await?;
///     println!("{}", metrics.summary());
///     Ok(())
/// }
/// ```
pub struct PollerWorker<P, S> {
    poller: Poller<P, S>,
    interval: Duration,
}

impl<S> PollerWorker<HttpPageSource, S>
where
    S: EntryStore,
    S::Error: Display,
{
    /// Build a worker polling `config.monitored_url` over HTTP
    pub fn from_config(config: &PollerConfig, store: S) -> Result<Self, PollerError> {
        config.validate()?;
        let source = HttpPageSource::new(config.monitored_url.clone(), config.fetch_timeout())?;
        let poller = Poller::new(source, store, config.extractor()?);
        Ok(Self::new(poller, config.poll_interval()))
    }
}

impl<P, S> PollerWorker<P, S>
where
    P: PageSource,
    S: EntryStore,
    S::Error: Display,
{
    /// Create a worker sleeping `interval` between cycles
    pub fn new(poller: Poller<P, S>, interval: Duration) -> Self {
        Self { poller, interval }
    }

    /// The poller driven by this worker
    pub fn poller(&self) -> &Poller<P, S> {
        &self.poller
    }

    /// Get a reference to the poller's current metrics
    pub fn metrics(&self) -> &PollerMetrics {
        self.poller.metrics()
    }

    /// Run until `shutdown` is cancelled, returning the final metrics
    pub async fn run(mut self, shutdown: CancellationToken) -> PollerMetrics {
        info!("Poller worker started (interval: {:?})", self.interval);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                report = self.poller.cycle() => log_report(&report),
            }

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        let metrics = self.poller.metrics().clone();
        info!("Poller stopped. Final metrics:\n{}", metrics.summary());
        metrics
    }

    /// Run a fixed number of cycles, sleeping between them (useful for testing)
    pub async fn run_cycles(&mut self, cycles: usize) -> Vec<CycleReport> {
        let mut reports = Vec::with_capacity(cycles);

        for cycle in 0..cycles {
            if cycle > 0 {
                tokio::time::sleep(self.interval).await;
            }
            debug!("Starting poll cycle {}/{}", cycle + 1, cycles);
            let report = self.poller.cycle().await;
            log_report(&report);
            reports.push(report);
        }

        reports
    }
}

impl<P, S> PollerWorker<P, S>
where
    P: PageSource + Send + 'static,
    S: EntryStore + Send + 'static,
    S::Error: Display,
{
    /// Spawn the worker on the tokio runtime
    pub fn start(self) -> PollerHandle {
        let shutdown = CancellationToken::new();
        let task = tokio::spawn(self.run(shutdown.clone()));
        PollerHandle { shutdown, task }
    }
}

fn log_report(report: &CycleReport) {
    if report.outcome == CycleOutcome::Processed {
        info!(
            "Cycle completed: {} extracted, {} stored, {} duplicates, {} failed",
            report.extracted, report.stored, report.duplicates, report.failed
        );
    }
}

/// Handle to a running [`PollerWorker`]
pub struct PollerHandle {
    shutdown: CancellationToken,
    task: JoinHandle<PollerMetrics>,
}

impl PollerHandle {
    /// Token that stops the worker when cancelled
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Whether the worker task has exited
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Signal shutdown and wait for the worker to exit
    ///
    /// # Errors
    ///
    /// Returns [`PollerError::Worker`] if the worker task panicked.
    pub async fn stop(self) -> Result<PollerMetrics, PollerError> {
        self.shutdown.cancel();
        self.task
            .await
            .map_err(|e| PollerError::Worker(e.to_string()))
    }
}
