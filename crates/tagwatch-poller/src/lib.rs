//! Tagwatch Poller
//!
//! Periodically fetches one page, extracts tag records and appends the new ones.
//!
//! # Overview
//!
//! Each cycle:
//! 1. Fetches the monitored URL with a bounded timeout. Failures are logged and
//!    the cycle ends.
//! 2. Compares the raw body with the previous one. An identical body ends the cycle.
//! 3. Extracts records from the trimmed body and, in order, appends each one
//!    whose tag id the store does not hold yet.
//!
//! Then the worker sleeps for the poll interval and starts over, until stopped.
//!
//! ```text
//! Idle --(interval elapsed)--> Cycling --(cycle done, any result)--> Idle
//! ```
//!
//! # Configuration
//!
//! ```toml
//! monitored_url = "http://192.168.18.40/"
//! poll_interval_seconds = 30
//! fetch_timeout_seconds = 10
//! timezone = "America/Sao_Paulo"
//! dedup_mode = "exact"
//! ```

#![warn(missing_docs)]

mod error;
mod config;
mod fetch;
mod metrics;
mod poller;
mod worker;

pub use error::{FetchError, PollerError};
pub use config::PollerConfig;
pub use fetch::{HttpPageSource, PageSource};
pub use metrics::PollerMetrics;
pub use poller::{CycleOutcome, CycleReport, Poller};
pub use worker::{PollerHandle, PollerWorker};
