//! Tagwatch Domain Layer
//!
//! Core types and trait interfaces shared by every Tagwatch crate.
//!
//! ## Key Concepts
//!
//! - **Record**: one tag/message pair extracted from a fetched page, transient
//! - **StoredEntry**: the durable row a Record becomes once appended
//! - **Tag ID**: the business identifier used as the deduplication key
//! - **EntryStore**: the boundary between the pipeline and persistence
//!
//! ## Architecture
//!
//! This crate holds no I/O. Storage, fetching and HTTP serving live in
//! the infrastructure crates and plug in through the traits defined here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entry;
pub mod record;
pub mod traits;

// Re-exports for convenience
pub use entry::StoredEntry;
pub use record::{Record, TAG_MARKER};
pub use traits::{DedupMode, EntryStore};
