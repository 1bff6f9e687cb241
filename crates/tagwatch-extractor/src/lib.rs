//! Tagwatch Extractor
//!
//! Turns the raw text of a fetched page into structured [`Record`]s.
//!
//! # Grammar
//!
//! A span starts at the literal marker `TAG ID:`, followed by optional
//! whitespace and a non-whitespace token (the tag id). After a gap of at
//! least one character, which may cross line breaks but never another
//! marker, comes a separator of four or more hyphens and then a run of word
//! characters and spaces (the message).
//!
//! ```text
//! noise TAG ID: abc123 blah ---- hello world
//!       ^^^^^^^ ^^^^^^      ^^^^ ^^^^^^^^^^^
//!       marker  tag_id      sep  message
//! ```
//!
//! Every well-formed span yields one record, left to right, numbered from 1.
//! Text without any well-formed span yields nothing; that is not an error.
//!
//! # Example Usage
//!
//! ```
//! use tagwatch_extractor::TagExtractor;
//!
//! let extractor = TagExtractor::from_timezone_name("America/Sao_Paulo").unwrap();
//! let records = extractor.extract("noise TAG ID: abc123 blah ---- hello world\nmore");
//!
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].sequence_index, 1);
//! assert_eq!(records[0].tag_id, "abc123");
//! assert_eq!(records[0].message, "hello world");
//! ```
//!
//! [`Record`]: tagwatch_domain::Record

#![warn(missing_docs)]

mod error;
mod grammar;
mod extractor;


pub use error::ExtractorError;
pub use extractor::{TagExtractor, DEFAULT_TIMEZONE};
