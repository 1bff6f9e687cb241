//! Locate tag spans in raw page text

use regex::Regex;
use std::sync::LazyLock;
use tagwatch_domain::TAG_MARKER;

/// Anchored at a marker: token, lazy gap (may cross lines), separator, message run.
///
/// The message run stops at line breaks and punctuation.
static SPAN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^TAG ID:\s*(\S+)(?s:.+?)----([\w\t ]+)").expect("span pattern is valid")
});

/// A well-formed span, borrowed from the raw text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TagSpan<'a> {
    pub tag_id: &'a str,
    /// Untrimmed message run
    pub message: &'a str,
}

/// Find every well-formed span in `raw`, left to right
///
/// The text is cut at each marker, so a span's gap can never swallow a later
/// marker: with two markers before one separator, only the nearer marker binds.
pub(crate) fn find_spans(raw: &str) -> Vec<TagSpan<'_>> {
    let starts: Vec<usize> = raw.match_indices(TAG_MARKER).map(|(pos, _)| pos).collect();

    starts
        .iter()
        .enumerate()
        .filter_map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(raw.len());
            let segment = &raw[start..end];
            let caps = SPAN_PATTERN.captures(segment)?;
            Some(TagSpan {
                tag_id: caps.get(1)?.as_str(),
                message: caps.get(2)?.as_str(),
            })
        })
        .collect()
}
