//! Hashtag extraction from task text.
//!
//! # Responsibility
//! - Derive the ordered, deduplicated hashtag list of a text.
//! - Split text into plain/hashtag segments for highlighting.
//!
//! # Invariants
//! - A hashtag is `#` followed by one or more ASCII word characters
//!   (`A-Z`, `a-z`, `0-9`, `_`), matched greedily left to right.
//! - Results are case-sensitive and keep first-seen order.
//! - Extraction is pure and never fails.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static HASHTAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#((?-u:\w)+)").expect("valid hashtag regex"));

/// Extracts unique hashtags (without `#`) in first-occurrence order.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();
    for caps in HASHTAG_RE.captures_iter(text) {
        let Some(tag) = caps.get(1).map(|m| m.as_str().trim()) else {
            continue;
        };
        if tag.is_empty() {
            continue;
        }
        if seen.insert(tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Returns whether `text` carries every tag in `required`.
///
/// An empty `required` set always matches.
pub fn has_all_hashtags<'a, I>(text: &str, required: I) -> bool
where
    I: IntoIterator<Item = &'a String>,
{
    let tags = extract_hashtags(text);
    required.into_iter().all(|tag| tags.contains(tag))
}

/// One display segment of a task text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSegment {
    /// Word rendered as-is.
    Plain(String),
    /// Word starting with `#`, kept with its prefix.
    Hashtag(String),
}

/// Splits text on single spaces into highlightable segments.
///
/// Words that start with `#` become [`TextSegment::Hashtag`]; everything else,
/// including empty words produced by repeated spaces, is plain.
pub fn segment_text(text: &str) -> Vec<TextSegment> {
    text.split(' ')
        .map(|word| {
            if word.starts_with('#') {
                TextSegment::Hashtag(word.to_string())
            } else {
                TextSegment::Plain(word.to_string())
            }
        })
        .collect()
}
