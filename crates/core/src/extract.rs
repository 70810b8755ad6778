//! Paragraph salvage and deduplication.
//!
//! The readability fragment of a thread page still carries button labels,
//! counters and the same sentence rendered several times at different levels
//! of inline markup. [`extract_segments`] walks the fragment's paragraphs in
//! document order and keeps only unique, non-trivial prose.
//!
//! # Example
//!
//! ```rust
//! use inkdrop_core::{ExtractConfig, extract_segments};
//!
//! let html = r#"
//!     <p>The first genuine sentence of the thread.</p>
//!     <p>Follow</p>
//!     <p>The first genuine sentence of the thread.</p>
//! "#;
//! let segments = extract_segments(html, &ExtractConfig::default());
//! assert_eq!(segments.len(), 1);
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::classify::is_ui_noise;
use crate::parse::Document;
use crate::preprocess::strip_non_content;

/// Configuration for segment extraction
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Minimum segment length in characters
    pub min_chars: usize,
    /// Selector for paragraph-level blocks
    pub block_selector: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self { min_chars: 20, block_selector: "p".to_string() }
    }
}

/// One deduplicated, noise-filtered line of prose.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TextSegment(String);

impl TextSegment {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TextSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TextSegment {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Why a candidate paragraph was not kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Short,
    Noise,
    Duplicate,
    Contained,
}

/// Collapse every whitespace run to one space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Ordered accumulator of accepted segments.
///
/// A candidate is refused when it equals, or is a substring of, a segment
/// accepted earlier. Only that direction is checked: a later, longer
/// segment that contains an earlier one is still accepted.
#[derive(Debug, Default)]
pub struct SegmentSet {
    accepted: Vec<TextSegment>,
    exact: HashSet<String>,
    // byte length -> indices into `accepted`; a container is never shorter
    // than what it contains, so only buckets >= the candidate are scanned
    by_len: BTreeMap<usize, Vec<usize>>,
}

impl SegmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer an already-normalized candidate.
    pub fn offer(&mut self, text: String) -> Result<(), Rejection> {
        if self.exact.contains(&text) {
            return Err(Rejection::Duplicate);
        }

        let contained = self
            .by_len
            .range(text.len()..)
            .flat_map(|(_, indices)| indices.iter())
            .any(|&i| self.accepted[i].as_str().contains(text.as_str()));
        if contained {
            return Err(Rejection::Contained);
        }

        self.by_len.entry(text.len()).or_default().push(self.accepted.len());
        self.exact.insert(text.clone());
        self.accepted.push(TextSegment(text));
        Ok(())
    }

    fn len(&self) -> usize {
        self.accepted.len()
    }

    pub fn into_segments(self) -> Vec<TextSegment> {
        self.accepted
    }
}

/// Check a raw paragraph text against the length floor and noise table,
/// returning the normalized text if it may be offered to a [`SegmentSet`].
pub fn screen_candidate(raw: &str, config: &ExtractConfig) -> Result<String, Rejection> {
    let text = collapse_whitespace(raw);
    if text.is_empty() || text.chars().count() < config.min_chars {
        return Err(Rejection::Short);
    }
    if is_ui_noise(&text) {
        return Err(Rejection::Noise);
    }
    Ok(text)
}

/// Dedup a sequence of raw texts in order.
pub fn dedup_texts<I, S>(texts: I, config: &ExtractConfig) -> Vec<TextSegment>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut set = SegmentSet::new();
    let mut rejected = [0usize; 4];

    for raw in texts {
        let outcome = screen_candidate(raw.as_ref(), config).and_then(|text| set.offer(text));
        if let Err(reason) = outcome {
            rejected[reason as usize] += 1;
        }
    }

    tracing::debug!(
        kept = set.len(),
        short = rejected[Rejection::Short as usize],
        noise = rejected[Rejection::Noise as usize],
        duplicate = rejected[Rejection::Duplicate as usize],
        contained = rejected[Rejection::Contained as usize],
        "segment extraction finished"
    );

    set.into_segments()
}

/// Extract ordered, unique prose segments from a content fragment.
///
/// Scripts, styles, navigation, footers, asides and iframes are removed
/// first. Each paragraph's text is read without trimming, whitespace is
/// collapsed, and the result is kept unless it is shorter than
/// `min_chars`, is UI noise, or duplicates an accepted segment.
///
/// Never fails: a fragment with nothing worth keeping yields an empty vector.
pub fn extract_segments(fragment_html: &str, config: &ExtractConfig) -> Vec<TextSegment> {
    let cleaned = strip_non_content(fragment_html);

    let doc = match Document::parse_fragment(&cleaned) {
        Ok(doc) => doc,
        Err(_) => return Vec::new(),
    };

    let blocks = match doc.select(&config.block_selector) {
        Ok(blocks) => blocks,
        Err(e) => {
            tracing::warn!(selector = %config.block_selector, error = %e, "invalid block selector");
            return Vec::new();
        }
    };

    dedup_texts(blocks.iter().map(|block| block.text()), config)
}
