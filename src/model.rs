//! In-memory representation of the two pipeline inputs: coverage blocks from a
//! Go-style profile and the per-file set of lines a diff added. Both are built
//! once per run, consumed by the filter, and discarded.

use std::collections::{BTreeSet, HashMap};
use std::ops::RangeInclusive;

/// Compute a coverage rate, returning 0.0 when the total is zero.
#[must_use]
pub fn rate(covered: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        covered as f64 / total as f64
    }
}

/// One block line from a coverage profile: a contiguous source range with a
/// statement count and an execution count.
///
/// `raw` holds the input line verbatim (without the trailing newline) so a
/// filtered profile can re-emit kept blocks byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverBlock {
    pub file: String,
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
    pub num_stmt: u64,
    pub count: u64,
    pub raw: String,
}

impl CoverBlock {
    /// Whole-block coverage: every statement in the block counts as covered
    /// iff the block was executed at least once.
    #[must_use]
    pub fn covered(&self) -> bool {
        self.count > 0
    }

    /// The source lines this block spans (1-indexed, inclusive).
    #[must_use]
    pub fn lines(&self) -> RangeInclusive<u32> {
        self.start_line..=self.end_line
    }
}

/// Map from diff new-file path to the set of line numbers added in the new
/// version of that file.
///
/// A file appears as a key as soon as its `+++ b/` header is seen, so a file
/// with a header but no added lines is present with an empty set. That keeps
/// "tracked by the diff, nothing added" distinguishable from "not in the diff".
pub type ChangedLines = HashMap<String, BTreeSet<u32>>;

/// Aggregated statement counts over the filtered blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct DiffSummary {
    pub covered: u64,
    pub total: u64,
}

impl DiffSummary {
    #[must_use]
    pub fn percent(&self) -> f64 {
        rate(self.covered, self.total) * 100.0
    }

    /// An empty intersection (no statements in the diff) passes vacuously;
    /// otherwise the threshold boundary is inclusive.
    #[must_use]
    pub fn passes(&self, threshold: f64) -> bool {
        self.total == 0 || self.percent() >= threshold
    }
}
