//! Intersect coverage blocks with the lines a diff added.
//!
//! The filter is stable: the output is a subsequence of the input in its
//! original order, so re-filtering a filtered profile is a no-op.

use std::collections::BTreeSet;

use crate::model::{ChangedLines, CoverBlock, DiffSummary};

/// Keep only the blocks that touch at least one changed line.
pub fn filter_blocks(blocks: Vec<CoverBlock>, changed: &ChangedLines) -> Vec<CoverBlock> {
    blocks
        .into_iter()
        .filter(|block| touches_changed_line(block, changed))
        .collect()
}

/// Sum statement counts over the kept blocks. Coverage is whole-block: a
/// block executed at least once contributes all of its statements as covered.
pub fn summarize(blocks: &[CoverBlock]) -> DiffSummary {
    let total = blocks.iter().map(|b| b.num_stmt).sum();
    let covered = blocks
        .iter()
        .filter(|b| b.covered())
        .map(|b| b.num_stmt)
        .sum();
    DiffSummary { covered, total }
}

/// Path reconciliation between profile and diff.
///
/// Exact key match wins and is final: when the index has the block's path
/// verbatim, only that entry is consulted. Otherwise the profile path often
/// carries a module or filesystem prefix (`github.com/org/repo/foo.go`,
/// `/abs/checkout/foo.go`) that the repo-relative diff path lacks, so any
/// index entry whose path is a literal suffix of the block's slash-normalized
/// path may qualify the block. Inclusion is boolean, so checking every
/// suffix candidate keeps the result independent of map iteration order.
fn touches_changed_line(block: &CoverBlock, changed: &ChangedLines) -> bool {
    if let Some(lines) = changed.get(&block.file) {
        return overlaps(block, lines);
    }

    let normalized = block.file.replace('\\', "/");
    changed
        .iter()
        .any(|(diff_file, lines)| normalized.ends_with(diff_file.as_str()) && overlaps(block, lines))
}

fn overlaps(block: &CoverBlock, lines: &BTreeSet<u32>) -> bool {
    // The parser does not reject inverted ranges; they span no lines (and
    // `BTreeSet::range` panics on them).
    if block.start_line > block.end_line {
        return false;
    }
    lines.range(block.lines()).next().is_some()
}
