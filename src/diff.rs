//! Parse a unified diff to extract which lines were added in each file.
//!
//! Only the new-file side matters here: the gate asks "of the lines this
//! patch introduced, how many are covered?", so removed lines and old-side
//! hunk offsets are parsed but never consulted.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{DiffcoverError, Result};
use crate::model::ChangedLines;

/// Hunk header: `@@ -<oldStart>[,<oldCount>] +<newStart>[,<newCount>] @@`.
static HUNK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@@ -\d+(?:,\d+)? \+(\d+)(?:,\d+)? @@").unwrap());

/// New-file marker: `+++ b/<path>`.
static FILE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+\+\+ b/(.+)").unwrap());

/// Parse a unified diff, returning the per-file sets of added line numbers.
pub fn parse(diff: &str) -> ChangedLines {
    let mut changed = ChangedLines::new();
    let mut scanner = Scanner::default();
    for line in diff.lines() {
        scanner.step(line, &mut changed);
    }
    changed
}

/// Parse a unified diff file.
pub fn parse_file(path: &Path) -> Result<ChangedLines> {
    let text =
        std::fs::read_to_string(path).map_err(|source| DiffcoverError::io(path, source))?;
    Ok(parse(&text))
}

/// Scanner state carried across diff lines: the file currently being walked
/// and the line number the next new-side line will occupy.
///
/// `new_line` is only meaningful after a hunk header has been seen; lines
/// before the first `+++ b/` header are inert because no file is current.
#[derive(Debug, Default)]
struct Scanner {
    current_file: Option<String>,
    new_line: u32,
}

impl Scanner {
    /// Advance the state machine by one diff line, recording added lines
    /// into `changed`.
    fn step(&mut self, line: &str, changed: &mut ChangedLines) {
        if let Some(caps) = FILE_RE.captures(line) {
            let file = caps[1].to_string();
            // Insert the entry up front so a header with no added lines
            // still shows up (with an empty set).
            changed.entry(file.clone()).or_default();
            self.current_file = Some(file);
        } else if let Some(caps) = HUNK_RE.captures(line) {
            // The pattern admits only digits; overflow is the only way this
            // can fail, and a zero cursor is as good as any then.
            self.new_line = caps[1].parse().unwrap_or(0);
        } else if line.starts_with('+') && !line.starts_with("+++") {
            if let Some(file) = &self.current_file {
                changed.entry(file.clone()).or_default().insert(self.new_line);
            }
            self.new_line += 1;
        } else if line.starts_with('-') && !line.starts_with("---") {
            // Removed lines do not exist in the new file: no cursor movement.
        } else {
            // Context lines, and anything that merely resembles a header
            // (including `@@` lines the hunk pattern rejects), occupy one
            // line in the new file.
            self.new_line += 1;
        }
    }
}
