//! Parser and writer for Go's `-coverprofile` format.
//!
//! Reference: https://go.dev/blog/cover
//!
//! Format:
//!   mode: set|count|atomic
//!   <file>:<startLine>.<startCol>,<endLine>.<endCol> <numStmt> <count>
//!
//! Blocks are kept whole, in read order, with their raw text preserved so the
//! filtered profile can be re-emitted without reformatting. Malformed lines
//! are skipped rather than rejected: profiles in the wild (especially ones
//! produced by merge scripts) contain stray formatting, and a bad line must
//! not fail the gate.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::{DiffcoverError, Result};
use crate::model::CoverBlock;

/// Parse a coverage profile from text, preserving read order.
pub fn parse(input: &str) -> Vec<CoverBlock> {
    input.lines().filter_map(parse_block_line).collect()
}

/// Parse a coverage profile file.
pub fn parse_file(path: &Path) -> Result<Vec<CoverBlock>> {
    let text =
        std::fs::read_to_string(path).map_err(|source| DiffcoverError::io(path, source))?;
    Ok(parse(&text))
}

/// Parse a single block line.
///
/// Returns `None` for the mode header and for any line that does not have
/// exactly three whitespace-separated fields or a well-shaped location.
fn parse_block_line(line: &str) -> Option<CoverBlock> {
    if line.starts_with("mode:") {
        return None;
    }

    // Blank lines fall out here too: zero fields is not three.
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 3 {
        return None;
    }

    // location = <file>:<startLine>.<startCol>,<endLine>.<endCol>
    // Split on the first colon only; the range must have exactly two endpoints.
    let (file, range) = fields[0].split_once(':')?;
    let mut endpoints = range.split(',');
    let start = endpoints.next()?;
    let end = endpoints.next()?;
    if endpoints.next().is_some() {
        return None;
    }

    let (start_line, start_col) = parse_point(start);
    let (end_line, end_col) = parse_point(end);

    Some(CoverBlock {
        file: file.to_string(),
        start_line,
        start_col,
        end_line,
        end_col,
        num_stmt: lenient(fields[1]),
        count: lenient(fields[2]),
        raw: line.to_string(),
    })
}

/// Split a `line.col` endpoint. A missing or non-numeric component degrades
/// to zero instead of failing the line.
fn parse_point(s: &str) -> (u32, u32) {
    let (line, col) = s.split_once('.').unwrap_or((s, ""));
    (line.parse().unwrap_or(0), col.parse().unwrap_or(0))
}

/// Best-effort numeric field: zero on parse failure, never an error.
fn lenient(s: &str) -> u64 {
    s.parse().unwrap_or(0)
}

/// Write a profile to any sink. The mode header is always `set`: filtering
/// drops blocks, so the result is no longer a faithful count-mode profile.
pub fn write(mut w: impl Write, blocks: &[CoverBlock]) -> io::Result<()> {
    writeln!(w, "mode: set")?;
    for block in blocks {
        writeln!(w, "{}", block.raw)?;
    }
    Ok(())
}

/// Write a profile file, creating or truncating `path`.
pub fn write_file(path: &Path, blocks: &[CoverBlock]) -> Result<()> {
    let file = File::create(path).map_err(|source| DiffcoverError::io(path, source))?;
    let mut out = BufWriter::new(file);
    write(&mut out, blocks)
        .and_then(|()| out.flush())
        .map_err(|source| DiffcoverError::io(path, source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let input = "mode: count\n\
            example.com/pkg/main.go:10.2,12.16 3 5\n\
            example.com/pkg/util.go:5.1,7.2 2 0\n";
        let blocks = parse(input);

        assert_eq!(blocks.len(), 2);

        let first = &blocks[0];
        assert_eq!(first.file, "example.com/pkg/main.go");
        assert_eq!(first.start_line, 10);
        assert_eq!(first.start_col, 2);
        assert_eq!(first.end_line, 12);
        assert_eq!(first.end_col, 16);
        assert_eq!(first.num_stmt, 3);
        assert_eq!(first.count, 5);
        assert!(first.covered());
        assert_eq!(first.raw, "example.com/pkg/main.go:10.2,12.16 3 5");

        assert!(!blocks[1].covered());
    }

    #[test]
    fn test_parse_preserves_read_order() {
        let input = "b.go:5.1,6.2 1 1\na.go:1.1,2.2 1 1\nb.go:1.1,2.2 1 1\n";
        let blocks = parse(input);
        let files: Vec<&str> = blocks.iter().map(|b| b.file.as_str()).collect();
        assert_eq!(files, ["b.go", "a.go", "b.go"]);
    }

    #[test]
    fn test_parse_skips_wrong_field_count() {
        // Two fields, four fields, blank: all skipped without error.
        let input = "mode: set\n\
            foo.go:5.1,7.2 3\n\
            \n\
            foo.go:5.1,7.2 3 1 9\n\
            foo.go:8.1,9.2 1 1\n";
        let blocks = parse(input);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].start_line, 8);
    }

    #[test]
    fn test_parse_skips_malformed_location() {
        // No colon; no comma; three endpoints.
        let input = "foo.go 3 1\n\
            foo.go:5.1 3 1\n\
            foo.go:5.1,6.2,7.3 3 1\n";
        assert!(parse(input).is_empty());
    }

    #[test]
    fn test_parse_zero_fills_bad_numbers() {
        let blocks = parse("foo.go:x.1,7.y 3a 1\n");
        assert_eq!(blocks.len(), 1);
        let block = &blocks[0];
        assert_eq!(block.start_line, 0);
        assert_eq!(block.start_col, 1);
        assert_eq!(block.end_line, 7);
        assert_eq!(block.end_col, 0);
        assert_eq!(block.num_stmt, 0);
        assert_eq!(block.count, 1);
    }

    #[test]
    fn test_parse_missing_column_component() {
        let blocks = parse("foo.go:5,7.2 3 1\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].start_line, 5);
        assert_eq!(blocks[0].start_col, 0);
    }

    #[test]
    fn test_parse_location_splits_on_first_colon() {
        let blocks = parse("C:5.1,7.2 3 1\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].file, "C");
        assert_eq!(blocks[0].start_line, 5);
    }

    #[test]
    fn test_write_forces_set_mode() {
        let blocks = parse("mode: atomic\nfoo.go:5.1,7.2 3 4\n");
        let mut out = Vec::new();
        write(&mut out, &blocks).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "mode: set\nfoo.go:5.1,7.2 3 4\n"
        );
    }

    #[test]
    fn test_write_empty() {
        let mut out = Vec::new();
        write(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "mode: set\n");
    }
}
