//! Source file model: immutable text plus a line-start table for mapping
//! byte offsets to 1-indexed (line, column) positions.
//!
//! Grounded on the teacher's `text.rs`/`treesitter.rs` (byte-range-first
//! text handling) generalized from a single in-memory slice to an owned,
//! reusable `SourceFile` value per spec.md §3.

use std::path::{Path, PathBuf};

/// A 1-indexed line/column position, columns counted in UTF-16 code units
/// to match editor conventions (spec.md §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// A half-open byte range `[start, end)` inside a single source file's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    pub fn new(start: usize, end: usize) -> Self {
        assert!(start <= end, "range start {start} must be <= end {end}");
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Strict interval overlap, equal ranges, or two insertions (empty
    /// ranges) at the same offset — the conflict test the fix composer
    /// uses (spec.md §4.5 invariant 3).
    pub fn conflicts_with(&self, other: &Range) -> bool {
        if self.start == other.start && self.end == other.end {
            return true;
        }
        self.start < other.end && other.start < self.end
    }
}

/// An immutable unit of analysis: a file path, its raw UTF-8 text, and a
/// line-start table. Invariants (spec.md §3): `text` is UTF-8;
/// `line_starts[0] == 0`; every offset in `[0, text.len()]` maps to exactly
/// one line via `line_starts`.
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
    text: String,
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let text = text.into();
        let line_starts = compute_line_starts(&text);
        Self {
            path: path.into(),
            text,
            line_starts,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_starts(&self) -> &[usize] {
        &self.line_starts
    }

    pub fn slice(&self, range: Range) -> &str {
        &self.text[range.start..range.end]
    }

    /// 1-indexed line containing byte offset `offset`.
    pub fn line_of(&self, offset: usize) -> u32 {
        match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact as u32 + 1,
            Err(insertion_point) => insertion_point as u32,
        }
    }

    /// 1-indexed (line, column) for a byte offset, columns in UTF-16 code units.
    pub fn position_of(&self, offset: usize) -> Position {
        let line = self.line_of(offset);
        let line_start = self.line_starts[(line - 1) as usize];
        let column = self.text[line_start..offset].encode_utf16().count() as u32 + 1;
        Position { line, column }
    }

    /// Trim leading trivia (whitespace) from a byte offset forward, used by
    /// rules that want a node's "meaningful" start rather than its raw
    /// token start (spec.md component table: "Source map & ranges").
    pub fn trim_leading_trivia(&self, range: Range) -> Range {
        let trimmed_start = self.text[range.start..range.end]
            .find(|c: char| !c.is_whitespace())
            .map(|rel| range.start + rel)
            .unwrap_or(range.end);
        Range::new(trimmed_start, range.end)
    }
}

fn compute_line_starts(text: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (offset, ch) in text.char_indices() {
        if ch == '\n' {
            starts.push(offset + 1);
        }
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_starts_at_zero() {
        let file = SourceFile::new("f.ts", "const x = 1;\nconst y = 2;\n");
        assert_eq!(file.line_starts()[0], 0);
    }

    #[test]
    fn position_on_first_line() {
        let file = SourceFile::new("f.ts", "const x = 1;");
        let pos = file.position_of(6);
        assert_eq!(pos, Position { line: 1, column: 7 });
    }

    #[test]
    fn position_on_second_line() {
        let file = SourceFile::new("f.ts", "const x = 1;\nconst y = 2;");
        let second_line_start = file.line_starts()[1];
        let pos = file.position_of(second_line_start + 6);
        assert_eq!(pos, Position { line: 2, column: 7 });
    }

    #[test]
    fn utf16_column_counts_surrogate_pairs_as_two() {
        // "😀" is one Unicode scalar value but two UTF-16 code units.
        let file = SourceFile::new("f.ts", "const x = \"😀\";\nconst y = 1;");
        let second_line_start = file.line_starts()[1];
        let pos = file.position_of(second_line_start);
        assert_eq!(pos, Position { line: 2, column: 1 });
    }

    #[test]
    fn range_conflict_detection() {
        let a = Range::new(5, 10);
        let b = Range::new(8, 12);
        let c = Range::new(10, 15);
        assert!(a.conflicts_with(&b));
        assert!(!a.conflicts_with(&c));
        // Two insertions at the same offset conflict even though neither
        // range covers any text (spec.md §4.5 invariant 3).
        let insertion_a = Range::new(5, 5);
        let insertion_b = Range::new(5, 5);
        assert!(insertion_a.conflicts_with(&insertion_b));
        let insertion_elsewhere = Range::new(6, 6);
        assert!(!insertion_a.conflicts_with(&insertion_elsewhere));
    }

    #[test]
    fn trim_leading_trivia_skips_whitespace() {
        let file = SourceFile::new("f.ts", "   foo");
        let trimmed = file.trim_leading_trivia(Range::new(0, 6));
        assert_eq!(file.slice(trimmed), "foo");
    }
}
