//! Block model and scanning
//!
//! A block is a contiguous run of lines that starts at an anchor match and
//! extends over everything nested deeper than the anchor. Indentation is a
//! byte-level heuristic, not a parse.

pub mod indentation;
pub mod query;
pub mod scanner;

pub use indentation::Indentation;
pub use query::Query;
pub use scanner::{scan, split_lines};

/// A single source line with its 1-based line number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub number: usize,
    pub text: String,
}

/// Non-empty run of contiguous lines produced by the scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    lines: Vec<Line>,
}

impl Block {
    // Only the scanner builds blocks; it guarantees non-empty, contiguous lines.
    pub(crate) fn new(lines: Vec<Line>) -> Self {
        debug_assert!(!lines.is_empty());
        debug_assert!(lines.windows(2).all(|w| w[1].number == w[0].number + 1));
        Self { lines }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line_start(&self) -> usize {
        self.lines[0].number
    }

    pub fn line_end(&self) -> usize {
        self.lines[self.lines.len() - 1].number
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Canonical text of the block: lines joined with `\n`
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
