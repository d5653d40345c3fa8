//! Source location tracking.
//!
//! Every lowered node carries a [`SourceLocation`] copied from the
//! tree-sitter node it came from. Rules never compute locations themselves;
//! they pass the span of the offending node through to the diagnostic.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Span of a syntax node.
///
/// Lines and columns are 1-indexed. Columns count bytes, matching
/// tree-sitter's `Point`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceLocation {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
    /// Byte offset of the first byte of the node.
    pub start_byte: usize,
    /// Byte offset one past the last byte of the node.
    pub end_byte: usize,
}

impl SourceLocation {
    /// Create a location from 1-indexed line/column pairs.
    #[must_use]
    pub const fn new(start_line: usize, start_column: usize, end_line: usize, end_column: usize) -> Self {
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
            start_byte: 0,
            end_byte: 0,
        }
    }

    /// Attach a byte range.
    #[must_use]
    pub const fn with_bytes(mut self, start_byte: usize, end_byte: usize) -> Self {
        self.start_byte = start_byte;
        self.end_byte = end_byte;
        self
    }

    /// Location of a tree-sitter node.
    pub fn of(node: tree_sitter::Node<'_>) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start_line: start.row + 1,
            start_column: start.column + 1,
            end_line: end.row + 1,
            end_column: end.column + 1,
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
        }
    }

    /// Is `other` fully inside this span?
    pub fn contains(&self, other: &SourceLocation) -> bool {
        (self.start_line, self.start_column) <= (other.start_line, other.start_column)
            && (other.end_line, other.end_column) <= (self.end_line, self.end_column)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_start_position() {
        let loc = SourceLocation::new(3, 5, 3, 11);
        assert_eq!(loc.to_string(), "3:5");
    }

    #[test]
    fn test_contains() {
        let outer = SourceLocation::new(1, 1, 10, 2);
        let inner = SourceLocation::new(4, 9, 4, 15);
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
    }
}
