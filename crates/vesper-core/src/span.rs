//! Source location tracking.
//!
//! The front end attaches a [`Span`] to every bound node. The backend only
//! needs the line (for the chunk's line array) and uses the column when
//! reporting internal errors.

use std::fmt;

/// Starting position of a bound node in its source file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, byte-based).
    pub col: u32,
}

impl Span {
    /// Create a span at the given line and column.
    #[inline]
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }

    /// Span at column 1 of `line`.
    #[inline]
    pub fn line(line: u32) -> Self {
        Self { line, col: 1 }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
