//! Source location tracking for error reporting.
//!
//! Provides [`Span`] to track where tokens, nodes and diagnostics occur in
//! source code.

use std::fmt;

/// A byte range of source code plus the line:column where it starts.
///
/// The byte range is what containment and merging operate on; line and
/// column are kept for display.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset of the first byte.
    pub start: u32,
    /// Byte offset one past the last byte.
    pub end: u32,
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, byte-based).
    pub col: u32,
}

impl Span {
    /// Create a new span from a byte range and its starting line/column.
    #[inline]
    pub fn new(start: u32, end: u32, line: u32, col: u32) -> Self {
        debug_assert!(start <= end);
        Self {
            start,
            end,
            line,
            col,
        }
    }

    /// Create a zero-length span at a position.
    #[inline]
    pub fn point(offset: u32, line: u32, col: u32) -> Self {
        Self::new(offset, offset, line, col)
    }

    /// Whether this span is empty (zero length).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The length of this span in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Zero-length span positioned just after this one.
    ///
    /// The line/column stay those of `self`'s start; only the byte range
    /// moves.
    #[inline]
    pub fn after(self) -> Span {
        Span {
            start: self.end,
            end: self.end,
            line: self.line,
            col: self.col + self.len(),
        }
    }

    /// Merge two spans into the smallest span covering both.
    ///
    /// The order of the arguments does not matter. The line/column come
    /// from whichever span starts first.
    #[inline]
    pub fn merge(self, other: Span) -> Span {
        let (first, _) = if self.start <= other.start {
            (self, other)
        } else {
            (other, self)
        };
        Span {
            start: first.start,
            end: self.end.max(other.end),
            line: first.line,
            col: first.col,
        }
    }

    /// Whether `other` lies entirely within this span.
    #[inline]
    pub fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_basics() {
        let span = Span::new(10, 15, 2, 3);
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
        assert!(Span::point(4, 1, 5).is_empty());
    }

    #[test]
    fn span_display() {
        let span = Span::new(0, 3, 10, 5);
        assert_eq!(format!("{span}"), "10:5");
        assert_eq!(format!("{span:?}"), "10:5");
    }

    #[test]
    fn span_merge_same_line() {
        let a = Span::new(4, 7, 1, 5);
        let b = Span::new(10, 14, 1, 11);
        let merged = a.merge(b);
        assert_eq!(merged.start, 4);
        assert_eq!(merged.end, 14);
        assert_eq!((merged.line, merged.col), (1, 5));
    }

    #[test]
    fn span_merge_reverse_order() {
        let a = Span::new(4, 7, 1, 5);
        let b = Span::new(10, 14, 1, 11);
        assert_eq!(b.merge(a), a.merge(b));
    }

    #[test]
    fn span_merge_different_lines() {
        let a = Span::new(0, 8, 1, 1);
        let b = Span::new(20, 21, 3, 1);
        let merged = a.merge(b);
        assert_eq!((merged.start, merged.end), (0, 21));
        assert_eq!((merged.line, merged.col), (1, 1));
    }

    #[test]
    fn span_merge_nested() {
        let outer = Span::new(0, 30, 1, 1);
        let inner = Span::new(5, 9, 1, 6);
        assert_eq!(outer.merge(inner), outer);
    }

    #[test]
    fn span_contains() {
        let outer = Span::new(0, 30, 1, 1);
        assert!(outer.contains(Span::new(5, 9, 1, 6)));
        assert!(outer.contains(outer));
        assert!(!outer.contains(Span::new(25, 31, 1, 26)));
    }

    #[test]
    fn span_after() {
        let span = Span::new(3, 6, 1, 4);
        let after = span.after();
        assert!(after.is_empty());
        assert_eq!(after.start, 6);
        assert_eq!(after.col, 7);
    }
}
