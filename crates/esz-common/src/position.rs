//! Source positions.
//!
//! Offsets are UTF-8 byte offsets into the source text. Lines are 0-based and
//! count ECMAScript line terminators (`\n`, `\r`, `\r\n` as one, U+2028,
//! U+2029). Columns are byte offsets from the start of the line.

use serde::Serialize;

/// A 0-based line/column pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    #[inline]
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

/// Half-open byte range `[start, end)` into the source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Range {
    pub start: u32,
    pub end: u32,
}

impl Range {
    #[inline]
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Range { start, end }
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest range covering both.
    #[inline]
    #[must_use]
    pub fn cover(self, other: Range) -> Range {
        Range {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    #[inline]
    #[must_use]
    pub const fn contains(&self, offset: u32) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// Start and end positions of a syntax element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    pub start: Position,
    pub end: Position,
}

impl Location {
    #[inline]
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Location { start, end }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cover_spans_both_ranges() {
        let a = Range::new(4, 9);
        let b = Range::new(1, 6);
        assert_eq!(a.cover(b), Range::new(1, 9));
        assert_eq!(a.len(), 5);
        assert!(a.contains(4));
        assert!(!a.contains(9));
    }

    #[test]
    fn positions_order_by_line_then_column() {
        assert!(Position::new(0, 10) < Position::new(1, 0));
        assert!(Position::new(2, 3) < Position::new(2, 4));
    }
}
