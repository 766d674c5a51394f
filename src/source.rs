// This file is part of sh-syntax, a shell script parser and printer.
// Copyright (C) 2024 sh-syntax authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Source code positions
//!
//! A [`Pos`] is a 1-based byte offset into the source code that was given to
//! the parser. The offset `0` is reserved for nodes whose position is
//! unknown, such as nodes constructed by hand rather than by parsing.
//!
//! Byte offsets alone are cheap to carry in every AST node but are not very
//! useful to humans. The [`Lines`] table, built by the lexer while reading
//! the source and kept in the parsed [`File`](crate::syntax::File), maps an
//! offset back to a 1-based `(line, column)` pair by binary search.

use std::fmt;

/// Position of a syntactic element in the source code
///
/// A position is a 1-based byte offset. The default value is
/// [`Pos::NONE`], which stands for an unknown position.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Pos(u64);

impl Pos {
    /// Position of a node that was not produced by the parser
    pub const NONE: Pos = Pos(0);

    /// Creates a position from a 1-based byte offset.
    ///
    /// # Panics
    ///
    /// If `offset` is zero, which is reserved for [`Pos::NONE`].
    #[must_use]
    pub fn new(offset: u64) -> Pos {
        assert!(offset != 0, "byte offsets are 1-based");
        Pos(offset)
    }

    /// Returns the 1-based byte offset, or 0 for [`Pos::NONE`].
    #[must_use]
    pub fn offset(self) -> u64 {
        self.0
    }

    /// Whether this position refers to an actual place in the source.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.0 != 0
    }

    /// Returns the position `n` bytes after this one.
    ///
    /// Returns [`Pos::NONE`] unchanged.
    #[must_use]
    pub fn after(self, n: u64) -> Pos {
        if self.is_valid() { Pos(self.0 + n) } else { self }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Table of line start offsets
///
/// The table contains the 1-based byte offset of the first byte of every
/// line of the source, in strictly increasing order. The first entry is
/// always 1. For every newline byte at offset `k` the table contains `k + 1`
/// exactly once, even when the newline is the last byte of the source.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Lines {
    starts: Vec<u64>,
}

impl Default for Lines {
    fn default() -> Self {
        Lines::new()
    }
}

impl Lines {
    /// Creates a table for a source of which nothing has been read yet.
    #[must_use]
    pub fn new() -> Lines {
        Lines { starts: vec![1] }
    }

    /// Records the start offset of a new line.
    ///
    /// # Panics
    ///
    /// If `start` is not greater than the last recorded offset.
    pub(crate) fn push(&mut self, start: u64) {
        assert!(
            *self.starts.last().unwrap() < start,
            "line starts must be strictly increasing"
        );
        self.starts.push(start);
    }

    /// Number of lines recorded so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.starts.len()
    }

    /// Returns the recorded line start offsets.
    #[must_use]
    pub fn starts(&self) -> &[u64] {
        &self.starts
    }

    /// Returns the 1-based line number containing `pos`, or 0 for
    /// [`Pos::NONE`].
    #[must_use]
    pub fn line(&self, pos: Pos) -> u64 {
        self.line_col(pos).0
    }

    /// Maps a position to a 1-based `(line, column)` pair.
    ///
    /// The column counts bytes, not display cells. [`Pos::NONE`] maps to
    /// `(0, 0)`.
    ///
    /// ```
    /// # use sh_syntax::source::{Lines, Pos};
    /// let lines = Lines::new();
    /// assert_eq!(lines.line_col(Pos::new(3)), (1, 3));
    /// ```
    #[must_use]
    pub fn line_col(&self, pos: Pos) -> (u64, u64) {
        if !pos.is_valid() {
            return (0, 0);
        }
        let i = self.starts.partition_point(|&start| start <= pos.offset());
        debug_assert!(i > 0);
        (i as u64, pos.offset() - self.starts[i - 1] + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pos_none_is_invalid() {
        assert!(!Pos::NONE.is_valid());
        assert!(!Pos::default().is_valid());
        assert_eq!(Pos::NONE.offset(), 0);
    }

    #[test]
    fn pos_new_and_after() {
        let pos = Pos::new(7);
        assert!(pos.is_valid());
        assert_eq!(pos.offset(), 7);
        assert_eq!(pos.after(3).offset(), 10);
        assert_eq!(Pos::NONE.after(3), Pos::NONE);
    }

    #[test]
    #[should_panic(expected = "byte offsets are 1-based")]
    fn pos_new_rejects_zero() {
        let _ = Pos::new(0);
    }

    #[test]
    fn lines_single_line() {
        let lines = Lines::new();
        assert_eq!(lines.count(), 1);
        assert_eq!(lines.line_col(Pos::new(1)), (1, 1));
        assert_eq!(lines.line_col(Pos::new(42)), (1, 42));
    }

    #[test]
    fn lines_multiple_lines() {
        // "ab\ncde\n\nf"
        let mut lines = Lines::new();
        lines.push(4);
        lines.push(8);
        lines.push(9);

        assert_eq!(lines.line_col(Pos::new(1)), (1, 1));
        assert_eq!(lines.line_col(Pos::new(3)), (1, 3));
        assert_eq!(lines.line_col(Pos::new(4)), (2, 1));
        assert_eq!(lines.line_col(Pos::new(7)), (2, 4));
        assert_eq!(lines.line_col(Pos::new(8)), (3, 1));
        assert_eq!(lines.line_col(Pos::new(9)), (4, 1));
        assert_eq!(lines.line(Pos::new(9)), 4);
    }

    #[test]
    fn lines_unknown_position() {
        let lines = Lines::new();
        assert_eq!(lines.line_col(Pos::NONE), (0, 0));
    }

    #[test]
    #[should_panic(expected = "strictly increasing")]
    fn lines_rejects_non_increasing_start() {
        let mut lines = Lines::new();
        lines.push(5);
        lines.push(5);
    }
}
