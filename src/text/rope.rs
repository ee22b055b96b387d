//! Rope storage for document text, backed by the ropey crate.

use ropey::{Rope, RopeSlice};
use std::ops::Range;

/// Wrapper around `ropey::Rope` with char-offset helpers used by the document.
///
/// Every offset taken or returned here is a character offset. Out-of-range
/// offsets are clamped rather than panicking.
#[derive(Clone, Debug, Default)]
pub struct RopeWrapper {
    rope: Rope,
}

impl RopeWrapper {
    /// Create a rope from a string.
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        Self {
            rope: Rope::from_str(s),
        }
    }

    /// Number of characters.
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Number of lines (a trailing break opens an empty last line).
    #[must_use]
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Character at `idx`, or `None` past the end.
    #[must_use]
    pub fn char_at(&self, idx: usize) -> Option<char> {
        self.rope.get_char(idx)
    }

    /// Slice of the rope; an inverted or out-of-range request yields an empty slice.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> RopeSlice<'_> {
        let len = self.len_chars();
        let end = range.end.min(len);
        let start = range.start.min(end);
        self.rope.slice(start..end)
    }

    /// Insert text at a character position (clamped to the end).
    pub fn insert(&mut self, char_idx: usize, text: &str) {
        let at = char_idx.min(self.len_chars());
        self.rope.insert(at, text);
    }

    /// Remove a range of characters (clamped to the rope).
    pub fn remove(&mut self, range: Range<usize>) {
        let len = self.len_chars();
        let end = range.end.min(len);
        let start = range.start.min(end);
        if start < end {
            self.rope.remove(start..end);
        }
    }

    /// Replace the entire contents.
    pub fn replace(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
    }

    /// Line index containing `char_idx`.
    #[must_use]
    pub fn char_to_line(&self, char_idx: usize) -> usize {
        self.rope.char_to_line(char_idx.min(self.len_chars()))
    }

    /// Char index at the start of a line; past the last line yields the end.
    #[must_use]
    pub fn line_to_char(&self, line_idx: usize) -> usize {
        if line_idx >= self.len_lines() {
            self.len_chars()
        } else {
            self.rope.line_to_char(line_idx)
        }
    }

    /// Find the first `target` character in `range`.
    #[must_use]
    pub fn find_char(&self, range: Range<usize>, target: char) -> Option<usize> {
        let start = range.start.min(self.len_chars());
        self.slice(range)
            .chars()
            .position(|ch| ch == target)
            .map(|pos| start + pos)
    }

    /// Convert to string.
    #[must_use]
    pub fn to_string(&self) -> String {
        self.rope.to_string()
    }
}
