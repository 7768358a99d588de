//! Character-addressed storage for serialized markup.
//!
//! Offsets throughout the editor count Unicode scalar values, so a cursor
//! never lands inside a multi-byte character.

use std::ops::Range;

use smol_str::{SmolStr, ToSmolStr};

pub trait TextBuffer {
    fn len_chars(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    /// Insert `text` before the char at `at`.
    fn insert(&mut self, at: usize, text: &str);

    fn remove(&mut self, range: Range<usize>);

    fn replace(&mut self, range: Range<usize>, text: &str) {
        let at = range.start;
        self.remove(range);
        self.insert(at, text);
    }

    /// `None` when `range` runs past the end or is reversed.
    fn slice(&self, range: Range<usize>) -> Option<SmolStr>;

    fn char_at(&self, at: usize) -> Option<char>;

    fn contents(&self) -> String;
}

/// [`TextBuffer`] over a [`ropey::Rope`].
#[derive(Clone, Debug, Default)]
pub struct RopeBuffer(ropey::Rope);

impl RopeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_markup(markup: &str) -> Self {
        Self(ropey::Rope::from_str(markup))
    }

    fn clamp(&self, range: Range<usize>) -> Range<usize> {
        let len = self.0.len_chars();
        range.start.min(len)..range.end.min(len)
    }
}

impl TextBuffer for RopeBuffer {
    fn len_chars(&self) -> usize {
        self.0.len_chars()
    }

    fn insert(&mut self, at: usize, text: &str) {
        let at = at.min(self.0.len_chars());
        self.0.insert(at, text);
    }

    fn remove(&mut self, range: Range<usize>) {
        let range = self.clamp(range);
        if range.start < range.end {
            self.0.remove(range);
        }
    }

    fn slice(&self, range: Range<usize>) -> Option<SmolStr> {
        if range.start > range.end || range.end > self.0.len_chars() {
            return None;
        }
        Some(self.0.slice(range).to_smolstr())
    }

    fn char_at(&self, at: usize) -> Option<char> {
        (at < self.0.len_chars()).then(|| self.0.char(at))
    }

    fn contents(&self) -> String {
        self.0.to_string()
    }
}

impl From<&str> for RopeBuffer {
    fn from(markup: &str) -> Self {
        Self::from_markup(markup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edits_count_chars_not_bytes() {
        let mut buf = RopeBuffer::from_markup("<p>café</p>");
        assert_eq!(buf.len_chars(), 11);
        assert_eq!(buf.char_at(6), Some('é'));

        buf.insert(7, " crème");
        assert_eq!(buf.contents(), "<p>café crème</p>");

        buf.remove(7..13);
        assert_eq!(buf.contents(), "<p>café</p>");
    }

    #[test]
    fn test_out_of_range_is_clamped_or_none() {
        let mut buf = RopeBuffer::from_markup("abc");
        assert_eq!(buf.slice(1..9), None);
        assert_eq!(buf.slice(2..1), None);
        assert_eq!(buf.char_at(3), None);

        buf.insert(99, "d");
        buf.remove(2..99);
        assert_eq!(buf.contents(), "ab");
    }

    #[test]
    fn test_replace() {
        let mut buf = RopeBuffer::from("<b>x</b>");
        buf.replace(1..2, "strong");
        assert_eq!(buf.contents(), "<strong>x</b>");
    }
}
