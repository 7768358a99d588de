//! A markup buffer together with its cursor and selection.
//!
//! `execute` edits through [`MarkupDocument`] so the command logic does not
//! care how text or history is stored.

use std::ops::Range;

use smol_str::SmolStr;

use crate::text::TextBuffer;
use crate::types::Selection;
use crate::undo::History;

pub trait MarkupDocument {
    type Buffer: TextBuffer + History;

    fn buffer(&self) -> &Self::Buffer;

    fn buffer_mut(&mut self) -> &mut Self::Buffer;

    fn cursor_offset(&self) -> usize;

    /// Implementations clamp `offset` to the buffer length.
    fn set_cursor_offset(&mut self, offset: usize);

    fn selection(&self) -> Option<Selection>;

    fn set_selection(&mut self, selection: Option<Selection>);

    fn markup(&self) -> String {
        self.buffer().contents()
    }

    fn len_chars(&self) -> usize {
        self.buffer().len_chars()
    }

    fn slice(&self, range: Range<usize>) -> Option<SmolStr> {
        self.buffer().slice(range)
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.buffer().char_at(offset)
    }

    /// The selection, unless it is a bare cursor.
    fn active_selection(&self) -> Option<Selection> {
        self.selection().filter(|sel| !sel.is_collapsed())
    }

    /// What an insertion would replace: the selection, or an empty range at
    /// the cursor.
    fn selection_or_cursor(&self) -> Range<usize> {
        match self.active_selection() {
            Some(sel) => sel.to_range(),
            None => self.cursor_offset()..self.cursor_offset(),
        }
    }

    fn selected_text(&self) -> Option<SmolStr> {
        self.active_selection()
            .and_then(|sel| self.slice(sel.to_range()))
    }

    /// Insert at `offset`; the cursor ends after the new text.
    fn insert(&mut self, offset: usize, text: &str) {
        let offset = offset.min(self.len_chars());
        self.buffer_mut().insert(offset, text);
        self.set_cursor_offset(offset + text.chars().count());
    }

    /// Remove `range`; the cursor ends where it started.
    fn remove(&mut self, range: Range<usize>) {
        let len = self.len_chars();
        let range = range.start.min(len)..range.end.min(len);
        self.buffer_mut().remove(range.clone());
        self.set_cursor_offset(range.start);
    }

    fn replace(&mut self, range: Range<usize>, text: &str) {
        let len = self.len_chars();
        let range = range.start.min(len)..range.end.min(len);
        let start = range.start;
        self.buffer_mut().replace(range, text);
        self.set_cursor_offset(start + text.chars().count());
    }

    fn undo(&mut self) -> bool {
        let changed = self.buffer_mut().undo();
        if changed {
            self.collapse_into_bounds();
        }
        changed
    }

    fn redo(&mut self) -> bool {
        let changed = self.buffer_mut().redo();
        if changed {
            self.collapse_into_bounds();
        }
        changed
    }

    fn can_undo(&self) -> bool {
        self.buffer().can_undo()
    }

    fn can_redo(&self) -> bool {
        self.buffer().can_redo()
    }

    /// Everything `f` changes is undone by a single undo.
    fn grouped<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R
    where
        Self: Sized,
    {
        self.buffer_mut().begin_step();
        let result = f(self);
        self.buffer_mut().end_step();
        result
    }

    /// Drop the selection and pull the cursor back inside the markup.
    fn collapse_into_bounds(&mut self) {
        self.set_cursor_offset(self.cursor_offset());
        self.set_selection(None);
    }
}

/// [`MarkupDocument`] holding its state in plain fields.
#[derive(Clone, Debug)]
pub struct TextDocument<T> {
    buffer: T,
    cursor: usize,
    selection: Option<Selection>,
}

impl<T: TextBuffer + History> TextDocument<T> {
    /// Cursor starts at the beginning.
    pub fn new(buffer: T) -> Self {
        Self {
            buffer,
            cursor: 0,
            selection: None,
        }
    }

    /// Swap the buffer out wholesale, e.g. to load new markup without history.
    pub fn reset(&mut self, buffer: T) {
        self.buffer = buffer;
        self.collapse_into_bounds();
    }
}

impl<T: TextBuffer + History> MarkupDocument for TextDocument<T> {
    type Buffer = T;

    fn buffer(&self) -> &T {
        &self.buffer
    }

    fn buffer_mut(&mut self) -> &mut T {
        &mut self.buffer
    }

    fn cursor_offset(&self) -> usize {
        self.cursor
    }

    fn set_cursor_offset(&mut self, offset: usize) {
        self.cursor = offset.min(self.buffer.len_chars());
    }

    fn selection(&self) -> Option<Selection> {
        self.selection
    }

    fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::RopeBuffer;
    use crate::undo::HistoryBuffer;

    fn doc(markup: &str) -> TextDocument<HistoryBuffer<RopeBuffer>> {
        TextDocument::new(HistoryBuffer::new(RopeBuffer::from_markup(markup), 100))
    }

    #[test]
    fn test_cursor_follows_edits() {
        let mut doc = doc("<p>one</p>");
        doc.insert(6, " two");
        assert_eq!(doc.markup(), "<p>one two</p>");
        assert_eq!(doc.cursor_offset(), 10);

        doc.remove(6..10);
        assert_eq!(doc.markup(), "<p>one</p>");
        assert_eq!(doc.cursor_offset(), 6);

        doc.replace(3..6, "three");
        assert_eq!(doc.markup(), "<p>three</p>");
        assert_eq!(doc.cursor_offset(), 8);
    }

    #[test]
    fn test_cursor_clamped() {
        let mut doc = doc("abc");
        doc.set_cursor_offset(50);
        assert_eq!(doc.cursor_offset(), 3);
        doc.insert(50, "d");
        assert_eq!(doc.markup(), "abcd");
    }

    #[test]
    fn test_grouped_undo_and_cursor_clamp() {
        let mut doc = doc("hello");
        doc.grouped(|d| {
            d.insert(5, "</u>");
            d.insert(0, "<u>");
        });
        doc.set_cursor_offset(12);
        assert_eq!(doc.markup(), "<u>hello</u>");

        assert!(doc.undo());
        assert_eq!(doc.markup(), "hello");
        assert_eq!(doc.cursor_offset(), 5);

        assert!(doc.redo());
        assert_eq!(doc.markup(), "<u>hello</u>");
    }

    #[test]
    fn test_selection_helpers() {
        let mut doc = doc("hello world");
        doc.set_cursor_offset(3);
        doc.set_selection(Some(Selection::collapsed(3)));
        assert!(doc.active_selection().is_none());
        assert_eq!(doc.selection_or_cursor(), 3..3);

        doc.set_selection(Some(Selection::new(11, 6)));
        assert_eq!(doc.selected_text(), Some("world".into()));
        assert_eq!(doc.selection_or_cursor(), 6..11);
    }

    #[test]
    fn test_reset_drops_history() {
        let mut doc = doc("a");
        doc.insert(1, "b");
        doc.reset(HistoryBuffer::new(RopeBuffer::from_markup("xyz"), 100));
        assert!(!doc.can_undo());
        assert_eq!(doc.cursor_offset(), 2);
        assert!(doc.selection().is_none());
    }
}
