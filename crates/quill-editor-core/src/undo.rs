//! Step-based undo history.
//!
//! A step is everything recorded between [`History::begin_step`] and the
//! matching [`History::end_step`]; an edit made outside any step is a step of
//! its own. Formatting commands touch the markup in several places (open tag,
//! close tag), and a step lets one undo revert all of it.

use std::collections::VecDeque;
use std::ops::Range;

use smol_str::SmolStr;

use crate::text::TextBuffer;

pub trait History {
    fn can_undo(&self) -> bool;

    fn can_redo(&self) -> bool;

    /// Revert the newest step. False if there is none.
    fn undo(&mut self) -> bool;

    /// Reapply the newest undone step. False if there is none.
    fn redo(&mut self) -> bool;

    /// Steps nest; only the outermost `end_step` closes one.
    fn begin_step(&mut self);

    fn end_step(&mut self);
}

#[derive(Debug, Clone)]
struct Change {
    at: usize,
    removed: SmolStr,
    added: SmolStr,
}

impl Change {
    fn revert(&self, buf: &mut impl TextBuffer) {
        buf.remove(self.at..self.at + self.added.chars().count());
        buf.insert(self.at, &self.removed);
    }

    fn apply(&self, buf: &mut impl TextBuffer) {
        buf.remove(self.at..self.at + self.removed.chars().count());
        buf.insert(self.at, &self.added);
    }
}

/// Records every change made through it, keeping at most `depth` steps.
#[derive(Debug, Clone)]
pub struct HistoryBuffer<T> {
    text: T,
    done: VecDeque<Vec<Change>>,
    undone: Vec<Vec<Change>>,
    pending: Vec<Change>,
    nesting: usize,
    depth: usize,
}

impl<T: TextBuffer> HistoryBuffer<T> {
    pub fn new(text: T, depth: usize) -> Self {
        Self {
            text,
            done: VecDeque::new(),
            undone: Vec::new(),
            pending: Vec::new(),
            nesting: 0,
            depth,
        }
    }

    pub fn text(&self) -> &T {
        &self.text
    }

    fn record(&mut self, change: Change) {
        self.undone.clear();
        self.pending.push(change);
        if self.nesting == 0 {
            self.close_step();
        }
    }

    fn close_step(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        self.done.push_back(std::mem::take(&mut self.pending));
        while self.done.len() > self.depth {
            self.done.pop_front();
        }
    }
}

impl<T: TextBuffer> TextBuffer for HistoryBuffer<T> {
    fn len_chars(&self) -> usize {
        self.text.len_chars()
    }

    fn insert(&mut self, at: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let at = at.min(self.text.len_chars());
        self.record(Change {
            at,
            removed: SmolStr::default(),
            added: text.into(),
        });
        self.text.insert(at, text);
    }

    fn remove(&mut self, range: Range<usize>) {
        let Some(removed) = self.text.slice(range.clone()) else {
            return;
        };
        if removed.is_empty() {
            return;
        }
        self.record(Change {
            at: range.start,
            removed,
            added: SmolStr::default(),
        });
        self.text.remove(range);
    }

    fn slice(&self, range: Range<usize>) -> Option<SmolStr> {
        self.text.slice(range)
    }

    fn char_at(&self, at: usize) -> Option<char> {
        self.text.char_at(at)
    }

    fn contents(&self) -> String {
        self.text.contents()
    }
}

impl<T: TextBuffer> History for HistoryBuffer<T> {
    fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    fn undo(&mut self) -> bool {
        let Some(step) = self.done.pop_back() else {
            return false;
        };
        for change in step.iter().rev() {
            change.revert(&mut self.text);
        }
        self.undone.push(step);
        true
    }

    fn redo(&mut self) -> bool {
        let Some(step) = self.undone.pop() else {
            return false;
        };
        for change in &step {
            change.apply(&mut self.text);
        }
        self.done.push_back(step);
        true
    }

    fn begin_step(&mut self) {
        self.nesting += 1;
    }

    fn end_step(&mut self) {
        match self.nesting {
            0 => {}
            1 => {
                self.nesting = 0;
                self.close_step();
            }
            _ => self.nesting -= 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::RopeBuffer;

    fn history(markup: &str, depth: usize) -> HistoryBuffer<RopeBuffer> {
        HistoryBuffer::new(RopeBuffer::from_markup(markup), depth)
    }

    #[test]
    fn test_single_edit_round_trip() {
        let mut buf = history("<p>hi</p>", 10);
        assert!(!buf.can_undo());

        buf.insert(5, " there");
        assert_eq!(buf.contents(), "<p>hi there</p>");
        assert!(buf.undo());
        assert_eq!(buf.contents(), "<p>hi</p>");
        assert!(buf.can_redo());
        assert!(buf.redo());
        assert_eq!(buf.contents(), "<p>hi there</p>");
    }

    #[test]
    fn test_step_reverts_as_one() {
        let mut buf = history("word", 10);
        buf.begin_step();
        buf.insert(4, "</strong>");
        buf.insert(0, "<strong>");
        buf.end_step();
        assert_eq!(buf.contents(), "<strong>word</strong>");

        assert!(buf.undo());
        assert_eq!(buf.contents(), "word");
        assert!(!buf.can_undo());

        assert!(buf.redo());
        assert_eq!(buf.contents(), "<strong>word</strong>");
    }

    #[test]
    fn test_nested_steps() {
        let mut buf = history("", 10);
        buf.begin_step();
        buf.insert(0, "a");
        buf.begin_step();
        buf.insert(1, "b");
        buf.end_step();
        // Still inside the outer step.
        assert!(!buf.can_undo());
        buf.insert(2, "c");
        buf.end_step();

        assert!(buf.undo());
        assert_eq!(buf.contents(), "");
        assert!(!buf.undo());
    }

    #[test]
    fn test_empty_step_not_recorded() {
        let mut buf = history("x", 10);
        buf.begin_step();
        buf.insert(0, "");
        buf.remove(1..1);
        buf.end_step();
        assert!(!buf.can_undo());
    }

    #[test]
    fn test_new_edit_drops_redo() {
        let mut buf = history("abc", 10);
        buf.insert(3, "d");
        assert!(buf.undo());
        buf.insert(3, "e");
        assert!(!buf.can_redo());
        assert_eq!(buf.contents(), "abce");
    }

    #[test]
    fn test_depth_limit_drops_oldest() {
        let mut buf = history("", 2);
        buf.insert(0, "a");
        buf.insert(1, "b");
        buf.insert(2, "c");

        assert!(buf.undo());
        assert!(buf.undo());
        assert!(!buf.undo());
        assert_eq!(buf.contents(), "a");
    }

    #[test]
    fn test_replace_is_one_step_inside_a_step() {
        let mut buf = history("<h1>Title</h1>", 10);
        buf.begin_step();
        buf.replace(0..4, "<h2>");
        buf.replace(9..14, "</h2>");
        buf.end_step();
        assert_eq!(buf.contents(), "<h2>Title</h2>");

        assert!(buf.undo());
        assert_eq!(buf.contents(), "<h1>Title</h1>");
    }
}
