//! In-memory rich-text host.
//!
//! Stores the serialized HTML in a rope with grouped undo, and executes
//! commands by rewriting the markup directly. Used outside the browser and as
//! the reference behavior for tests.

use tracing::debug;

use crate::commands::{EditorAction, FormatCommand};
use crate::document::{MarkupDocument, TextDocument};
use crate::execute::{execute_action, execute_format, insert_markup, is_format_active};
use crate::host::RichTextHost;
use crate::markup;
use crate::text::RopeBuffer;
use crate::types::{Selection, ToggleFormat};
use crate::undo::HistoryBuffer;

pub const DEFAULT_UNDO_DEPTH: usize = 100;

type Document = TextDocument<HistoryBuffer<RopeBuffer>>;

#[derive(Clone)]
pub struct MarkupHost {
    doc: Document,
    undo_depth: usize,
    focused: bool,
}

impl Default for MarkupHost {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_DEPTH)
    }
}

impl MarkupHost {
    pub fn new(undo_depth: usize) -> Self {
        Self {
            doc: TextDocument::new(HistoryBuffer::new(RopeBuffer::new(), undo_depth)),
            undo_depth,
            focused: false,
        }
    }

    /// Host seeded with `markup`, cursor at the end.
    pub fn with_markup(markup: &str) -> Self {
        let mut host = Self::default();
        host.set_markup(markup);
        host
    }

    /// Apply a keystroke-level edit, as the platform would on user input.
    pub fn apply_action(&mut self, action: &EditorAction) -> bool {
        execute_action(&mut self.doc, action)
    }

    /// Type text at the cursor, replacing any selection.
    pub fn type_text(&mut self, text: &str) -> bool {
        let range = self.doc.selection_or_cursor();
        self.apply_action(&EditorAction::Insert {
            text: text.to_owned(),
            range: range.into(),
        })
    }

    pub fn cursor(&self) -> usize {
        self.doc.cursor_offset()
    }

    pub fn set_cursor(&mut self, offset: usize) {
        self.doc.set_cursor_offset(offset);
        self.doc.set_selection(None);
    }

    pub fn select(&mut self, anchor: usize, head: usize) {
        let len = self.doc.len_chars();
        let selection = Selection::new(anchor.min(len), head.min(len));
        self.doc.set_selection(Some(selection));
        self.doc.set_cursor_offset(selection.head);
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Drop focus, as when a dialog opens.
    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn can_undo(&self) -> bool {
        self.doc.can_undo()
    }
}

impl RichTextHost for MarkupHost {
    type Bookmark = Selection;

    fn execute(&mut self, command: &FormatCommand) -> bool {
        let changed = execute_format(&mut self.doc, *command);
        if !changed {
            debug!(?command, "command produced no change");
        }
        changed
    }

    fn insert_html(&mut self, html: &str) -> bool {
        insert_markup(&mut self.doc, html)
    }

    fn query_state(&self, format: ToggleFormat) -> bool {
        is_format_active(&self.doc, format)
    }

    fn markup(&self) -> String {
        self.doc.markup()
    }

    /// Replaces the content without recording an undo step.
    fn set_markup(&mut self, markup: &str) {
        let markup = markup::one_block_per_line(markup);
        self.doc
            .reset(HistoryBuffer::new(RopeBuffer::from_markup(&markup), self.undo_depth));
        let len = self.doc.len_chars();
        self.doc.set_cursor_offset(len);
        self.doc.set_selection(None);
    }

    fn selected_markup(&self) -> Option<String> {
        self.doc.selected_text().map(String::from)
    }

    fn selection(&self) -> Option<Selection> {
        Some(
            self.doc
                .active_selection()
                .unwrap_or_else(|| Selection::collapsed(self.doc.cursor_offset())),
        )
    }

    fn restore_selection(&mut self, bookmark: &Selection) {
        if bookmark.is_collapsed() {
            self.set_cursor(bookmark.head);
        } else {
            self.select(bookmark.anchor, bookmark.head);
        }
    }

    fn focus(&mut self) {
        self.focused = true;
    }
}
