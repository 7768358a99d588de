//! The capability boundary between the widget and whatever actually edits.
//!
//! Browser hosts forward to native command execution on a `contenteditable`
//! region; [`MarkupHost`](crate::MarkupHost) edits serialized markup in memory.

use crate::commands::FormatCommand;
use crate::types::ToggleFormat;

/// Rich-text editing primitives the widget drives.
///
/// Unsupported commands are not errors: hosts return `false` and the widget
/// treats the command as a no-op.
pub trait RichTextHost {
    /// Saved insertion point, captured while a dialog has focus.
    type Bookmark: Clone;

    /// Apply a formatting command to the current selection.
    fn execute(&mut self, command: &FormatCommand) -> bool;

    /// Insert markup at the cursor, replacing any selection.
    fn insert_html(&mut self, html: &str) -> bool;

    /// Whether an inline toggle is active at the cursor.
    fn query_state(&self, format: ToggleFormat) -> bool;

    /// Full serialized markup of the editable region.
    fn markup(&self) -> String;

    fn set_markup(&mut self, markup: &str);

    /// Markup of the current selection, `None` when the selection is collapsed.
    fn selected_markup(&self) -> Option<String>;

    fn selection(&self) -> Option<Self::Bookmark>;

    fn restore_selection(&mut self, bookmark: &Self::Bookmark);

    fn focus(&mut self);
}
