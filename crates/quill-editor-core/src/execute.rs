//! Command execution for editor documents holding HTML markup.
//!
//! Generic over `MarkupDocument`; every content-changing command runs as one
//! undo step so undo reverts it whole.

use tracing::debug;

use crate::commands::{EditorAction, FormatCommand, Range};
use crate::document::MarkupDocument;
use crate::markup::{self, BlockKind, Element};
use crate::text_helpers::{find_line_end, find_line_start, find_word_boundaries, is_inside_tag};
use crate::types::{Selection, ToggleFormat};

/// Execute a keystroke-level editor action.
///
/// Returns true if the action was handled.
pub fn execute_action<D: MarkupDocument>(doc: &mut D, action: &EditorAction) -> bool {
    match action {
        EditorAction::Insert { text, range } => execute_insert(doc, text, *range),
        EditorAction::InsertParagraph { range } => execute_insert_paragraph(doc, *range),
        EditorAction::DeleteBackward { range } => execute_delete_backward(doc, *range),
        EditorAction::DeleteForward { range } => execute_delete_forward(doc, *range),
        EditorAction::SelectAll => execute_select_all(doc),
        EditorAction::MoveCursor { offset } => execute_move_cursor(doc, *offset),
        EditorAction::ExtendSelection { offset } => execute_extend_selection(doc, *offset),
    }
}

/// Apply a formatting command to the current selection.
///
/// Returns false when nothing changed.
pub fn execute_format<D: MarkupDocument>(doc: &mut D, command: FormatCommand) -> bool {
    match command {
        FormatCommand::Bold => execute_toggle_format(doc, ToggleFormat::Bold),
        FormatCommand::Italic => execute_toggle_format(doc, ToggleFormat::Italic),
        FormatCommand::Underline => execute_toggle_format(doc, ToggleFormat::Underline),
        FormatCommand::Undo => execute_undo(doc),
        FormatCommand::Redo => execute_redo(doc),
        block => match BlockKind::for_command(block) {
            Some(kind) => execute_block_format(doc, kind),
            None => false,
        },
    }
}

/// Whether `format` applies to the whole selection (or the cursor).
pub fn is_format_active<D: MarkupDocument>(doc: &D, format: ToggleFormat) -> bool {
    let markup = doc.markup();
    markup::enclosing_element(&markup, doc.selection_or_cursor(), format.recognised_tags())
        .is_some()
}

/// Insert markup at the cursor, replacing any selection. Cursor ends after it.
pub fn insert_markup<D: MarkupDocument>(doc: &mut D, html: &str) -> bool {
    if html.is_empty() {
        return false;
    }
    let range = doc.selection_or_cursor();
    doc.grouped(|doc| doc.replace(range, html));
    doc.set_selection(None);
    true
}

fn execute_insert<D: MarkupDocument>(doc: &mut D, text: &str, range: Range) -> bool {
    if text.is_empty() {
        return false;
    }
    let range = range.normalize();
    let Ok(escaped) = markup::escape_text(text) else {
        debug!("text could not be escaped, insert ignored");
        return false;
    };
    doc.grouped(|doc| doc.replace(range.into(), &escaped));
    doc.set_selection(None);
    true
}

fn execute_insert_paragraph<D: MarkupDocument>(doc: &mut D, range: Range) -> bool {
    let range = range.normalize();
    let line_start = find_line_start(doc, range.start);
    let line_end = find_line_end(doc, range.start);
    let line = doc.slice(line_start..line_end).unwrap_or_default();
    let block = markup::parse_line(&line);

    // Splitting inside a wrapped line closes the block and reopens it on the
    // new line so both halves stay well-formed.
    let inner_start = line_start + block.prefix_len;
    let inner_end = inner_start + block.inner.chars().count();
    let (separator, cursor_shift) = match block.kind {
        Some(kind) if range.start >= inner_start && range.start <= inner_end => {
            let open = kind.open_tag();
            let sep = format!("{}\n{}", kind.close_tag(), open);
            let shift = sep.chars().count();
            (sep, shift)
        }
        _ => ("\n".to_owned(), 1),
    };

    doc.grouped(|doc| doc.replace(range.into(), &separator));
    doc.set_cursor_offset(range.start + cursor_shift);
    doc.set_selection(None);
    true
}

fn execute_delete_backward<D: MarkupDocument>(doc: &mut D, range: Range) -> bool {
    let range = range.normalize();

    if !range.is_caret() {
        doc.grouped(|doc| doc.remove(range.into()));
        doc.set_selection(None);
        return true;
    }

    let Some(target) = previous_text_char(doc, range.start) else {
        return false;
    };
    doc.grouped(|doc| doc.remove(target));
    doc.set_selection(None);
    true
}

fn execute_delete_forward<D: MarkupDocument>(doc: &mut D, range: Range) -> bool {
    let range = range.normalize();

    if !range.is_caret() {
        doc.grouped(|doc| doc.remove(range.into()));
        doc.set_selection(None);
        return true;
    }

    let Some(target) = next_text_char(doc, range.start) else {
        return false;
    };
    doc.grouped(|doc| doc.remove(target));
    doc.set_selection(None);
    true
}

/// Char range of the nearest content char before `offset`, skipping tags and
/// treating an entity like `&amp;` as one char.
fn previous_text_char<D: MarkupDocument>(doc: &D, offset: usize) -> Option<std::ops::Range<usize>> {
    let mut pos = offset;
    while pos > 0 && doc.char_at(pos - 1) == Some('>') {
        let mut open = pos - 1;
        while open > 0 && doc.char_at(open) != Some('<') {
            open -= 1;
        }
        if doc.char_at(open) != Some('<') {
            return None;
        }
        pos = open;
    }
    if pos == 0 {
        return None;
    }

    if doc.char_at(pos - 1) == Some(';') {
        let mut amp = pos - 1;
        while amp > 0 && pos - amp <= 10 {
            amp -= 1;
            match doc.char_at(amp) {
                Some('&') => return Some(amp..pos),
                Some(c) if c.is_ascii_alphanumeric() || c == '#' => continue,
                _ => break,
            }
        }
    }
    Some(pos - 1..pos)
}

fn next_text_char<D: MarkupDocument>(doc: &D, offset: usize) -> Option<std::ops::Range<usize>> {
    let len = doc.len_chars();
    let mut pos = offset;
    while pos < len && doc.char_at(pos) == Some('<') {
        let mut close = pos;
        while close < len && doc.char_at(close) != Some('>') {
            close += 1;
        }
        if close >= len {
            return None;
        }
        pos = close + 1;
    }
    if pos >= len {
        return None;
    }

    if doc.char_at(pos) == Some('&') {
        let mut semi = pos + 1;
        while semi < len && semi - pos <= 10 {
            match doc.char_at(semi) {
                Some(';') => return Some(pos..semi + 1),
                Some(c) if c.is_ascii_alphanumeric() || c == '#' => semi += 1,
                _ => break,
            }
        }
    }
    Some(pos..pos + 1)
}

fn execute_undo<D: MarkupDocument>(doc: &mut D) -> bool {
    doc.undo()
}

fn execute_redo<D: MarkupDocument>(doc: &mut D) -> bool {
    doc.redo()
}

fn execute_toggle_format<D: MarkupDocument>(doc: &mut D, format: ToggleFormat) -> bool {
    let range = doc.selection_or_cursor();
    let content = doc.markup();

    if let Some(element) =
        markup::enclosing_element(&content, range.clone(), format.recognised_tags())
    {
        match doc.active_selection() {
            Some(sel) if sel.to_range() != element.content() => split_element(doc, &element, sel),
            _ => unwrap_element(doc, &element),
        }
        return true;
    }

    if is_inside_tag(doc, range.start) || is_inside_tag(doc, range.end) {
        debug!(?format, "selection touches a tag, toggle ignored");
        return false;
    }

    let selection = doc.active_selection();
    let (start, end) = match selection {
        Some(sel) => (sel.start(), sel.end()),
        None => find_word_boundaries(doc, range.start),
    };

    let tag = format.tag();
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let open_len = open.chars().count();

    // Insert end marker first so start position stays valid.
    doc.grouped(|doc| {
        doc.insert(end, &close);
        doc.insert(start, &open);
    });

    match selection {
        Some(sel) => {
            let moved = sel.shifted(open_len as isize);
            doc.set_selection(Some(moved));
            doc.set_cursor_offset(moved.head);
        }
        None => {
            doc.set_selection(None);
            doc.set_cursor_offset(range.start + open_len);
        }
    }
    true
}

/// Take `sel` out of `element`, keeping the format on the rest of its content.
fn split_element<D: MarkupDocument>(doc: &mut D, element: &Element, sel: Selection) {
    let Some(open) = doc.slice(element.open.clone()) else {
        unwrap_element(doc, element);
        return;
    };
    let close = format!("</{}>", element.name);
    let open_len = open.chars().count() as isize;
    let close_len = close.chars().count() as isize;
    let content = element.content();
    let (start, end) = (sel.start(), sel.end());

    // Edits run back to front so earlier offsets stay valid.
    let shift = doc.grouped(|doc| match (start > content.start, end < content.end) {
        (true, true) => {
            doc.insert(end, &open);
            doc.insert(start, &close);
            close_len
        }
        (true, false) => {
            doc.remove(element.close.clone());
            doc.insert(start, &close);
            close_len
        }
        _ => {
            doc.insert(end, &open);
            doc.remove(element.open.clone());
            -open_len
        }
    });

    let moved = sel.shifted(shift);
    doc.set_selection(Some(moved));
    doc.set_cursor_offset(moved.head);
}

fn unwrap_element<D: MarkupDocument>(doc: &mut D, element: &Element) {
    let remap = |offset: usize| -> usize {
        let open_len = element.open.len();
        let close_len = element.close.len();
        if offset >= element.close.end {
            offset - open_len - close_len
        } else if offset > element.close.start {
            element.close.start - open_len
        } else if offset >= element.open.end {
            offset - open_len
        } else if offset > element.open.start {
            element.open.start
        } else {
            offset
        }
    };

    let cursor = remap(doc.cursor_offset());
    let selection = doc
        .active_selection()
        .map(|sel| Selection::new(remap(sel.anchor), remap(sel.head)));

    // Close tag first so the open tag's offsets stay valid.
    doc.grouped(|doc| {
        doc.remove(element.close.clone());
        doc.remove(element.open.clone());
    });

    doc.set_cursor_offset(cursor);
    doc.set_selection(selection);
}

fn execute_block_format<D: MarkupDocument>(doc: &mut D, kind: BlockKind) -> bool {
    let cursor = doc.cursor_offset();
    let line_start = find_line_start(doc, cursor);
    let line_end = find_line_end(doc, cursor);
    let line = doc.slice(line_start..line_end).unwrap_or_default();
    let block = markup::parse_line(&line);

    let (replacement, new_prefix) = if block.kind == Some(kind) {
        (block.inner.clone(), 0)
    } else {
        (kind.wrap(&block.inner), kind.open_tag().chars().count())
    };

    let inner_len = block.inner.chars().count();
    let relative = cursor
        .saturating_sub(line_start + block.prefix_len)
        .min(inner_len);

    doc.grouped(|doc| doc.replace(line_start..line_end, &replacement));
    doc.set_cursor_offset(line_start + new_prefix + relative);
    doc.set_selection(None);
    true
}

fn execute_select_all<D: MarkupDocument>(doc: &mut D) -> bool {
    let len = doc.len_chars();
    doc.set_selection(Some(Selection::new(0, len)));
    doc.set_cursor_offset(len);
    true
}

fn execute_move_cursor<D: MarkupDocument>(doc: &mut D, offset: usize) -> bool {
    doc.set_cursor_offset(offset);
    doc.set_selection(None);
    true
}

fn execute_extend_selection<D: MarkupDocument>(doc: &mut D, offset: usize) -> bool {
    let offset = offset.min(doc.len_chars());
    let anchor = doc
        .selection()
        .map(|s| s.anchor)
        .unwrap_or_else(|| doc.cursor_offset());
    doc.set_selection(Some(Selection::new(anchor, offset)));
    doc.set_cursor_offset(offset);
    true
}
