//! Text navigation helpers over an `MarkupDocument`.

use crate::document::MarkupDocument;

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '\''
}

/// Find start of line containing offset.
pub fn find_line_start<D: MarkupDocument>(doc: &D, offset: usize) -> usize {
    let mut pos = offset.min(doc.len_chars());
    while pos > 0 {
        if let Some('\n') = doc.char_at(pos - 1) {
            return pos;
        }
        pos -= 1;
    }
    0
}

/// Find end of line containing offset (position of newline or end of doc).
pub fn find_line_end<D: MarkupDocument>(doc: &D, offset: usize) -> usize {
    let len = doc.len_chars();
    let mut pos = offset.min(len);
    while pos < len {
        if let Some('\n') = doc.char_at(pos) {
            return pos;
        }
        pos += 1;
    }
    len
}

/// Word around `offset`, as a char range. Empty when the cursor touches no
/// word characters. Tag delimiters and entities never count as word chars.
pub fn find_word_boundaries<D: MarkupDocument>(doc: &D, offset: usize) -> (usize, usize) {
    let len = doc.len_chars();
    let offset = offset.min(len);

    let mut start = offset;
    while start > 0 {
        match doc.char_at(start - 1) {
            Some(c) if is_word_char(c) => start -= 1,
            _ => break,
        }
    }

    let mut end = offset;
    while end < len {
        match doc.char_at(end) {
            Some(c) if is_word_char(c) => end += 1,
            _ => break,
        }
    }

    (start, end)
}

/// Whether `offset` falls between a `<` and its closing `>`.
pub fn is_inside_tag<D: MarkupDocument>(doc: &D, offset: usize) -> bool {
    let mut pos = offset.min(doc.len_chars());
    while pos > 0 {
        match doc.char_at(pos - 1) {
            Some('>') => return false,
            Some('<') => return true,
            _ => pos -= 1,
        }
    }
    false
}
