//! Editor commands and input types.
//!
//! `FormatCommand` is what the toolbar and shortcuts dispatch against a host.
//! `EditorAction` covers keystroke-level editing of the in-memory markup host.
//! Keyboard types are platform-agnostic; platform code converts native key
//! events into them.

use smol_str::SmolStr;

/// A range in the document, measured in character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }

    /// Normalize range so start <= end.
    pub fn normalize(self) -> Self {
        if self.start <= self.end {
            self
        } else {
            Self {
                start: self.end,
                end: self.start,
            }
        }
    }
}

impl From<std::ops::Range<usize>> for Range {
    fn from(r: std::ops::Range<usize>) -> Self {
        Self::new(r.start, r.end)
    }
}

impl From<Range> for std::ops::Range<usize> {
    fn from(r: Range) -> Self {
        r.start..r.end
    }
}

/// Heading levels offered by the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    pub fn tag(self) -> &'static str {
        match self {
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
        }
    }
}

/// Paragraph alignment variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub const ALL: [Alignment; 4] = [Self::Left, Self::Center, Self::Right, Self::Justify];

    /// Value of the CSS `text-align` property.
    pub fn css_value(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "justify",
        }
    }
}

/// A named formatting operation applied to the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatCommand {
    Bold,
    Italic,
    Underline,
    Heading(HeadingLevel),
    UnorderedList,
    OrderedList,
    Align(Alignment),
    BlockQuote,
    Preformatted,
    Undo,
    Redo,
}

/// Native command identifier plus optional argument, as understood by
/// browser `execCommand`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeCommand {
    pub name: &'static str,
    pub value: Option<&'static str>,
}

impl FormatCommand {
    pub fn native(self) -> NativeCommand {
        let (name, value) = match self {
            Self::Bold => ("bold", None),
            Self::Italic => ("italic", None),
            Self::Underline => ("underline", None),
            Self::Heading(HeadingLevel::H1) => ("formatBlock", Some("<h1>")),
            Self::Heading(HeadingLevel::H2) => ("formatBlock", Some("<h2>")),
            Self::Heading(HeadingLevel::H3) => ("formatBlock", Some("<h3>")),
            Self::UnorderedList => ("insertUnorderedList", None),
            Self::OrderedList => ("insertOrderedList", None),
            Self::Align(Alignment::Left) => ("justifyLeft", None),
            Self::Align(Alignment::Center) => ("justifyCenter", None),
            Self::Align(Alignment::Right) => ("justifyRight", None),
            Self::Align(Alignment::Justify) => ("justifyFull", None),
            Self::BlockQuote => ("formatBlock", Some("<blockquote>")),
            Self::Preformatted => ("formatBlock", Some("<pre>")),
            Self::Undo => ("undo", None),
            Self::Redo => ("redo", None),
        };
        NativeCommand { name, value }
    }

    /// Whether this is undo or redo rather than a content transformation.
    pub fn is_history(self) -> bool {
        matches!(self, Self::Undo | Self::Redo)
    }
}

/// Keystroke-level editing operations on the markup host.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    /// Insert text at the given range (replacing any selected content).
    Insert { text: String, range: Range },

    /// Insert a paragraph break (Enter).
    InsertParagraph { range: Range },

    /// Delete content backward (Backspace).
    DeleteBackward { range: Range },

    /// Delete content forward (Delete key).
    DeleteForward { range: Range },

    SelectAll,

    /// Move cursor to position.
    MoveCursor { offset: usize },

    /// Extend selection to position.
    ExtendSelection { offset: usize },
}

/// Key values for keyboard input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A character key.
    Character(SmolStr),

    /// Unknown/unidentified key.
    Unidentified,

    Backspace,
    Delete,
    Enter,
    Tab,
    Escape,

    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,

    Alt,
    Control,
    Meta,
    Shift,
}

impl Key {
    pub fn character(s: impl Into<SmolStr>) -> Self {
        Self::Character(s.into())
    }

    /// Parse a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Backspace" => Self::Backspace,
            "Delete" => Self::Delete,
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            "Escape" => Self::Escape,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "Home" => Self::Home,
            "End" => Self::End,
            "Alt" => Self::Alt,
            "Control" => Self::Control,
            "Meta" => Self::Meta,
            "Shift" => Self::Shift,
            "" | "Unidentified" => Self::Unidentified,
            other if other.chars().count() == 1 => Self::character(other),
            _ => Self::Unidentified,
        }
    }

    /// Case-insensitive comparison against a single-letter character key.
    pub fn is_letter(&self, letter: char) -> bool {
        match self {
            Self::Character(s) => {
                let mut chars = s.chars();
                matches!((chars.next(), chars.next()), (Some(c), None) if c.eq_ignore_ascii_case(&letter))
            }
            _ => false,
        }
    }
}

/// Modifier key state for a key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self::with(false, false, false);
    pub const CTRL: Self = Self::with(true, false, false);
    pub const META: Self = Self::with(false, true, false);
    pub const CTRL_SHIFT: Self = Self::with(true, false, true);
    pub const META_SHIFT: Self = Self::with(false, true, true);

    const fn with(ctrl: bool, meta: bool, shift: bool) -> Self {
        Self {
            ctrl,
            alt: false,
            shift,
            meta,
        }
    }

    /// Cmd on macOS, Ctrl elsewhere.
    pub fn primary(is_mac: bool) -> Self {
        if is_mac { Self::META } else { Self::CTRL }
    }

    pub fn primary_shift(is_mac: bool) -> Self {
        if is_mac {
            Self::META_SHIFT
        } else {
            Self::CTRL_SHIFT
        }
    }

    /// Ctrl or Cmd held, independent of platform.
    pub fn has_primary(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A key combination for triggering an action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn primary(key: Key, is_mac: bool) -> Self {
        Self {
            key,
            modifiers: Modifiers::primary(is_mac),
        }
    }

    pub fn primary_shift(key: Key, is_mac: bool) -> Self {
        Self {
            key,
            modifiers: Modifiers::primary_shift(is_mac),
        }
    }
}

/// Result of handling a keydown event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeydownResult {
    /// Event was handled, prevent default.
    Handled,
    /// Event was not a keybinding, let platform handle it.
    NotHandled,
}
