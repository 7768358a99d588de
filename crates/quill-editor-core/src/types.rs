//! Selection and formatting state shared by hosts, the widget and the toolbar.

use std::ops::Range;

/// A selection in character offsets of the markup.
///
/// `anchor` stays where the selection began and `head` follows the cursor,
/// so `head < anchor` for a selection made backwards.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// A bare cursor at `offset`.
    pub fn collapsed(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn start(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn end(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    /// Half-open: `end()` itself is outside.
    pub fn contains(&self, offset: usize) -> bool {
        (self.start()..self.end()).contains(&offset)
    }

    pub fn len(&self) -> usize {
        self.end() - self.start()
    }

    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }

    pub fn to_range(&self) -> Range<usize> {
        self.start()..self.end()
    }

    /// Shift both ends by `delta` characters, clamping at zero.
    pub fn shifted(self, delta: isize) -> Self {
        let shift = |v: usize| v.saturating_add_signed(delta);
        Self {
            anchor: shift(self.anchor),
            head: shift(self.head),
        }
    }
}

/// Toggle-style inline formats whose state is reflected in the toolbar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ToggleFormat {
    Bold,
    Italic,
    Underline,
}

impl ToggleFormat {
    pub const ALL: [ToggleFormat; 3] = [Self::Bold, Self::Italic, Self::Underline];

    /// Tag written when the format is applied.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Bold => "strong",
            Self::Italic => "em",
            Self::Underline => "u",
        }
    }

    /// Every tag that counts as this format when reading markup back.
    ///
    /// Browsers emit `<b>`/`<i>` from their native commands, so both spellings
    /// are recognised.
    pub fn recognised_tags(self) -> &'static [&'static str] {
        match self {
            Self::Bold => &["strong", "b"],
            Self::Italic => &["em", "i"],
            Self::Underline => &["u"],
        }
    }

    /// Native command name used by browser hosts.
    pub fn command_name(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
        }
    }
}

/// Which toggle formats are active at the cursor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActiveFormats {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl ActiveFormats {
    pub fn is_active(&self, format: ToggleFormat) -> bool {
        match format {
            ToggleFormat::Bold => self.bold,
            ToggleFormat::Italic => self.italic,
            ToggleFormat::Underline => self.underline,
        }
    }

    pub fn set(&mut self, format: ToggleFormat, active: bool) {
        match format {
            ToggleFormat::Bold => self.bold = active,
            ToggleFormat::Italic => self.italic = active,
            ToggleFormat::Underline => self.underline = active,
        }
    }

    /// Build from a per-format query.
    pub fn from_query(mut query: impl FnMut(ToggleFormat) -> bool) -> Self {
        let mut active = Self::default();
        for format in ToggleFormat::ALL {
            active.set(format, query(format));
        }
        active
    }
}
