//! Toolbar layout and keyboard shortcuts.

use crate::commands::{Alignment, FormatCommand, HeadingLevel, KeyCombo};
use crate::prompt::PromptKind;
use crate::types::{ActiveFormats, ToggleFormat};

/// What a toolbar button does when pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    Format(FormatCommand),
    /// Ask for a URL before inserting.
    Prompt(PromptKind),
    InsertTable,
}

impl ToolbarAction {
    /// The toggle this action reflects in toolbar highlighting, if any.
    pub fn toggle(self) -> Option<ToggleFormat> {
        match self {
            Self::Format(FormatCommand::Bold) => Some(ToggleFormat::Bold),
            Self::Format(FormatCommand::Italic) => Some(ToggleFormat::Italic),
            Self::Format(FormatCommand::Underline) => Some(ToggleFormat::Underline),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarItem {
    Button {
        label: &'static str,
        title: &'static str,
        action: ToolbarAction,
    },
    Separator,
}

impl ToolbarItem {
    const fn button(label: &'static str, title: &'static str, action: ToolbarAction) -> Self {
        Self::Button {
            label,
            title,
            action,
        }
    }

    const fn format(label: &'static str, title: &'static str, command: FormatCommand) -> Self {
        Self::button(label, title, ToolbarAction::Format(command))
    }

    pub fn action(&self) -> Option<ToolbarAction> {
        match self {
            Self::Button { action, .. } => Some(*action),
            Self::Separator => None,
        }
    }

    /// Whether the button should render highlighted.
    pub fn is_active(&self, active: &ActiveFormats) -> bool {
        self.action()
            .and_then(ToolbarAction::toggle)
            .is_some_and(|format| active.is_active(format))
    }
}

/// Buttons in display order.
pub const TOOLBAR: &[ToolbarItem] = &[
    ToolbarItem::format("B", "Bold (Ctrl+B)", FormatCommand::Bold),
    ToolbarItem::format("I", "Italic (Ctrl+I)", FormatCommand::Italic),
    ToolbarItem::format("U", "Underline (Ctrl+U)", FormatCommand::Underline),
    ToolbarItem::Separator,
    ToolbarItem::format("H1", "Heading 1", FormatCommand::Heading(HeadingLevel::H1)),
    ToolbarItem::format("H2", "Heading 2", FormatCommand::Heading(HeadingLevel::H2)),
    ToolbarItem::format("H3", "Heading 3", FormatCommand::Heading(HeadingLevel::H3)),
    ToolbarItem::Separator,
    ToolbarItem::format("•", "Bullet List", FormatCommand::UnorderedList),
    ToolbarItem::format("1.", "Numbered List", FormatCommand::OrderedList),
    ToolbarItem::Separator,
    ToolbarItem::format("⇤", "Align Left", FormatCommand::Align(Alignment::Left)),
    ToolbarItem::format("↔", "Align Center", FormatCommand::Align(Alignment::Center)),
    ToolbarItem::format("⇥", "Align Right", FormatCommand::Align(Alignment::Right)),
    ToolbarItem::format("≡", "Justify", FormatCommand::Align(Alignment::Justify)),
    ToolbarItem::Separator,
    ToolbarItem::button("🔗", "Link", ToolbarAction::Prompt(PromptKind::Link)),
    ToolbarItem::button("🖼", "Image", ToolbarAction::Prompt(PromptKind::Image)),
    ToolbarItem::button("▦", "Table", ToolbarAction::InsertTable),
    ToolbarItem::format("❝", "Quote", FormatCommand::BlockQuote),
    ToolbarItem::format("<>", "Code Block", FormatCommand::Preformatted),
    ToolbarItem::Separator,
    ToolbarItem::format("↶", "Undo (Ctrl+Z)", FormatCommand::Undo),
    ToolbarItem::format("↷", "Redo (Ctrl+Shift+Z)", FormatCommand::Redo),
];

/// Command bound to a key combination.
///
/// Ctrl and Cmd are both accepted as the primary modifier; Alt combinations
/// are left to the platform.
pub fn shortcut_command(combo: &KeyCombo) -> Option<FormatCommand> {
    let mods = combo.modifiers;
    if !mods.has_primary() || mods.alt {
        return None;
    }
    let key = &combo.key;

    if mods.shift {
        return key.is_letter('z').then_some(FormatCommand::Redo);
    }

    if key.is_letter('b') {
        Some(FormatCommand::Bold)
    } else if key.is_letter('i') {
        Some(FormatCommand::Italic)
    } else if key.is_letter('u') {
        Some(FormatCommand::Underline)
    } else if key.is_letter('z') {
        Some(FormatCommand::Undo)
    } else if key.is_letter('y') {
        Some(FormatCommand::Redo)
    } else {
        None
    }
}
