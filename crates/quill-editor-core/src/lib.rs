//! quill-editor-core: rich-text editing logic without framework dependencies.
//!
//! This crate provides:
//! - `RichTextHost` - the capability boundary the widget drives
//! - `MarkupHost` - in-memory host editing serialized HTML with grouped undo
//! - `ContentEditor<H>` - the toolbar-driven widget that reports markup changes
//! - Formatting commands, toolbar layout, shortcuts and the URL dialog

pub mod commands;
pub mod document;
pub mod execute;
pub mod host;
pub mod markup;
pub mod markup_host;
pub mod prompt;
pub mod text;
pub mod text_helpers;
pub mod toolbar;
pub mod types;
pub mod undo;
pub mod widget;

pub use commands::{
    Alignment, EditorAction, FormatCommand, HeadingLevel, Key, KeyCombo, KeydownResult, Modifiers,
    NativeCommand, Range,
};
pub use document::{MarkupDocument, TextDocument};
pub use host::RichTextHost;
pub use markup::TABLE_SKELETON;
pub use markup_host::{DEFAULT_UNDO_DEPTH, MarkupHost};
pub use prompt::{PendingPrompt, PromptKind, PromptOutcome};
pub use smol_str::SmolStr;
pub use text::{RopeBuffer, TextBuffer};
pub use toolbar::{TOOLBAR, ToolbarAction, ToolbarItem, shortcut_command};
pub use types::{ActiveFormats, Selection, ToggleFormat};
pub use undo::{History, HistoryBuffer};
pub use widget::{ChangeCallback, ContentEditor};
