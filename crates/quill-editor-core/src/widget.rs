//! The editable-content widget.
//!
//! `ContentEditor` sits between a toolbar, a [`RichTextHost`] and the owner's
//! change callback. It has no document model of its own; the host's
//! serialized markup is the only state that leaves it.

use tracing::debug;

use crate::commands::{FormatCommand, Key, KeyCombo, KeydownResult};
use crate::host::RichTextHost;
use crate::markup::TABLE_SKELETON;
use crate::prompt::{PendingPrompt, PromptKind, PromptOutcome, insertion_markup};
use crate::toolbar::{ToolbarAction, shortcut_command};
use crate::types::ActiveFormats;

/// Receives the full serialized markup after every content change.
pub type ChangeCallback = Box<dyn FnMut(&str)>;

pub struct ContentEditor<H: RichTextHost> {
    host: H,
    on_change: ChangeCallback,
    placeholder: Option<String>,
    active: ActiveFormats,
    last_markup: String,
    prompt: Option<PendingPrompt<H::Bookmark>>,
}

impl<H: RichTextHost> ContentEditor<H> {
    /// Seed `host` with `initial_markup`. Seeding does not fire `on_change`.
    pub fn new(
        mut host: H,
        initial_markup: &str,
        on_change: impl FnMut(&str) + 'static,
        placeholder: Option<String>,
    ) -> Self {
        host.set_markup(initial_markup);
        let last_markup = host.markup();
        let mut editor = Self {
            host,
            on_change: Box::new(on_change),
            placeholder,
            active: ActiveFormats::default(),
            last_markup,
            prompt: None,
        };
        editor.refresh_toolbar();
        editor
    }

    /// Run a formatting command against the current selection.
    ///
    /// Returns true if the markup changed. Ignored while a URL dialog is open.
    pub fn apply(&mut self, command: FormatCommand) -> bool {
        if self.prompt.is_some() {
            debug!(?command, "dialog open, command ignored");
            return false;
        }
        self.host.execute(&command);
        self.host.focus();
        let changed = self.emit_if_changed();
        self.refresh_toolbar();
        changed
    }

    /// Dispatch a toolbar button press.
    pub fn press(&mut self, action: ToolbarAction) -> bool {
        match action {
            ToolbarAction::Format(command) => self.apply(command),
            ToolbarAction::Prompt(kind) => {
                self.open_prompt(kind);
                false
            }
            ToolbarAction::InsertTable => self.insert_table(),
        }
    }

    /// Insert the fixed two-by-two table at the cursor.
    pub fn insert_table(&mut self) -> bool {
        if self.prompt.is_some() {
            return false;
        }
        self.host.insert_html(TABLE_SKELETON);
        self.host.focus();
        let changed = self.emit_if_changed();
        self.refresh_toolbar();
        changed
    }

    /// Call after the host changed its content from user typing.
    pub fn handle_input(&mut self) -> bool {
        self.emit_if_changed()
    }

    pub fn handle_key_up(&mut self) {
        self.refresh_toolbar();
    }

    pub fn handle_mouse_up(&mut self) {
        self.refresh_toolbar();
    }

    /// Handle shortcuts, and Enter/Escape while a dialog is open.
    pub fn handle_keydown(&mut self, combo: &KeyCombo) -> KeydownResult {
        if self.prompt.is_some() {
            return match combo.key {
                Key::Enter => {
                    self.resolve_prompt();
                    KeydownResult::Handled
                }
                Key::Escape => {
                    self.cancel_prompt();
                    KeydownResult::Handled
                }
                _ => KeydownResult::NotHandled,
            };
        }

        match shortcut_command(combo) {
            Some(command) => {
                self.apply(command);
                KeydownResult::Handled
            }
            None => KeydownResult::NotHandled,
        }
    }

    /// Open the URL dialog, capturing the insertion point.
    ///
    /// Replaces any dialog already open.
    pub fn open_prompt(&mut self, kind: PromptKind) {
        let bookmark = self.host.selection();
        self.prompt = Some(PendingPrompt::new(kind, bookmark));
    }

    pub fn prompt(&self) -> Option<&PendingPrompt<H::Bookmark>> {
        self.prompt.as_ref()
    }

    pub fn set_prompt_input(&mut self, text: impl Into<String>) {
        if let Some(prompt) = self.prompt.as_mut() {
            prompt.input = text.into();
        }
    }

    /// Close the dialog, inserting its URL.
    ///
    /// Returns `Cancelled` when no dialog is open.
    pub fn resolve_prompt(&mut self) -> PromptOutcome {
        let Some(prompt) = self.prompt.take() else {
            return PromptOutcome::Cancelled;
        };
        self.restore(&prompt);

        let selected = self.host.selected_markup();
        let Some(html) = insertion_markup(prompt.kind, &prompt.input, selected.as_deref()) else {
            debug!(kind = ?prompt.kind, "empty URL, nothing inserted");
            return PromptOutcome::Empty;
        };

        self.host.insert_html(&html);
        self.emit_if_changed();
        self.refresh_toolbar();
        PromptOutcome::Inserted
    }

    pub fn resolve_prompt_with(&mut self, url: impl Into<String>) -> PromptOutcome {
        self.set_prompt_input(url);
        self.resolve_prompt()
    }

    pub fn cancel_prompt(&mut self) -> PromptOutcome {
        if let Some(prompt) = self.prompt.take() {
            self.restore(&prompt);
        }
        PromptOutcome::Cancelled
    }

    fn restore(&mut self, prompt: &PendingPrompt<H::Bookmark>) {
        if let Some(bookmark) = &prompt.bookmark {
            self.host.restore_selection(bookmark);
        }
        self.host.focus();
    }

    pub fn toolbar_state(&self) -> ActiveFormats {
        self.active
    }

    pub fn markup(&self) -> String {
        self.host.markup()
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    /// Placeholder is shown only over an empty region.
    pub fn shows_placeholder(&self) -> bool {
        self.placeholder.is_some() && self.host.markup().trim().is_empty()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Direct host access for platform input. Follow edits with
    /// [`handle_input`](Self::handle_input).
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    fn emit_if_changed(&mut self) -> bool {
        let markup = self.host.markup();
        if markup == self.last_markup {
            return false;
        }
        (self.on_change)(&markup);
        self.last_markup = markup;
        true
    }

    fn refresh_toolbar(&mut self) {
        self.active = ActiveFormats::from_query(|format| self.host.query_state(format));
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::commands::{Alignment, Modifiers};
    use crate::markup_host::MarkupHost;

    fn editor_with(initial: &str) -> (ContentEditor<MarkupHost>, Rc<RefCell<Vec<String>>>) {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = changes.clone();
        let editor = ContentEditor::new(
            MarkupHost::default(),
            initial,
            move |markup: &str| sink.borrow_mut().push(markup.to_owned()),
            Some("Write your article...".to_owned()),
        );
        (editor, changes)
    }

    #[test]
    fn test_seeding_does_not_emit() {
        let (editor, changes) = editor_with("<p>start</p>");
        assert_eq!(editor.markup(), "<p>start</p>");
        assert!(changes.borrow().is_empty());
        assert!(!editor.shows_placeholder());
    }

    #[test]
    fn test_placeholder_on_empty() {
        let (editor, _) = editor_with("");
        assert!(editor.shows_placeholder());
        assert_eq!(editor.placeholder(), Some("Write your article..."));
    }

    #[test]
    fn test_command_emits_full_markup_and_refocuses() {
        let (mut editor, changes) = editor_with("hello world");
        editor.host_mut().select(0, 5);
        assert!(editor.apply(FormatCommand::Bold));

        assert_eq!(
            changes.borrow().as_slice(),
            ["<strong>hello</strong> world"]
        );
        assert!(editor.host().is_focused());
        assert!(editor.toolbar_state().bold);
    }

    #[test]
    fn test_noop_command_does_not_emit() {
        let (mut editor, changes) = editor_with("text");
        assert!(!editor.apply(FormatCommand::Undo));
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn test_undo_reverts_whole_command() {
        let (mut editor, changes) = editor_with("line");
        editor.apply(FormatCommand::Align(Alignment::Center));
        editor.apply(FormatCommand::Undo);
        assert_eq!(editor.markup(), "line");
        assert_eq!(changes.borrow().len(), 2);
        assert_eq!(changes.borrow()[1], "line");
    }

    #[test]
    fn test_typing_emits_once_per_input() {
        let (mut editor, changes) = editor_with("");
        editor.host_mut().type_text("a");
        editor.handle_input();
        editor.host_mut().type_text("b");
        editor.handle_input();
        assert!(!editor.handle_input());
        assert_eq!(changes.borrow().as_slice(), ["a", "ab"]);
    }

    #[test]
    fn test_toolbar_state_follows_cursor() {
        let (mut editor, _) = editor_with("<em>one</em> two");
        editor.host_mut().set_cursor(5);
        editor.handle_mouse_up();
        assert!(editor.toolbar_state().italic);

        editor.host_mut().set_cursor(15);
        editor.handle_key_up();
        assert!(!editor.toolbar_state().italic);
    }

    #[test]
    fn test_table_insertion_is_fixed() {
        let (mut editor, changes) = editor_with("");
        assert!(editor.press(ToolbarAction::InsertTable));
        assert_eq!(editor.markup(), TABLE_SKELETON);
        assert_eq!(changes.borrow().len(), 1);
    }

    #[test]
    fn test_link_prompt_wraps_captured_selection() {
        let (mut editor, changes) = editor_with("see docs here");
        editor.host_mut().select(4, 8);
        editor.press(ToolbarAction::Prompt(PromptKind::Link));

        // Focus moves to the dialog and the selection is lost.
        editor.host_mut().blur();
        editor.host_mut().set_cursor(0);

        editor.set_prompt_input("https://example.com/a?b=1&c=2");
        assert_eq!(editor.resolve_prompt(), PromptOutcome::Inserted);
        assert_eq!(
            editor.markup(),
            "see <a href=\"https://example.com/a?b=1&amp;c=2\">docs</a> here"
        );
        assert_eq!(changes.borrow().len(), 1);
        assert!(editor.prompt().is_none());
    }

    #[test]
    fn test_image_prompt_inserts_at_cursor() {
        let (mut editor, _) = editor_with("ab");
        editor.host_mut().set_cursor(1);
        editor.open_prompt(PromptKind::Image);
        assert_eq!(
            editor.resolve_prompt_with("https://img.example/x.png"),
            PromptOutcome::Inserted
        );
        assert_eq!(
            editor.markup(),
            "a<img src=\"https://img.example/x.png\" alt=\"\">b"
        );
    }

    #[test]
    fn test_cancelled_or_empty_prompt_changes_nothing() {
        let (mut editor, changes) = editor_with("keep");
        editor.open_prompt(PromptKind::Link);
        editor.set_prompt_input("https://example.com");
        assert_eq!(editor.cancel_prompt(), PromptOutcome::Cancelled);

        editor.open_prompt(PromptKind::Image);
        assert_eq!(editor.resolve_prompt_with("   "), PromptOutcome::Empty);

        assert_eq!(editor.markup(), "keep");
        assert!(changes.borrow().is_empty());
        assert_eq!(editor.resolve_prompt(), PromptOutcome::Cancelled);
    }

    #[test]
    fn test_commands_ignored_while_prompt_open() {
        let (mut editor, _) = editor_with("word");
        editor.open_prompt(PromptKind::Link);
        assert!(!editor.apply(FormatCommand::Bold));
        assert!(!editor.insert_table());
        assert_eq!(editor.markup(), "word");
    }

    #[test]
    fn test_keydown_shortcuts_and_dialog_keys() {
        let (mut editor, _) = editor_with("word");
        let ctrl_b = KeyCombo::with_modifiers(Key::character("b"), Modifiers::CTRL);
        assert_eq!(editor.handle_keydown(&ctrl_b), KeydownResult::Handled);
        assert_eq!(editor.markup(), "<strong>word</strong>");

        let plain = KeyCombo::new(Key::character("x"));
        assert_eq!(editor.handle_keydown(&plain), KeydownResult::NotHandled);

        editor.open_prompt(PromptKind::Link);
        let escape = KeyCombo::new(Key::Escape);
        assert_eq!(editor.handle_keydown(&escape), KeydownResult::Handled);
        assert!(editor.prompt().is_none());
    }
}
