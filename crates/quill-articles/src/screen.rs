//! Article authoring screen: one editor bound to one form.

use quill_common::{AppConfig, OrganizationConfig};
use quill_editor_core::{
    ContentEditor, FormatCommand, KeyCombo, KeydownResult, MarkupHost, PromptKind, PromptOutcome,
    RichTextHost, ToolbarAction,
};

use crate::api::ArticleApi;
use crate::form::{ArticleForm, SubmitOutcome};
use crate::navigate::Navigator;
use crate::notify::Notifier;

/// Owns the widget and the form and keeps the form's content in step with
/// the editor. Every editor event goes through here so the form syncs after it.
pub struct ArticleScreen<H: RichTextHost, A, N, V> {
    editor: ContentEditor<H>,
    form: ArticleForm<A, N, V>,
    organization: OrganizationConfig,
}

impl<H, A, N, V> ArticleScreen<H, A, N, V>
where
    H: RichTextHost,
    A: ArticleApi,
    N: Notifier,
    V: Navigator,
{
    /// Mount `host` seeded with the form's current content.
    pub fn new(host: H, form: ArticleForm<A, N, V>, config: &AppConfig) -> Self {
        let editor = ContentEditor::new(
            host,
            &form.draft().content,
            form.content_channel().into_callback(),
            config.editor.placeholder.clone(),
        );
        Self {
            editor,
            form,
            organization: config.organization.clone(),
        }
    }

    /// Name, locale and theme the screen is rendered for.
    pub fn organization(&self) -> &OrganizationConfig {
        &self.organization
    }

    pub fn editor(&self) -> &ContentEditor<H> {
        &self.editor
    }

    pub fn form(&self) -> &ArticleForm<A, N, V> {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ArticleForm<A, N, V> {
        &mut self.form
    }

    /// Run `f` against the editor, then sync the form.
    pub fn with_editor<R>(&mut self, f: impl FnOnce(&mut ContentEditor<H>) -> R) -> R {
        let result = f(&mut self.editor);
        self.form.sync_content();
        result
    }

    pub fn apply(&mut self, command: FormatCommand) -> bool {
        self.with_editor(|editor| editor.apply(command))
    }

    pub fn press(&mut self, action: ToolbarAction) -> bool {
        self.with_editor(|editor| editor.press(action))
    }

    pub fn handle_input(&mut self) -> bool {
        self.with_editor(ContentEditor::handle_input)
    }

    pub fn handle_keydown(&mut self, combo: &KeyCombo) -> KeydownResult {
        self.with_editor(|editor| editor.handle_keydown(combo))
    }

    pub fn handle_key_up(&mut self) {
        self.editor.handle_key_up();
    }

    pub fn handle_mouse_up(&mut self) {
        self.editor.handle_mouse_up();
    }

    pub fn open_prompt(&mut self, kind: PromptKind) {
        self.editor.open_prompt(kind);
    }

    pub fn resolve_prompt_with(&mut self, url: impl Into<String>) -> PromptOutcome {
        let url = url.into();
        self.with_editor(|editor| editor.resolve_prompt_with(url))
    }

    pub fn cancel_prompt(&mut self) -> PromptOutcome {
        self.editor.cancel_prompt()
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        self.form.sync_content();
        self.form.submit().await
    }

    pub fn cancel(&mut self) {
        self.form.cancel();
    }

    pub fn into_parts(self) -> (ContentEditor<H>, ArticleForm<A, N, V>) {
        (self.editor, self.form)
    }
}

impl<A, N, V> ArticleScreen<MarkupHost, A, N, V>
where
    A: ArticleApi,
    N: Notifier,
    V: Navigator,
{
    /// Screen over an in-memory host keeping `editor.undo_depth` steps.
    pub fn in_memory(form: ArticleForm<A, N, V>, config: &AppConfig) -> Self {
        Self::new(MarkupHost::new(config.editor.undo_depth), form, config)
    }
}
