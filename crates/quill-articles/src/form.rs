//! The article submission form.
//!
//! [`ArticleForm`] owns the draft, its field errors and the image preview.
//! A submit attempt moves through [`SubmitState`]:
//!
//! ```text
//! Idle -> Validating -> Idle (errors recorded)
//!                    -> Submitting -> Succeeded (navigation scheduled)
//!                                  -> Idle (notification shown)
//! ```
//!
//! Every failure ends in an inline field error or a notification; nothing is
//! returned as an error to the caller.

use std::sync::Arc;

use quill_common::{AttachmentError, FormConfig};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::{ArticleApi, Category, CreateArticleRequest, CreatedArticle};
use crate::draft::{ArticleDraft, ArticleStatus, FieldValue, FormField, ImagePreview};
use crate::image::{PreviewRequest, SelectedFile, check_attachment};
use crate::navigate::Navigator;
use crate::notify::{Notification, Notifier};
use crate::validate::{FieldErrors, validate_draft};

pub const SUCCESS_TITLE: &str = "Success";
pub const ERROR_TITLE: &str = "Error";
pub const CREATED_MESSAGE: &str = "Article created successfully";
pub const REJECTED_MESSAGE: &str = "Failed to create article";
pub const FAILED_MESSAGE: &str = "An error occurred while creating the article";
pub const CATEGORIES_FAILED_MESSAGE: &str = "Failed to load categories";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitState {
    #[default]
    Idle,
    Validating,
    Submitting,
    /// Created; navigation away is pending.
    Succeeded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; see [`ArticleForm::errors`].
    Invalid,
    Created(CreatedArticle),
    /// The creation operation refused the article.
    Rejected,
    /// The creation operation could not be completed.
    Failed,
    /// A submission is in flight or already succeeded.
    Busy,
}

/// Sending half of the widget-to-form content binding.
///
/// Sends coalesce: the form only sees the latest markup when it next syncs.
#[derive(Debug, Clone)]
pub struct ContentChannel(Arc<watch::Sender<String>>);

impl ContentChannel {
    pub fn send(&self, markup: &str) {
        self.0.send_replace(markup.to_owned());
    }

    /// Change callback for [`quill_editor_core::ContentEditor`].
    pub fn into_callback(self) -> impl FnMut(&str) + 'static {
        move |markup: &str| self.send(markup)
    }
}

pub struct ArticleForm<A, N, V> {
    config: FormConfig,
    api: A,
    notifier: N,
    navigator: V,
    draft: ArticleDraft,
    errors: FieldErrors,
    categories: Vec<Category>,
    preview: Option<ImagePreview>,
    image_generation: u64,
    state: SubmitState,
    content_tx: Arc<watch::Sender<String>>,
    content_rx: watch::Receiver<String>,
}

impl<A, N, V> ArticleForm<A, N, V>
where
    A: ArticleApi,
    N: Notifier,
    V: Navigator,
{
    pub fn new(config: FormConfig, api: A, notifier: N, navigator: V) -> Self {
        let (content_tx, content_rx) = watch::channel(String::new());
        Self {
            config,
            api,
            notifier,
            navigator,
            draft: ArticleDraft::new(),
            errors: FieldErrors::new(),
            categories: Vec::new(),
            preview: None,
            image_generation: 0,
            state: SubmitState::Idle,
            content_tx: Arc::new(content_tx),
            content_rx,
        }
    }

    /// Start from an existing draft, e.g. one loaded from disk.
    pub fn with_draft(mut self, draft: ArticleDraft) -> Self {
        self.content_tx.send_replace(draft.content.clone());
        let _ = self.content_rx.borrow_and_update();
        self.draft = draft;
        self
    }

    /// Fetch the category options. On failure the list is left empty.
    pub async fn load_categories(&mut self) -> bool {
        match self.api.fetch_categories().await {
            Ok(categories) => {
                debug!(count = categories.len(), "categories loaded");
                self.categories = categories;
                true
            }
            Err(err) => {
                warn!(error = %err, "failed to load categories");
                self.categories.clear();
                self.notifier
                    .notify(Notification::error(ERROR_TITLE, CATEGORIES_FAILED_MESSAGE));
                false
            }
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn draft(&self) -> &ArticleDraft {
        &self.draft
    }

    /// Store `value` and drop any error shown for `field`. Does not re-validate.
    ///
    /// Returns false if the value does not fit the field.
    pub fn update_field(&mut self, field: FormField, value: impl Into<FieldValue>) -> bool {
        if !self.draft.set(field, value.into()) {
            debug!(%field, "value does not fit field");
            return false;
        }
        self.errors.remove(field);
        true
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.update_field(FormField::Title, FieldValue::Text(title.into()));
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.update_field(FormField::Category, FieldValue::Text(category.into()));
    }

    pub fn set_short_description(&mut self, text: impl Into<String>) {
        self.update_field(FormField::ShortDescription, FieldValue::Text(text.into()));
    }

    /// Set the body directly. Normally the editor supplies it through
    /// [`Self::content_channel`].
    pub fn set_content(&mut self, markup: impl Into<String>) {
        self.update_field(FormField::Content, FieldValue::Text(markup.into()));
    }

    pub fn set_status(&mut self, status: ArticleStatus) {
        self.update_field(FormField::Status, status);
    }

    pub fn set_featured(&mut self, featured: bool) {
        self.update_field(FormField::Featured, featured);
    }

    /// Raw comma-separated tag text.
    pub fn set_tags(&mut self, input: impl Into<String>) {
        self.update_field(FormField::Tags, FieldValue::Text(input.into()));
    }

    pub fn content_channel(&self) -> ContentChannel {
        ContentChannel(self.content_tx.clone())
    }

    /// Pull the latest markup sent on the content channel into the draft.
    ///
    /// Returns true if the content changed.
    pub fn sync_content(&mut self) -> bool {
        if !matches!(self.content_rx.has_changed(), Ok(true)) {
            return false;
        }
        let markup = self.content_rx.borrow_and_update().clone();
        if markup == self.draft.content {
            return false;
        }
        self.update_field(FormField::Content, markup)
    }

    /// Accept `file` as the article image.
    ///
    /// A rejected file raises one error notification and leaves the current
    /// image and preview as they were. An accepted file replaces both; render
    /// the returned request and hand the result to [`Self::apply_preview`].
    pub fn select_image(&mut self, file: SelectedFile) -> Result<PreviewRequest, AttachmentError> {
        let name = file.name.clone();
        match check_attachment(file, self.config.max_image_bytes) {
            Ok(attachment) => {
                self.image_generation += 1;
                debug!(
                    name = %name,
                    mime = %attachment.mime_type,
                    size = attachment.len(),
                    "image selected"
                );
                let request = PreviewRequest::new(&attachment, self.image_generation);
                self.draft.image = Some(attachment);
                self.preview = None;
                Ok(request)
            }
            Err(err) => {
                warn!(name = %name, error = %err, "image rejected");
                self.notifier
                    .notify(Notification::error(ERROR_TITLE, err.to_string()));
                Err(err)
            }
        }
    }

    /// Store a rendered preview if it belongs to the current image.
    pub fn apply_preview(&mut self, preview: ImagePreview) -> bool {
        if self.draft.image.is_none() || preview.generation != self.image_generation {
            debug!(generation = preview.generation, "stale preview dropped");
            return false;
        }
        self.preview = Some(preview);
        true
    }

    pub fn preview(&self) -> Option<&ImagePreview> {
        self.preview.as_ref()
    }

    pub fn clear_image(&mut self) {
        self.image_generation += 1;
        self.draft.image = None;
        self.preview = None;
    }

    /// Run all field rules, replacing the error mapping.
    pub fn validate_form(&mut self) -> bool {
        self.sync_content();
        self.errors = validate_draft(&self.draft, self.config.validation_policy);
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn field_error(&self, field: FormField) -> Option<&str> {
        self.errors.get(field)
    }

    /// Validate and, if valid, send the draft to the creation operation.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if !self.can_submit() {
            debug!(state = ?self.state, "submit ignored");
            return SubmitOutcome::Busy;
        }

        self.state = SubmitState::Validating;
        if !self.validate_form() {
            info!(fields = self.errors.len(), "article failed validation");
            self.state = SubmitState::Idle;
            return SubmitOutcome::Invalid;
        }

        self.state = SubmitState::Submitting;
        let request = CreateArticleRequest::from_draft(&self.draft);
        match self.api.create_article(request).await {
            Ok(Some(created)) => {
                info!(id = %created.id, "article created");
                self.notifier
                    .notify(Notification::success(SUCCESS_TITLE, CREATED_MESSAGE));
                self.navigator
                    .schedule(self.config.navigation_delay(), &self.config.redirect_route);
                self.state = SubmitState::Succeeded;
                SubmitOutcome::Created(created)
            }
            Ok(None) => {
                info!("article creation rejected");
                self.notifier
                    .notify(Notification::error(ERROR_TITLE, REJECTED_MESSAGE));
                self.state = SubmitState::Idle;
                SubmitOutcome::Rejected
            }
            Err(err) => {
                warn!(error = %err, "article creation failed");
                self.notifier
                    .notify(Notification::error(ERROR_TITLE, FAILED_MESSAGE));
                self.state = SubmitState::Idle;
                SubmitOutcome::Failed
            }
        }
    }

    /// Discard the draft and leave immediately.
    pub fn cancel(&mut self) {
        self.draft = ArticleDraft::new();
        self.errors.clear();
        self.clear_image();
        let _ = self.content_rx.borrow_and_update();
        self.state = SubmitState::Idle;
        self.navigator.navigate(&self.config.cancel_route);
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    /// True while the creation call is in flight.
    pub fn is_loading(&self) -> bool {
        self.state == SubmitState::Submitting
    }

    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        matches!(self.state, SubmitState::Idle)
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn navigator(&self) -> &V {
        &self.navigator
    }
}
