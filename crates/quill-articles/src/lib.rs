//! quill-articles: authoring and submitting articles.
//!
//! - [`ArticleForm`] - draft state, validation, image attachment and submission
//! - [`ArticleScreen`] - binds a [`quill_editor_core::ContentEditor`] to a form
//! - [`ArticleApi`] / [`HttpArticleApi`] - category listing and article creation
//! - [`Notifier`] and [`Navigator`] - how the form reports back to the user

pub mod api;
pub mod draft;
pub mod form;
pub mod image;
pub mod navigate;
pub mod notify;
pub mod screen;
pub mod tags;
pub mod validate;

pub use api::{
    ArticleApi, Category, CreateArticleRequest, CreatedArticle, HttpArticleApi, interpret_creation,
};
pub use draft::{ArticleDraft, ArticleStatus, FieldValue, FormField, ImageAttachment, ImagePreview};
pub use form::{ArticleForm, ContentChannel, SubmitOutcome, SubmitState};
pub use image::{PreviewRequest, SelectedFile, check_attachment};
pub use navigate::{DelayedNavigator, Navigator};
pub use notify::{Notification, NotificationKind, Notifier, TracingNotifier};
pub use screen::ArticleScreen;
pub use tags::parse_tags;
pub use validate::{FieldErrors, validate_draft};
