//! URL dialog for link and image insertion.
//!
//! Opening the dialog captures the editor's insertion point; resolving it
//! restores that point and inserts, cancelling changes nothing.

use crate::markup;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    Link,
    Image,
}

impl PromptKind {
    /// Dialog title shown to the user.
    pub fn title(self) -> &'static str {
        match self {
            Self::Link => "Enter URL",
            Self::Image => "Enter image URL",
        }
    }
}

/// How a dialog was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptOutcome {
    Inserted,
    /// Resolved with a blank URL; nothing inserted.
    Empty,
    Cancelled,
}

/// An open URL dialog.
#[derive(Debug, Clone)]
pub struct PendingPrompt<B> {
    pub kind: PromptKind,
    /// Insertion point captured when the dialog opened.
    pub bookmark: Option<B>,
    pub input: String,
}

impl<B> PendingPrompt<B> {
    pub fn new(kind: PromptKind, bookmark: Option<B>) -> Self {
        Self {
            kind,
            bookmark,
            input: String::new(),
        }
    }
}

/// Markup to insert for a resolved dialog, or `None` for a blank URL.
///
/// Links wrap `selected` when present; otherwise the URL is the link text.
pub fn insertion_markup(kind: PromptKind, url: &str, selected: Option<&str>) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    let built = match kind {
        PromptKind::Link => markup::anchor(url, selected.unwrap_or_default()),
        PromptKind::Image => markup::image(url),
    };
    built.ok()
}
