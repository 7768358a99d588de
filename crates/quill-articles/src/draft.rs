//! The article record being authored.

use std::fmt;
use std::path::Path;

use bytes::Bytes;
use quill_common::DraftError;
use serde::{Deserialize, Serialize};

use crate::tags::parse_tags;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    #[default]
    Draft,
    Published,
}

impl ArticleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::Published => "published",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "draft" => Some(ArticleStatus::Draft),
            "published" => Some(ArticleStatus::Published),
            _ => None,
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An accepted image file. Only constructed by [`crate::image::check_attachment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub name: String,
    pub mime_type: String,
    pub data: Bytes,
}

impl ImageAttachment {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Locally rendered preview of the selected image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePreview {
    pub data_url: String,
    /// Selection this preview was rendered for.
    pub generation: u64,
}

/// The form's working record.
///
/// Serialized with the same camelCase names the creation endpoint uses, so a
/// draft file and a request body share one shape. `tag_input` is the raw
/// comma-separated text; `tags` is derived from it when the draft is sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArticleDraft {
    pub title: String,
    pub category: String,
    pub short_description: String,
    pub content: String,
    pub status: ArticleStatus,
    pub featured: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tag_input: String,
    pub tags: Vec<String>,
    #[serde(skip)]
    pub image: Option<ImageAttachment>,
}

impl ArticleDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a draft from a `.toml` or `.json` file.
    ///
    /// A file that lists `tags` but no `tagInput` gets its tag input rebuilt
    /// from the list, so tags survive the derivation done at submission.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DraftError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DraftError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let mut draft: Self = match extension.as_deref() {
            Some("toml") => toml::from_str(&text).map_err(|e| DraftError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?,
            Some("json") => serde_json::from_str(&text).map_err(|e| DraftError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?,
            _ => {
                return Err(DraftError::UnsupportedFormat {
                    path: path.to_path_buf(),
                });
            }
        };

        if draft.tag_input.is_empty() && !draft.tags.is_empty() {
            draft.tag_input = draft.tags.join(", ");
        }
        Ok(draft)
    }

    /// Tag sequence as it will be submitted.
    pub fn derived_tags(&self) -> Vec<String> {
        parse_tags(&self.tag_input)
    }

    pub fn get(&self, field: FormField) -> FieldValue {
        match field {
            FormField::Title => FieldValue::Text(self.title.clone()),
            FormField::Category => FieldValue::Text(self.category.clone()),
            FormField::ShortDescription => FieldValue::Text(self.short_description.clone()),
            FormField::Content => FieldValue::Text(self.content.clone()),
            FormField::Tags => FieldValue::Text(self.tag_input.clone()),
            FormField::Status => FieldValue::Status(self.status),
            FormField::Featured => FieldValue::Flag(self.featured),
        }
    }

    /// Store `value` in `field`.
    ///
    /// Returns false, leaving the draft untouched, when the value's kind does
    /// not fit the field. Status also accepts its text form.
    pub fn set(&mut self, field: FormField, value: FieldValue) -> bool {
        match (field, value) {
            (FormField::Title, FieldValue::Text(v)) => self.title = v,
            (FormField::Category, FieldValue::Text(v)) => self.category = v,
            (FormField::ShortDescription, FieldValue::Text(v)) => self.short_description = v,
            (FormField::Content, FieldValue::Text(v)) => self.content = v,
            (FormField::Tags, FieldValue::Text(v)) => self.tag_input = v,
            (FormField::Status, FieldValue::Status(v)) => self.status = v,
            (FormField::Status, FieldValue::Text(v)) => match ArticleStatus::parse(&v) {
                Some(status) => self.status = status,
                None => return false,
            },
            (FormField::Featured, FieldValue::Flag(v)) => self.featured = v,
            _ => return false,
        }
        true
    }
}

/// Editable fields of the form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Title,
    Category,
    ShortDescription,
    Content,
    Status,
    Featured,
    Tags,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::Title,
        FormField::Category,
        FormField::ShortDescription,
        FormField::Content,
        FormField::Status,
        FormField::Featured,
        FormField::Tags,
    ];

    /// Name used on the wire and in error mappings.
    pub fn wire_name(&self) -> &'static str {
        match self {
            FormField::Title => "title",
            FormField::Category => "category",
            FormField::ShortDescription => "shortDescription",
            FormField::Content => "content",
            FormField::Status => "status",
            FormField::Featured => "featured",
            FormField::Tags => "tags",
        }
    }

    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.wire_name() == name)
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// A new value for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Status(ArticleStatus),
    Flag(bool),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl From<ArticleStatus> for FieldValue {
    fn from(value: ArticleStatus) -> Self {
        FieldValue::Status(value)
    }
}
