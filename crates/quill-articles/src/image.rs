//! Image attachment checks and preview rendering.

use base64::{Engine, engine::general_purpose::STANDARD};
use bytes::Bytes;
use mime_sniffer::MimeTypeSniffer;
use quill_common::AttachmentError;

use crate::draft::{ImageAttachment, ImagePreview};

/// A file the user picked, before it is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    /// Media type reported with the file, e.g. a browser `File.type`.
    pub declared_type: Option<String>,
    pub data: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            declared_type: None,
            data: data.into(),
        }
    }

    pub fn with_declared_type(mut self, mime_type: impl Into<String>) -> Self {
        self.declared_type = Some(mime_type.into());
        self
    }

    /// Declare the type implied by the file name's extension, if it has a
    /// known one.
    pub fn with_type_from_name(mut self) -> Self {
        if let Some(guess) = mime_guess::from_path(&self.name).first_raw() {
            self.declared_type = Some(guess.to_owned());
        }
        self
    }

    /// The declared media type, or one sniffed from the leading bytes when
    /// nothing was declared.
    pub fn mime_type(&self) -> &str {
        match self.declared_type.as_deref().map(str::trim) {
            Some(declared) if !declared.is_empty() => declared,
            _ => self
                .data
                .sniff_mime_type()
                .unwrap_or("application/octet-stream"),
        }
    }
}

/// Accept `file` if it is an image no larger than `max_bytes`.
pub fn check_attachment(
    file: SelectedFile,
    max_bytes: u64,
) -> Result<ImageAttachment, AttachmentError> {
    let size = file.data.len() as u64;
    if size > max_bytes {
        return Err(AttachmentError::TooLarge {
            size,
            max: max_bytes,
        });
    }

    let mime_type = file.mime_type().to_owned();
    if !mime_type.starts_with("image/") {
        return Err(AttachmentError::NotAnImage { mime_type });
    }

    Ok(ImageAttachment {
        name: file.name,
        mime_type,
        data: file.data,
    })
}

/// `data:<mime>;base64,<payload>`
pub fn data_url(mime_type: &str, data: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(data))
}

/// Deferred preview work for one accepted selection.
///
/// Holds its own copy of the bytes so it can run after the form has moved on;
/// the generation lets the form discard a preview for a superseded file.
#[derive(Debug, Clone)]
#[must_use = "the preview is only produced when rendered"]
pub struct PreviewRequest {
    mime_type: String,
    data: Bytes,
    generation: u64,
}

impl PreviewRequest {
    pub(crate) fn new(attachment: &ImageAttachment, generation: u64) -> Self {
        Self {
            mime_type: attachment.mime_type.clone(),
            data: attachment.data.clone(),
            generation,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub async fn render(self) -> ImagePreview {
        // Encoding can be large; let other tasks run first.
        tokio::task::yield_now().await;
        ImagePreview {
            data_url: data_url(&self.mime_type, &self.data),
            generation: self.generation,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    const MAX: u64 = 2 * 1024 * 1024;

    #[test]
    fn test_accepts_small_image() {
        let attachment = check_attachment(SelectedFile::new("cover.png", png(1024)), MAX).unwrap();
        assert_eq!(attachment.mime_type, "image/png");
        assert_eq!(attachment.name, "cover.png");
        assert_eq!(attachment.len(), 1024);
    }

    #[test]
    fn test_rejects_oversized() {
        let err = check_attachment(SelectedFile::new("big.png", png(MAX as usize + 1)), MAX)
            .unwrap_err();
        assert_eq!(
            err,
            AttachmentError::TooLarge {
                size: MAX + 1,
                max: MAX
            }
        );
        // Exactly at the limit is fine.
        assert!(check_attachment(SelectedFile::new("edge.png", png(MAX as usize)), MAX).is_ok());
    }

    #[test]
    fn test_rejects_non_image() {
        let err = check_attachment(SelectedFile::new("doc.png", pdf()), MAX).unwrap_err();
        assert!(matches!(err, AttachmentError::NotAnImage { .. }));
    }

    #[test]
    fn test_declared_type_wins_over_sniffing() {
        let svg = Bytes::from_static(
            b"<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"1\" height=\"1\"></svg>",
        );
        let attachment = check_attachment(
            SelectedFile::new("logo.svg", svg.clone()).with_declared_type("image/svg+xml"),
            MAX,
        )
        .unwrap();
        assert_eq!(attachment.mime_type, "image/svg+xml");

        let guessed = SelectedFile::new("logo.svg", svg).with_type_from_name();
        assert_eq!(guessed.mime_type(), "image/svg+xml");
        assert!(check_attachment(guessed, MAX).is_ok());

        let err = check_attachment(
            SelectedFile::new("cover.png", png(64)).with_declared_type("application/pdf"),
            MAX,
        )
        .unwrap_err();
        assert_eq!(
            err,
            AttachmentError::NotAnImage {
                mime_type: "application/pdf".into()
            }
        );
    }

    #[test]
    fn test_blank_declared_type_falls_back_to_sniffing() {
        let file = SelectedFile::new("cover", png(64)).with_declared_type("  ");
        assert_eq!(file.mime_type(), "image/png");
        assert_eq!(SelectedFile::new("notes", pdf()).with_type_from_name().declared_type, None);
    }

    #[test]
    fn test_data_url() {
        assert_eq!(data_url("image/png", b"abc"), "data:image/png;base64,YWJj");
    }

    #[tokio::test]
    async fn test_preview_keeps_generation() {
        let attachment = check_attachment(SelectedFile::new("a.png", png(32)), MAX).unwrap();
        let preview = PreviewRequest::new(&attachment, 7).render().await;
        assert_eq!(preview.generation, 7);
        assert!(preview.data_url.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }
}
