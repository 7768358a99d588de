use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for quill operations
#[derive(Debug, Error, Diagnostic)]
pub enum QuillError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Attachment(#[from] AttachmentError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Draft(#[from] DraftError),

    #[error(transparent)]
    #[diagnostic(code(quill::io))]
    Io(#[from] std::io::Error),
}

/// Configuration errors
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    #[diagnostic(code(config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}", path.display())]
    #[diagnostic(code(config::parse))]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration value for {field}: {message}")]
    #[diagnostic(code(config::invalid))]
    InvalidValue { field: &'static str, message: String },
}

/// Errors talking to the article API
#[derive(Debug, Error, Diagnostic)]
pub enum ApiError {
    #[error("request failed")]
    #[diagnostic(code(api::transport), help("Check that the API server is reachable"))]
    Transport(#[from] reqwest::Error),

    #[error("server responded with status {status}")]
    #[diagnostic(code(api::status))]
    Status { status: u16, body: String },

    #[error("could not decode response: {message}")]
    #[diagnostic(code(api::decode))]
    Decode { message: String },

    #[error("invalid API url {url}: {message}")]
    #[diagnostic(code(api::url))]
    InvalidUrl { url: String, message: String },
}

/// Image attachment rejected at selection time.
///
/// Messages are shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum AttachmentError {
    #[error("Image must be {} MB or smaller", .max / (1024 * 1024))]
    #[diagnostic(code(attachment::too_large))]
    TooLarge { size: u64, max: u64 },

    #[error("Please select an image file")]
    #[diagnostic(code(attachment::not_an_image), help("detected type: {mime_type}"))]
    NotAnImage { mime_type: String },
}

/// Errors loading an article draft from disk
#[derive(Debug, Error, Diagnostic)]
pub enum DraftError {
    #[error("failed to read draft {}", path.display())]
    #[diagnostic(code(draft::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse draft {}: {message}", path.display())]
    #[diagnostic(code(draft::parse))]
    Parse { path: PathBuf, message: String },

    #[error("unsupported draft format: {}", path.display())]
    #[diagnostic(code(draft::format), help("Use a .toml or .json file"))]
    UnsupportedFormat { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, QuillError>;
