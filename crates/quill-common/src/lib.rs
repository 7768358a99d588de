//! Shared error types, configuration and telemetry for quill crates.

pub mod config;
pub mod error;
#[cfg(feature = "telemetry")]
pub mod telemetry;

pub use config::{
    ApiConfig, AppConfig, DEFAULT_MAX_IMAGE_BYTES, EditorConfig, FormConfig, OrganizationConfig,
    ValidationPolicy,
};
pub use error::{ApiError, AttachmentError, ConfigError, DraftError, QuillError, Result};
