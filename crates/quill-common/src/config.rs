//! Application configuration.
//!
//! Loaded from TOML. `$NAME` placeholders in the file are replaced with the
//! matching environment variable before parsing, so secrets and per-host
//! values can stay out of the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

/// Maximum accepted image attachment size (2 MiB).
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 2 * 1024 * 1024;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub form: FormConfig,
    pub editor: EditorConfig,
    pub organization: OrganizationConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".into(),
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    /// Parsed base URL, always ending in `/` so endpoints join beneath it.
    pub fn url(&self) -> Result<Url, ConfigError> {
        let mut raw = self.base_url.trim().to_owned();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Url::parse(&raw).map_err(|e| ConfigError::InvalidValue {
            field: "api.base_url",
            message: e.to_string(),
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Which message wins when several rules fail for one field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationPolicy {
    /// Each failing rule overwrites the field's message; the last one is shown.
    #[default]
    LastFailureWins,
    /// The first failing rule's message is kept.
    FirstFailureWins,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FormConfig {
    /// Delay between a successful submission and navigating away.
    pub navigation_delay_ms: u64,
    /// Route opened after a successful submission.
    pub redirect_route: String,
    /// Route opened when the form is cancelled.
    pub cancel_route: String,
    pub validation_policy: ValidationPolicy,
    pub max_image_bytes: u64,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            navigation_delay_ms: 1500,
            redirect_route: "/news".into(),
            cancel_route: "/news".into(),
            validation_policy: ValidationPolicy::default(),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

impl FormConfig {
    pub fn navigation_delay(&self) -> Duration {
        Duration::from_millis(self.navigation_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EditorConfig {
    pub placeholder: Option<String>,
    pub undo_depth: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            placeholder: Some("Write your article here...".into()),
            undo_depth: 100,
        }
    }
}

/// Organization context shown around the form.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OrganizationConfig {
    pub name: String,
    pub locale: String,
    pub theme: String,
}

impl Default for OrganizationConfig {
    fn default() -> Self {
        Self {
            name: "Training Center".into(),
            locale: "en".into(),
            theme: "light".into(),
        }
    }
}

impl AppConfig {
    /// Load from a TOML file, substituting `$VAR` with environment values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&substitute_vars(&text, std::env::vars()), path)
    }

    /// Parse TOML text that has already had variables substituted.
    pub fn parse(text: &str, origin: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.into(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from the environment.
    ///
    /// - `QUILL_CONFIG`: path to a TOML config file (optional)
    /// - `QUILL_API_URL`: overrides `api.base_url` (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("QUILL_CONFIG") {
            Ok(path) => Self::load(path)?,
            Err(_) => Self::default(),
        };
        if let Ok(url) = std::env::var("QUILL_API_URL") {
            config.api.base_url = url;
        }
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.url()?;
        if self.form.max_image_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "form.max_image_bytes",
                message: "must be greater than zero".into(),
            });
        }
        if self.editor.undo_depth == 0 {
            return Err(ConfigError::InvalidValue {
                field: "editor.undo_depth",
                message: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

/// Replace `$NAME` occurrences with the matching value.
///
/// Longer names are substituted first so `$API_URL` is not clobbered by a
/// shorter `$API`.
pub fn substitute_vars<K, V>(text: &str, vars: impl IntoIterator<Item = (K, V)>) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut vars: Vec<(K, V)> = vars.into_iter().collect();
    vars.sort_by_key(|(k, _)| std::cmp::Reverse(k.as_ref().len()));

    let mut out = text.to_owned();
    for (k, v) in vars {
        out = out.replace(&format!("${}", k.as_ref()), v.as_ref());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.form.navigation_delay(), Duration::from_millis(1500));
        assert_eq!(config.form.redirect_route, "/news");
        assert_eq!(config.form.max_image_bytes, 2 * 1024 * 1024);
        assert_eq!(
            config.form.validation_policy,
            ValidationPolicy::LastFailureWins
        );
        assert_eq!(config.editor.undo_depth, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_file() {
        let text = r#"
            [api]
            base_url = "https://admin.example.org/api"

            [form]
            validation_policy = "first-failure-wins"
            navigation_delay_ms = 500
        "#;
        let config = AppConfig::parse(text, "quill.toml").unwrap();
        assert_eq!(
            config.api.url().unwrap().as_str(),
            "https://admin.example.org/api/"
        );
        assert_eq!(
            config.form.validation_policy,
            ValidationPolicy::FirstFailureWins
        );
        assert_eq!(config.form.navigation_delay_ms, 500);
        assert_eq!(config.form.redirect_route, "/news");
        assert_eq!(config.organization.locale, "en");
    }

    #[test]
    fn test_substitution_prefers_longest_name() {
        let text = "base_url = \"$API_URL\"\nname = \"$API\"";
        let vars = [("API", "short"), ("API_URL", "https://x.example")];
        assert_eq!(
            substitute_vars(text, vars),
            "base_url = \"https://x.example\"\nname = \"short\""
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = AppConfig::parse("[api]\nbase_url = \"not a url\"", "bad.toml").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "api.base_url",
                ..
            }
        ));

        let err = AppConfig::parse("[form]\nmax_image_bytes = 0", "bad.toml").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = AppConfig::parse("[form]\nvalidation_policy = \"sometimes\"", "bad.toml")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::load("/nonexistent/quill.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
