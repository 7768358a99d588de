//! Console logging for quill binaries.
//!
//! ```ignore
//! use quill_common::telemetry::{self, TelemetryConfig};
//!
//! telemetry::init(TelemetryConfig::from_env("quill"));
//! tracing::info!("started");
//! ```

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub service_name: String,
    /// Used when `RUST_LOG` is unset.
    pub default_level: Level,
    /// Prefix each line with the emitting module.
    pub show_targets: bool,
}

impl TelemetryConfig {
    /// Level comes from `QUILL_LOG_LEVEL`, else DEBUG in debug builds and
    /// INFO otherwise.
    pub fn from_env(service_name: impl Into<String>) -> Self {
        let fallback = if cfg!(debug_assertions) {
            Level::DEBUG
        } else {
            Level::INFO
        };
        let default_level = std::env::var("QUILL_LOG_LEVEL")
            .ok()
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(fallback);

        Self {
            service_name: service_name.into(),
            default_level,
            show_targets: cfg!(debug_assertions),
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.default_level.as_str().to_lowercase()))
    }
}

/// Install the global subscriber. Returns false if one was already set.
pub fn init(config: TelemetryConfig) -> bool {
    let console = tracing_subscriber::fmt::layer()
        .with_target(config.show_targets)
        .without_time()
        .compact()
        .with_filter(config.filter());

    let installed = tracing_subscriber::registry().with(console).try_init().is_ok();
    if installed {
        tracing::debug!(service = %config.service_name, "logging ready");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_refused() {
        let config = TelemetryConfig {
            service_name: "quill-test".into(),
            default_level: Level::WARN,
            show_targets: false,
        };
        init(config.clone());
        assert!(!init(config));
    }
}
