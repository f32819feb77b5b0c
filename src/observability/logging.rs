//! Structured logging configuration.

use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Environment variable holding a log filter directive.
pub const LOG_ENV: &str = "GRAPHRAG_VIZ_LOG";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name, falling back to [`LogFormat::Pretty`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// Log file; stderr when `None`.
    pub file: Option<PathBuf>,
    /// Event filter.
    pub filter: EnvFilter,
}

impl LoggingConfig {
    /// Builds logging configuration from config file settings.
    ///
    /// The filter comes from `GRAPHRAG_VIZ_LOG`, then `RUST_LOG`. Without
    /// either, `verbose` selects `graphrag_viz=debug` and otherwise only
    /// warnings are shown.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        let directive = std::env::var(LOG_ENV)
            .or_else(|_| std::env::var("RUST_LOG"))
            .ok()
            .filter(|d| !d.trim().is_empty());
        Self::resolve(settings, verbose, directive.as_deref())
    }

    fn resolve(settings: Option<&LoggingSettings>, verbose: bool, directive: Option<&str>) -> Self {
        let fallback = if verbose { "graphrag_viz=debug" } else { "warn" };
        let filter = directive
            .and_then(|d| EnvFilter::try_new(d).ok())
            .unwrap_or_else(|| EnvFilter::new(fallback));

        Self {
            format: settings
                .and_then(|s| s.format.as_deref())
                .map(LogFormat::parse)
                .unwrap_or_default(),
            file: settings.and_then(|s| s.file.clone()),
            filter,
        }
    }
}
