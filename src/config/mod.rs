//! Configuration management.
//!
//! Settings come from a TOML file and are then overridden by command-line
//! flags. Every key is optional:
//!
//! ```toml
//! output = "graphrag_visualization.html"
//! format = "parquet"
//!
//! [render]
//! height = "800px"
//! width = "100%"
//! title = "GraphRAG Visualization"
//! physics = true
//! color_by_category = true
//!
//! [build]
//! endpoints = "synthesize"   # or "reject"
//! duplicates = "last-write-wins"   # or "reject"
//!
//! [logging]
//! format = "pretty"   # or "json"
//! file = "/tmp/graphrag-viz.log"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::io::Format;
use crate::rendering::RenderOptions;
use crate::services::{BuildOptions, DuplicatePolicy, EndpointPolicy};

/// Directory name used under the platform config directory.
const CONFIG_DIR_NAME: &str = "graphrag-viz";

/// Default output document path.
pub const DEFAULT_OUTPUT: &str = "graphrag_visualization.html";

/// Main configuration for the visualizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualizerConfig {
    /// Where the HTML document is written.
    pub output: PathBuf,
    /// Input format override; `None` detects from file extensions.
    pub format: Option<Format>,
    /// Document options.
    pub render: RenderOptions,
    /// Graph construction options.
    pub build: BuildOptions,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Logging section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `pretty` or `json`.
    pub format: Option<String>,
    /// Log file path; logs go to stderr when unset.
    pub file: Option<PathBuf>,
}

/// Command-line settings that take precedence over the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Output path.
    pub output: Option<PathBuf>,
    /// Input format.
    pub format: Option<Format>,
    /// Reject relationship endpoints without an entity row.
    pub strict_endpoints: bool,
    /// Reject duplicate entity ids.
    pub strict_ids: bool,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Output path.
    pub output: Option<String>,
    /// Input format name.
    pub format: Option<String>,
    /// Render section.
    pub render: Option<RenderOptions>,
    /// Build section.
    pub build: Option<BuildOptions>,
    /// Logging section.
    pub logging: Option<LoggingSettings>,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            format: None,
            render: RenderOptions::default(),
            build: BuildOptions::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl VisualizerConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or names an
    /// unknown input format.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: format!("{}: {e}", path.display()),
            })?;

        let file: ConfigFile =
            toml::from_str(&contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;

        Self::from_config_file(file)
    }

    /// Loads configuration from the default location.
    ///
    /// Checks `<config dir>/graphrag-viz/config.toml`, then
    /// `~/.config/graphrag-viz/config.toml`. Returns `None` when neither
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the first config file found cannot be read or
    /// parsed. Later candidates are not tried.
    pub fn load_default() -> crate::Result<Option<Self>> {
        Self::load_first(&Self::default_paths())
    }

    /// Returns the config file locations searched by [`Self::load_default`].
    #[must_use]
    pub fn default_paths() -> Vec<PathBuf> {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Vec::new();
        };

        let mut paths = vec![base_dirs.config_dir().join(CONFIG_DIR_NAME).join("config.toml")];
        let xdg_config = base_dirs
            .home_dir()
            .join(".config")
            .join(CONFIG_DIR_NAME)
            .join("config.toml");
        if !paths.contains(&xdg_config) {
            paths.push(xdg_config);
        }
        paths
    }

    fn load_first(candidates: &[PathBuf]) -> crate::Result<Option<Self>> {
        candidates
            .iter()
            .find(|path| path.exists())
            .map(|path| Self::load_from_file(path))
            .transpose()
    }

    fn from_config_file(file: ConfigFile) -> crate::Result<Self> {
        let mut config = Self::default();

        if let Some(output) = file.output {
            config.output = PathBuf::from(output);
        }
        if let Some(format) = file.format {
            config.format = Some(format.parse()?);
        }
        if let Some(render) = file.render {
            config.render = render;
        }
        if let Some(build) = file.build {
            config.build = build;
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        Ok(config)
    }

    /// Sets the output path.
    #[must_use]
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = path.into();
        self
    }

    /// Sets the input format override.
    #[must_use]
    pub const fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    /// Sets the build options.
    #[must_use]
    pub const fn with_build(mut self, build: BuildOptions) -> Self {
        self.build = build;
        self
    }

    /// Sets the render options.
    #[must_use]
    pub fn with_render(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    /// Applies command-line overrides. Unset overrides keep the file value;
    /// the strict flags only ever tighten a policy.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(output) = &overrides.output {
            self.output.clone_from(output);
        }
        if let Some(format) = overrides.format {
            self.format = Some(format);
        }
        if overrides.strict_endpoints {
            self.build.endpoints = EndpointPolicy::Reject;
        }
        if overrides.strict_ids {
            self.build.duplicates = DuplicatePolicy::Reject;
        }
        self
    }
}
