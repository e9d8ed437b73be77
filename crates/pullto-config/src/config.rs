//! Configuration management for pullto

use pullto_foundation::{LineEnding, PullError, PullResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Editor formatting settings
    #[serde(default)]
    pub editor: EditorConfig,
    /// Pull behaviour
    #[serde(default)]
    pub pull: PullConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Editor formatting settings the renderer needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Width of one indent unit in spaces
    pub indent_width: usize,
    /// Line ending used when joining extracted text
    pub line_ending: LineEndingSetting,
}

/// Line ending preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEndingSetting {
    /// Detect from the document being edited
    #[default]
    Auto,
    Lf,
    Crlf,
}

impl LineEndingSetting {
    /// Resolve against the text of the document being edited
    pub fn resolve(&self, text: &str) -> LineEnding {
        match self {
            LineEndingSetting::Auto => LineEnding::detect(text),
            LineEndingSetting::Lf => LineEnding::Lf,
            LineEndingSetting::Crlf => LineEnding::Crlf,
        }
    }
}

/// Pull pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullConfig {
    /// Extension of target files (`IMyClass` is looked up as `IMyClass.<ext>`)
    pub file_extension: String,
    /// Glob patterns excluded from target lookup
    pub exclude: Vec<String>,
    /// Remove the member from the source after pulling it into a base class
    pub remove_from_source: bool,
    /// Allow methods to be pulled into base classes
    pub allow_methods_to_base_class: bool,
}

/// Log output format
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format for development
    #[default]
    Pretty,
    /// Structured JSON format
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            line_ending: LineEndingSetting::Auto,
        }
    }
}

impl Default for PullConfig {
    fn default() -> Self {
        Self {
            file_extension: "cs".to_string(),
            exclude: vec![
                "**/node_modules/**".to_string(),
                "**/bin/**".to_string(),
                "**/obj/**".to_string(),
            ],
            remove_from_source: true,
            allow_methods_to_base_class: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

const CONFIG_FILES: [&str; 2] = ["pullto.toml", ".pullto/config.toml"];

impl AppConfig {
    /// Load configuration relative to the current directory
    pub fn load() -> PullResult<Self> {
        Self::load_from(Path::new("."))
    }

    /// Load configuration from environment and config files under `root`
    ///
    /// Priority order (highest to lowest):
    /// 1. Environment variables (`PULLTO__EDITOR__INDENT_WIDTH=2`)
    /// 2. `pullto.toml` or `.pullto/config.toml` (first found)
    /// 3. Default values
    pub fn load_from(root: &Path) -> PullResult<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Toml},
            Figment,
        };

        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        for name in CONFIG_FILES {
            let path = root.join(name);
            if path.exists() {
                tracing::debug!(path = %path.display(), "Loading TOML configuration");
                figment = figment.merge(Toml::file(path));
                break;
            }
        }

        let figment = figment.merge(Env::prefixed("PULLTO__").split("__"));

        let app_config: AppConfig = figment
            .extract()
            .map_err(|e| PullError::config(format!("Failed to load configuration: {}", e)))?;

        app_config.validate()?;

        tracing::debug!(
            indent_width = app_config.editor.indent_width,
            extension = %app_config.pull.file_extension,
            "Configuration loaded"
        );

        Ok(app_config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> PullResult<()> {
        if self.editor.indent_width == 0 || self.editor.indent_width > 16 {
            return Err(PullError::config(format!(
                "Indent width must be between 1 and 16, got {}",
                self.editor.indent_width
            )));
        }

        let extension = self.pull.file_extension.trim_start_matches('.');
        if extension.is_empty() || extension.contains(['/', '\\', '*']) {
            return Err(PullError::config(format!(
                "Invalid target file extension '{}'",
                self.pull.file_extension
            )));
        }

        for pattern in &self.pull.exclude {
            if pattern.trim().is_empty() {
                return Err(PullError::config("Exclude patterns cannot be empty"));
            }
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(PullError::config(format!(
                "Invalid log level '{}', must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            )));
        }

        Ok(())
    }

    /// Target file name for a type name (`IMyClass` -> `IMyClass.cs`)
    pub fn target_file_name(&self, type_name: &str) -> String {
        format!(
            "{}.{}",
            type_name,
            self.pull.file_extension.trim_start_matches('.')
        )
    }
}
