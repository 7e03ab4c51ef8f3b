//! Configuration management for mdlive
//!
//! Handles loading and validating configuration. Configuration is stored as
//! JSON in the platform configuration directory, or passed explicitly on the
//! command line. Every section falls back to defaults for missing fields.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier used for the configuration directory
pub const APP_ID: &str = "mdlive";

/// Configuration file name inside the configuration directory
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Maximum file size to annotate (in bytes) - 10MB
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Heading content sizes in points, levels 1 through 6
pub const DEFAULT_HEADING_SIZES: [f32; 6] = [22.0, 18.0, 16.0, 14.0, 13.0, 12.0];

/// Body text size in points
pub const DEFAULT_BASE_FONT_SIZE: f32 = 12.0;

/// Size used to visually collapse dimmed markers
pub const DEFAULT_DIM_FONT_SIZE: f32 = 1.0;

/// Requirement identifiers such as `Y10K-PROJ-AREA-HL-001`
pub const DEFAULT_REQUIREMENT_ID_PATTERN: &str =
    r"\bY10K-[A-Z0-9]+-[A-Z0-9]+-(?:HL|LL|CMP|API|DB|TST)-\d{3}\b";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Annotation rules
    pub annotator: AnnotatorConfig,

    /// Visual style of annotations
    pub theme: ThemeConfig,

    /// File handling
    pub files: FileConfig,
}

impl Config {
    /// Load configuration from the default location, or return defaults
    /// when no configuration file exists yet
    pub fn load() -> ConfigResult<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            log::debug!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::LoadError {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Get the configuration directory path
    pub fn config_dir() -> ConfigResult<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_ID))
            .ok_or(ConfigError::DirectoryError)
    }

    /// Get the default configuration file path
    pub fn config_path() -> ConfigResult<PathBuf> {
        Self::config_dir().map(|p| p.join(CONFIG_FILE_NAME))
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> ConfigResult<()> {
        let theme = &self.theme;
        if theme.base_font_size <= 0.0 {
            return Err(invalid("theme.base_font_size", "must be positive"));
        }
        if theme.dim_font_size <= 0.0 || theme.dim_font_size > theme.base_font_size {
            return Err(invalid(
                "theme.dim_font_size",
                "must be positive and not larger than theme.base_font_size",
            ));
        }
        if let Some(level) = theme.heading_sizes.iter().position(|size| *size <= 0.0) {
            return Err(invalid(
                "theme.heading_sizes",
                &format!("size for level {} must be positive", level + 1),
            ));
        }
        if self.files.max_file_size == 0 {
            return Err(invalid("files.max_file_size", "must be greater than zero"));
        }
        Ok(())
    }
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// Annotation rule configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// Highlight requirement identifiers in normal lines
    pub highlight_requirement_ids: bool,

    /// Pattern recognising requirement identifiers
    pub requirement_id_pattern: String,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            highlight_requirement_ids: true,
            requirement_id_pattern: DEFAULT_REQUIREMENT_ID_PATTERN.to_string(),
        }
    }
}

/// Visual style configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Theme preference
    pub theme: ThemePreference,

    /// Body text size in points
    pub base_font_size: f32,

    /// Font size for dimmed markers in points
    pub dim_font_size: f32,

    /// Heading content sizes in points, levels 1 through 6
    pub heading_sizes: [f32; 6],

    /// Font family for fenced and inline code
    pub code_font_family: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            theme: ThemePreference::Light,
            base_font_size: DEFAULT_BASE_FONT_SIZE,
            dim_font_size: DEFAULT_DIM_FONT_SIZE,
            heading_sizes: DEFAULT_HEADING_SIZES,
            code_font_family: "Monospace".to_string(),
        }
    }
}

/// File handling configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Maximum file size to open (in bytes)
    pub max_file_size: u64,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
        }
    }
}

/// Theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    /// Light background
    #[default]
    Light,
    /// Dark background
    Dark,
}

impl ThemePreference {
    pub fn is_dark(self) -> bool {
        matches!(self, ThemePreference::Dark)
    }
}
