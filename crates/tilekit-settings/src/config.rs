//! Configuration and settings management for TileKit
//!
//! Supports JSON and TOML files. The default location is
//! `<platform config dir>/tilekit/config.toml`.
//!
//! Configuration is organized into sections:
//! - History (undo depth)
//! - Editor defaults (new scene size and layers)
//! - Logging (level and output format)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use tilekit_core::DEFAULT_LAYERS;
use tilekit_history::HistoryConfig;

use crate::error::{SettingsError, SettingsResult};

/// Directory name under the platform config dir
pub const APP_DIR: &str = "tilekit";

/// Default config file name
pub const CONFIG_FILE: &str = "config.toml";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line output
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` takes precedence
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Defaults for newly created scenes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub scene_width: u32,
    pub scene_height: u32,
    pub layers: Vec<String>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            scene_width: 32,
            scene_height: 32,
            layers: DEFAULT_LAYERS.iter().map(|l| l.to_string()).collect(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub history: HistoryConfig,
    pub editor: EditorSettings,
    pub logging: LoggingSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config dir>/tilekit/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no platform config directory".to_string())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match Format::of(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Loads `path`, or the default location when `None`.
    ///
    /// A missing file yields the defaults; a file that exists but cannot be
    /// parsed or validated is an error.
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Ok(path) => path,
                Err(err) => {
                    tracing::warn!("{}; using default settings", err);
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            tracing::info!("No settings at {}; using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from_file(&path)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if self.history.max_undo_depth == 0 {
            return Err(SettingsError::invalid(
                "history.max_undo_depth",
                "must be at least 1",
            ));
        }

        if self.editor.scene_width == 0 || self.editor.scene_height == 0 {
            return Err(SettingsError::invalid(
                "editor.scene_width/scene_height",
                "scene dimensions must be > 0",
            ));
        }

        if self.editor.layers.iter().any(|l| l.trim().is_empty()) {
            return Err(SettingsError::invalid(
                "editor.layers",
                "layer names must not be empty",
            ));
        }

        if self.logging.level.trim().is_empty() {
            return Err(SettingsError::invalid("logging.level", "must not be empty"));
        }

        Ok(())
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(SettingsError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}
