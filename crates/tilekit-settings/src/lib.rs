//! TileKit Settings Crate
//!
//! Handles application configuration: loading, validation and persistence.

pub mod config;
pub mod error;

pub use config::{Config, EditorSettings, LogFormat, LoggingSettings, APP_DIR, CONFIG_FILE};
pub use error::{SettingsError, SettingsResult};
