//! # TileKit
//!
//! Undo/redo history for a tile-map editor.
//!
//! ## Architecture
//!
//! TileKit is organized as a workspace with multiple crates:
//!
//! 1. **tilekit-core** - Scene model, errors, shared type aliases
//! 2. **tilekit-history** - Operations, grouping, the bounded history manager
//! 3. **tilekit-settings** - Configuration file loading and validation
//! 4. **tilekit** - Editor session, script replay, and the main binary
//!
//! ## Features
//!
//! - **Reversible operations**: tile paint/erase, move, delete, paste, fill
//! - **Grouping**: nested begin/end groups fold a gesture into one undo step
//! - **Bounded history**: oldest entries are evicted past the configured depth
//! - **Notifications**: listeners learn when undo/redo availability changes

pub mod script;
pub mod session;

pub use script::{ReplayReport, SceneTemplate, ScriptStep, SessionScript};
pub use session::EditorSession;

pub use tilekit_core::{
    Error, HistoryError, LayerId, Result, Scene, SceneError, TileCoord, TileScene, TileValue,
    DEFAULT_LAYERS, EMPTY_TILE,
};

pub use tilekit_history::{
    ApplyDirection, ApplyHook, HistoryConfig, HistoryManager, HistoryStatus, Operation,
    OperationId, OperationKind, SubscriptionId, TileDelta, DEFAULT_MAX_UNDO,
};

pub use tilekit_settings::{Config, EditorSettings, LogFormat, LoggingSettings, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging from the logging settings
///
/// Sets up structured logging with:
/// - `RUST_LOG` support, falling back to the configured level
/// - Pretty or JSON output on stdout
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<()> {
    use anyhow::Context;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.level)
            .with_context(|| format!("invalid log level '{}'", settings.level))?,
    };

    match settings.format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(true)
                .with_level(true)
                .with_line_number(true)
                .pretty();

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(true)
                .json();

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }

    Ok(())
}
