//! Error handling for TileKit
//!
//! Provides error types for the layers of the editor core:
//! - Scene errors (layer lookup, tile addressing)
//! - History errors (an operation failed to re-apply or reverse)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Scene error type
///
/// Represents errors raised while reading or writing tiles of a scene.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The addressed layer does not exist in the scene
    #[error("Unknown layer: {layer}")]
    UnknownLayer {
        /// The name of the missing layer.
        layer: String,
    },

    /// Tile coordinate outside the scene grid
    #[error("Tile ({x}, {y}) out of bounds for {width}x{height} scene")]
    OutOfBounds {
        /// Requested column.
        x: u32,
        /// Requested row.
        y: u32,
        /// Scene width in tiles.
        width: u32,
        /// Scene height in tiles.
        height: u32,
    },

    /// Scene created with a zero-sized grid
    #[error("Invalid scene dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width in tiles.
        width: u32,
        /// Requested height in tiles.
        height: u32,
    },
}

/// History error type
///
/// Raised when a recorded operation cannot be applied to the scene during
/// undo or redo. The entry stays on the stack it was taken from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// Reversing an operation failed
    #[error("Undo of '{description}' failed: {source}")]
    UndoFailed {
        /// Description of the operation that failed.
        description: String,
        /// The scene error that stopped the operation.
        #[source]
        source: SceneError,
    },

    /// Re-applying an operation failed
    #[error("Redo of '{description}' failed: {source}")]
    RedoFailed {
        /// Description of the operation that failed.
        description: String,
        /// The scene error that stopped the operation.
        #[source]
        source: SceneError,
    },
}

impl HistoryError {
    /// The scene error underneath this failure
    pub fn scene_error(&self) -> &SceneError {
        match self {
            HistoryError::UndoFailed { source, .. } | HistoryError::RedoFailed { source, .. } => {
                source
            }
        }
    }
}

/// Main error type for TileKit
///
/// A unified error type that can represent any error from the core crates.
#[derive(Error, Debug)]
pub enum Error {
    /// Scene error
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// History error
    #[error(transparent)]
    History(#[from] HistoryError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON document
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A replayed step failed; `source` keeps the typed cause
    #[error("Step {step} failed: {source}")]
    Replay {
        step: usize,
        #[source]
        source: Box<Error>,
    },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a scene error
    pub fn is_scene_error(&self) -> bool {
        matches!(self, Error::Scene(_))
    }

    /// Check if this is a history error
    pub fn is_history_error(&self) -> bool {
        matches!(self, Error::History(_))
    }

    /// Wraps `self` as the failure of replay step `step`.
    pub fn at_step(self, step: usize) -> Self {
        Error::Replay {
            step,
            source: Box::new(self),
        }
    }

    /// The underlying error with any replay wrapping removed
    pub fn cause(&self) -> &Error {
        match self {
            Error::Replay { source, .. } => source.cause(),
            other => other,
        }
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

/// Result type for scene-level tile access
pub type SceneResult<T> = std::result::Result<T, SceneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_error_display() {
        let err = SceneError::UnknownLayer {
            layer: "props".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown layer: props");

        let err = SceneError::OutOfBounds {
            x: 9,
            y: 2,
            width: 8,
            height: 8,
        };
        assert_eq!(err.to_string(), "Tile (9, 2) out of bounds for 8x8 scene");
    }

    #[test]
    fn test_history_error_display() {
        let err = HistoryError::UndoFailed {
            description: "paint".to_string(),
            source: SceneError::UnknownLayer {
                layer: "ground".to_string(),
            },
        };
        assert_eq!(err.to_string(), "Undo of 'paint' failed: Unknown layer: ground");
        assert!(matches!(err.scene_error(), SceneError::UnknownLayer { .. }));
    }

    #[test]
    fn test_replay_error_keeps_cause() {
        let err = Error::from(SceneError::UnknownLayer {
            layer: "lava".to_string(),
        })
        .at_step(3);

        assert_eq!(err.to_string(), "Step 3 failed: Unknown layer: lava");
        assert!(!err.is_scene_error());
        assert!(err.cause().is_scene_error());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = SceneError::InvalidDimensions {
            width: 0,
            height: 4,
        }
        .into();
        assert!(err.is_scene_error());
        assert!(!err.is_history_error());

        let err: Error = HistoryError::RedoFailed {
            description: "erase".to_string(),
            source: SceneError::UnknownLayer {
                layer: "x".to_string(),
            },
        }
        .into();
        assert!(err.is_history_error());

        let err = Error::other("boom");
        assert_eq!(err.to_string(), "boom");
    }
}
