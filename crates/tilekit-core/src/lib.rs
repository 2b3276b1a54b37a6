//! # TileKit Core
//!
//! Core types, traits, and utilities for TileKit.
//! Provides the scene abstraction that recorded edits operate on,
//! the shared error types, and single-threaded type aliases.

pub mod error;
pub mod scene;
pub mod types;

pub use error::{Error, HistoryError, Result, SceneError, SceneResult};

pub use scene::{LayerId, Scene, TileCoord, TileScene, TileValue, DEFAULT_LAYERS, EMPTY_TILE};

// Re-export type aliases for convenience
pub use types::{shared, shared_vec, Shared, SharedVec, StatusListener, UiDataCallback2};
