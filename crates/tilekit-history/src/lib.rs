//! # TileKit History
//!
//! Undo/redo engine for the tile editor. Tools apply their edits to the
//! scene and record an [`Operation`] describing the change; the
//! [`HistoryManager`] keeps those operations on bounded undo/redo stacks,
//! folds gesture-sized bursts of edits into single composite entries, and
//! tells subscribed UI surfaces whether undo and redo are available.
//!
//! ## Architecture
//!
//! ```text
//! HistoryManager
//!   ├── undo stack (bounded, oldest evicted first)
//!   ├── redo stack (cleared by new edits)
//!   ├── GroupStack (nested begin_group/end_group frames)
//!   └── HistoryObservers ((can_undo, can_redo) listeners)
//!
//! Operation
//!   ├── tile deltas (paint, erase, move, delete, paste, fill)
//!   └── composite (ordered children, undone back-to-front)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tilekit_history::{HistoryConfig, HistoryManager, Operation};
//!
//! let mut history = HistoryManager::new(HistoryConfig::default());
//!
//! history.begin_group("paint");
//! // tool writes the tile, then records the change
//! history.push(Operation::tile_paint("ground", TileCoord::new(3, 4), 0, 12));
//! history.end_group();
//!
//! history.undo(&mut scene)?;
//! ```

pub mod grouping;
pub mod manager;
pub mod observer;
pub mod operation;

pub use grouping::{GroupFrame, GroupStack};
pub use manager::{HistoryConfig, HistoryManager, HistoryStatus, DEFAULT_MAX_UNDO};
pub use observer::{HistoryObservers, SubscriptionId};
pub use operation::{
    ApplyDirection, ApplyHook, Operation, OperationId, OperationKind, TileDelta,
};
