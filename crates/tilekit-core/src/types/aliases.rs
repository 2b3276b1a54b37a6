//! Type aliases for commonly used complex types.
//!
//! The editor core runs on the UI thread only, so shared state and callbacks
//! are `Rc`-based and carry no `Send`/`Sync` bounds.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tilekit_core::types::*;
//!
//! // Instead of: Rc<RefCell<Vec<(bool, bool)>>>
//! let seen: Shared<Vec<(bool, bool)>> = shared(Vec::new());
//! ```

use std::cell::RefCell;
use std::rc::Rc;

// =============================================================================
// SINGLE-THREADED SHARED TYPES (Rc<RefCell<T>>)
// =============================================================================

/// A reference-counted, interior-mutable wrapper for single-threaded sharing.
///
/// Use when a callback needs to record into state owned elsewhere on the UI
/// thread (toolbar state, render queues, test probes).
pub type Shared<T> = Rc<RefCell<T>>;

/// A shared vector for single-threaded collection management.
pub type SharedVec<T> = Rc<RefCell<Vec<T>>>;

// =============================================================================
// CALLBACK TYPES
// =============================================================================

/// A UI callback receiving two parameters.
///
/// Single-threaded; history status listeners receive `(can_undo, can_redo)`.
pub type UiDataCallback2<T, U> = Box<dyn Fn(T, U)>;

/// Listener for undo/redo availability changes: `(can_undo, can_redo)`.
pub type StatusListener = UiDataCallback2<bool, bool>;

// =============================================================================
// CONSTRUCTOR HELPERS
// =============================================================================

/// Create a new `Shared<T>` from a value.
#[inline]
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Create a new empty `SharedVec<T>`.
#[inline]
pub fn shared_vec<T>() -> SharedVec<T> {
    Rc::new(RefCell::new(Vec::new()))
}
