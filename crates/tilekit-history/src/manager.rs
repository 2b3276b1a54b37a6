//! Undo/redo history manager.
//!
//! [`HistoryManager`] owns a bounded undo stack, a redo stack and a stack of
//! open group frames. Tools mutate the scene themselves and then hand the
//! manager an [`Operation`] describing the change; `undo`/`redo` borrow the
//! scene to reverse or re-apply the most recent entry.
//!
//! Rules:
//! - A push straight onto the undo stack clears the redo stack.
//! - The first push into an empty group clears the redo stack right away,
//!   before the group is closed.
//! - When the undo stack exceeds `max_depth`, the oldest entry is dropped.
//! - Closing a group that received nothing records nothing.
//! - Every successful push/undo/redo/clear notifies listeners with
//!   `(can_undo, can_redo)`.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use tilekit_core::{HistoryError, TileScene};

use crate::grouping::GroupStack;
use crate::observer::{HistoryObservers, SubscriptionId};
use crate::operation::Operation;

/// Default maximum number of undo steps.
pub const DEFAULT_MAX_UNDO: usize = 50;

/// Construction-time settings for a [`HistoryManager`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum undo stack depth. Zero is treated as one.
    pub max_undo_depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_undo_depth: DEFAULT_MAX_UNDO,
        }
    }
}

impl HistoryConfig {
    pub fn with_max_undo_depth(max_undo_depth: usize) -> Self {
        Self { max_undo_depth }
    }
}

/// Snapshot of the history stacks for UI and diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryStatus {
    pub can_undo: bool,
    pub can_redo: bool,
    pub undo_count: usize,
    pub redo_count: usize,
    pub group_depth: usize,
}

/// Manages the undo/redo stacks and edit grouping for one editor session.
#[derive(Debug)]
pub struct HistoryManager {
    undo_stack: VecDeque<Operation>,
    redo_stack: Vec<Operation>,
    groups: GroupStack,
    max_depth: usize,
    observers: HistoryObservers,
}

impl HistoryManager {
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            groups: GroupStack::new(),
            max_depth: config.max_undo_depth.max(1),
            observers: HistoryObservers::new(),
        }
    }

    /// Creates a manager with an initial availability listener.
    pub fn with_listener<F>(config: HistoryConfig, listener: F) -> Self
    where
        F: Fn(bool, bool) + 'static,
    {
        let mut manager = Self::new(config);
        manager.subscribe(listener);
        manager
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(bool, bool) + 'static,
    {
        self.observers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Records an operation the caller has already applied to the scene.
    ///
    /// Goes into the innermost open group if there is one, otherwise onto
    /// the undo stack.
    pub fn push(&mut self, operation: Operation) {
        self.record(operation);
        self.notify();
    }

    fn record(&mut self, operation: Operation) {
        match self.groups.innermost_mut() {
            Some(frame) => {
                if frame.is_empty() && !self.redo_stack.is_empty() {
                    tracing::debug!(
                        "Group '{}' started: discarding {} redo entr(ies)",
                        frame.description(),
                        self.redo_stack.len()
                    );
                    self.redo_stack.clear();
                }
                tracing::trace!(
                    "Grouped {} '{}' into '{}'",
                    operation.id(),
                    operation.description(),
                    frame.description()
                );
                frame.push(operation);
            }
            None => {
                tracing::debug!("Push {} '{}'", operation.id(), operation.description());
                self.redo_stack.clear();
                self.push_undo(operation);
            }
        }
    }

    fn push_undo(&mut self, operation: Operation) {
        self.undo_stack.push_back(operation);
        while self.undo_stack.len() > self.max_depth {
            if let Some(evicted) = self.undo_stack.pop_front() {
                tracing::trace!(
                    "Undo depth {} exceeded, evicted '{}'",
                    self.max_depth,
                    evicted.description()
                );
            }
        }
    }

    /// Opens a (possibly nested) group.
    pub fn begin_group(&mut self, description: impl Into<String>) {
        let description = description.into();
        tracing::debug!(
            "Begin group '{}' at depth {}",
            description,
            self.groups.depth() + 1
        );
        self.groups.begin(description);
    }

    /// Closes the innermost group.
    ///
    /// Returns true if the group produced a composite, which is then recorded
    /// in the enclosing group or on the undo stack. Closing an empty group or
    /// calling this with no open group does nothing.
    pub fn end_group(&mut self) -> bool {
        let Some(frame) = self.groups.end() else {
            tracing::warn!("end_group called with no open group");
            return false;
        };

        let description = frame.description().to_string();
        let count = frame.len();
        let Some(composite) = frame.into_composite() else {
            tracing::debug!("Discarding empty group '{}'", description);
            return false;
        };

        tracing::debug!("End group '{}' with {} operation(s)", description, count);
        self.record(composite);
        self.notify();
        true
    }

    /// Reverses the most recent entry.
    ///
    /// Returns `Ok(false)` when there is nothing to undo. If the scene rejects
    /// the change, the scene is rolled back, the entry stays on the undo stack
    /// and the error is returned.
    pub fn undo(&mut self, scene: &mut dyn TileScene) -> Result<bool, HistoryError> {
        let Some(operation) = self.undo_stack.pop_back() else {
            return Ok(false);
        };

        if let Err(source) = operation.undo(scene) {
            tracing::warn!("Undo of '{}' failed: {}", operation.description(), source);
            let description = operation.description().to_string();
            self.undo_stack.push_back(operation);
            return Err(HistoryError::UndoFailed {
                description,
                source,
            });
        }

        tracing::debug!("Undo '{}'", operation.description());
        self.redo_stack.push(operation);
        self.notify();
        Ok(true)
    }

    /// Re-applies the most recently undone entry.
    ///
    /// Returns `Ok(false)` when there is nothing to redo. Failure handling
    /// mirrors [`HistoryManager::undo`].
    pub fn redo(&mut self, scene: &mut dyn TileScene) -> Result<bool, HistoryError> {
        let Some(operation) = self.redo_stack.pop() else {
            return Ok(false);
        };

        if let Err(source) = operation.execute(scene) {
            tracing::warn!("Redo of '{}' failed: {}", operation.description(), source);
            let description = operation.description().to_string();
            self.redo_stack.push(operation);
            return Err(HistoryError::RedoFailed {
                description,
                source,
            });
        }

        tracing::debug!("Redo '{}'", operation.description());
        self.push_undo(operation);
        self.notify();
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Number of open groups
    pub fn group_depth(&self) -> usize {
        self.groups.depth()
    }

    pub fn is_grouping(&self) -> bool {
        self.groups.is_active()
    }

    /// Descriptions of open groups, outermost first
    pub fn open_groups(&self) -> impl Iterator<Item = &str> {
        self.groups.descriptions()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Changes the undo depth, dropping the oldest entries if needed.
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth.max(1);
        let excess = self.undo_stack.len().saturating_sub(self.max_depth);
        if excess > 0 {
            self.undo_stack.drain(..excess);
            tracing::debug!("Trimmed {} undo entr(ies) to depth {}", excess, self.max_depth);
            self.notify();
        }
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(Operation::description)
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(Operation::description)
    }

    /// Undo entry descriptions, most recent first
    pub fn undo_descriptions(&self) -> impl Iterator<Item = &str> {
        self.undo_stack.iter().rev().map(Operation::description)
    }

    /// Redo entry descriptions, most recent first
    pub fn redo_descriptions(&self) -> impl Iterator<Item = &str> {
        self.redo_stack.iter().rev().map(Operation::description)
    }

    /// The entry the next undo would reverse
    pub fn peek_undo(&self) -> Option<&Operation> {
        self.undo_stack.back()
    }

    pub fn status(&self) -> HistoryStatus {
        HistoryStatus {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
            undo_count: self.undo_count(),
            redo_count: self.redo_count(),
            group_depth: self.group_depth(),
        }
    }

    /// Drops all undo, redo and open-group state.
    ///
    /// Must be called before the session switches to another scene.
    pub fn clear(&mut self) {
        tracing::debug!(
            "Clearing history: {} undo, {} redo, {} open group(s)",
            self.undo_stack.len(),
            self.redo_stack.len(),
            self.groups.depth()
        );
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.groups.clear();
        self.notify();
    }

    fn notify(&self) {
        self.observers.notify(self.can_undo(), self.can_redo());
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}
