//! Undo/redo availability notifications.
//!
//! Several UI surfaces (toolbar buttons, the keyboard-shortcut layer) may
//! need to know whether undo and redo are currently possible. Each one
//! subscribes a listener and keeps the returned [`SubscriptionId`] to
//! unsubscribe later.
//!
//! Listeners run synchronously on the calling thread, in subscription order,
//! and must not call back into the history manager.

use std::fmt;
use uuid::Uuid;

use tilekit_core::StatusListener;

/// Subscription handle for unsubscribing from history notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Create a new unique subscription ID
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Registered `(can_undo, can_redo)` listeners
#[derive(Default)]
pub struct HistoryObservers {
    listeners: Vec<(SubscriptionId, StatusListener)>,
}

impl HistoryObservers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(bool, bool) + 'static,
    {
        let id = SubscriptionId::new();
        self.listeners.push((id, Box::new(listener)));
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        let removed = self.listeners.len() != before;
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    pub fn notify(&self, can_undo: bool, can_redo: bool) {
        tracing::trace!(
            "Notifying {} listener(s): can_undo={}, can_redo={}",
            self.listeners.len(),
            can_undo,
            can_redo
        );
        for (_, listener) in &self.listeners {
            listener(can_undo, can_redo);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for HistoryObservers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryObservers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
