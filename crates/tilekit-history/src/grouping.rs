//! Grouping frames for bursts of edits.
//!
//! Each `begin_group` opens a [`GroupFrame`]; frames nest, and the innermost
//! one collects pushed operations until it is closed and folded into a
//! single composite.

use crate::operation::Operation;

/// Pending operations of one open group
#[derive(Debug)]
pub struct GroupFrame {
    description: String,
    operations: Vec<Operation>,
}

impl GroupFrame {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            operations: Vec::new(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn push(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    /// Folds the collected operations into one composite, or `None` if the
    /// frame never received anything.
    pub fn into_composite(self) -> Option<Operation> {
        Operation::composite(self.operations, self.description)
    }
}

/// Stack of open group frames, innermost last.
#[derive(Debug, Default)]
pub struct GroupStack {
    frames: Vec<GroupFrame>,
}

impl GroupStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, description: impl Into<String>) {
        self.frames.push(GroupFrame::new(description));
    }

    /// Closes the innermost frame.
    pub fn end(&mut self) -> Option<GroupFrame> {
        self.frames.pop()
    }

    pub fn innermost_mut(&mut self) -> Option<&mut GroupFrame> {
        self.frames.last_mut()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_active(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Open frame descriptions, outermost first
    pub fn descriptions(&self) -> impl Iterator<Item = &str> {
        self.frames.iter().map(GroupFrame::description)
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}
