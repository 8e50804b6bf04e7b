//! # Undo/Redo Stack
//!
//! Tracks content history for an editor state.
//!
//! ## Design
//!
//! - Each push records the content *before* the change, tagged with its change type
//! - Undo restores the recorded content and moves the current content to the redo stack
//! - Redo restores the content that was undone
//! - New changes clear the redo stack
//! - The oldest entries are dropped once `max_levels` is exceeded
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//!
//! stack.record(before.clone(), ChangeType::InsertFragment);
//!
//! let restored = stack.undo(after.clone()).unwrap();
//! assert_eq!(restored, before);
//! ```

use crate::{ChangeType, ContentState};
use chrono::{DateTime, Utc};

/// One undoable step
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// Content to restore when this entry is applied
    pub content: ContentState,

    /// Kind of change that produced the step
    pub change_type: ChangeType,

    /// When the step was recorded
    pub timestamp: DateTime<Utc>,
}

/// Undo/redo stack of content snapshots
#[derive(Debug, Clone)]
pub struct UndoStack {
    /// Stack of recorded steps (most recent last)
    undo_stack: Vec<HistoryEntry>,

    /// Stack of undone steps (most recent last)
    redo_stack: Vec<HistoryEntry>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    /// Create an undo stack with custom max levels
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
        }
    }

    /// Record the content that preceded a change
    pub fn record(&mut self, before: ContentState, change_type: ChangeType) {
        self.undo_stack.push(HistoryEntry {
            content: before,
            change_type,
            timestamp: Utc::now(),
        });

        // Trim if exceeded max levels
        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // New change invalidates the future
        self.redo_stack.clear();
    }

    /// Undo the most recent step, returning the content to restore
    pub fn undo(&mut self, current: ContentState) -> Option<ContentState> {
        let entry = self.undo_stack.pop()?;

        self.redo_stack.push(HistoryEntry {
            content: current,
            change_type: entry.change_type,
            timestamp: Utc::now(),
        });

        Some(entry.content)
    }

    /// Redo the most recently undone step, returning the content to restore
    pub fn redo(&mut self, current: ContentState) -> Option<ContentState> {
        let entry = self.redo_stack.pop()?;

        self.undo_stack.push(HistoryEntry {
            content: current,
            change_type: entry.change_type,
            timestamp: Utc::now(),
        });

        Some(entry.content)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Change type of the next undo step
    pub fn last_change_type(&self) -> Option<ChangeType> {
        self.undo_stack.last().map(|entry| entry.change_type)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.undo_stack
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
