//! Bounded undo/redo over whole-text snapshots.
//!
//! Notes are small, so every history step stores the complete text rather
//! than a diff. Both stacks are capped at `limit`; the oldest undo step is
//! dropped once the cap is reached.

use std::collections::VecDeque;

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoHistory {
    undo: VecDeque<String>,
    redo: Vec<String>,
    limit: usize,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl UndoHistory {
    /// Create a history holding at most `limit` steps per direction.
    ///
    /// A limit of zero disables history entirely.
    pub const fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit,
        }
    }

    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Record the text as it was before an edit.
    ///
    /// Any redo steps are discarded. Recording the same text as the most
    /// recent undo step is ignored.
    pub fn record(&mut self, previous: &str) {
        if self.limit == 0 {
            return;
        }
        self.redo.clear();
        if self.undo.back().is_some_and(|top| top == previous) {
            return;
        }
        self.undo.push_back(previous.to_string());
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
    }

    /// Step back: returns the text to restore and remembers `current` for redo.
    pub fn undo(&mut self, current: &str) -> Option<String> {
        let restored = self.undo.pop_back()?;
        self.redo.push(current.to_string());
        if self.redo.len() > self.limit {
            self.redo.remove(0);
        }
        Some(restored)
    }

    /// Step forward: returns the text to restore and remembers `current` for undo.
    pub fn redo(&mut self, current: &str) -> Option<String> {
        let restored = self.redo.pop()?;
        self.undo.push_back(current.to_string());
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
        Some(restored)
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }
}
