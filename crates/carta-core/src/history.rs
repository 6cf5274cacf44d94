//! Undo/redo history of operation batches.
//!
//! Provides:
//! - `UndoManager` trait for anything that can undo and redo
//! - `History` - the batch log with its replay cursor (`historyAt`)

use crate::error::Result;
use crate::operation::Operation;
use crate::selection::Selection;

/// Trait for managing undo/redo operations.
///
/// Implementations must actually perform the undo/redo, not just track state.
pub trait UndoManager {
    /// Check if undo is available.
    fn can_undo(&self) -> bool;

    /// Check if redo is available.
    fn can_redo(&self) -> bool;

    /// Perform undo. Returns `Ok(false)` when there is nothing to undo.
    fn undo(&mut self) -> Result<bool>;

    /// Perform redo. Returns `Ok(false)` when already at the tip.
    fn redo(&mut self) -> Result<bool>;

    /// Clear all undo/redo history.
    fn clear_history(&mut self);
}

/// One transaction: its operations plus the selection around it.
#[derive(Clone, Debug, PartialEq)]
pub struct Batch {
    pub operations: Vec<Operation>,
    pub selection_before: Selection,
    pub selection_after: Selection,
}

/// Ordered batches and the replay cursor.
///
/// Batches below `at` are applied; batches at or above `at` are undone and
/// available to redo.
#[derive(Clone, Debug, Default)]
pub struct History {
    batches: Vec<Batch>,
    at: usize,
    /// Maximum retained batches, 0 for unlimited.
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            batches: Vec::new(),
            at: 0,
            limit,
        }
    }

    /// The replay cursor.
    pub fn at(&self) -> usize {
        self.at
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
        self.enforce_limit();
    }

    pub fn can_undo(&self) -> bool {
        self.at > 0
    }

    pub fn can_redo(&self) -> bool {
        self.at < self.batches.len()
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    /// The batch `undo` would revert.
    pub fn undo_batch(&self) -> Option<&Batch> {
        self.at.checked_sub(1).and_then(|i| self.batches.get(i))
    }

    /// The batch `redo` would replay.
    pub fn redo_batch(&self) -> Option<&Batch> {
        self.batches.get(self.at)
    }

    /// Record an applied batch, discarding the redo tail.
    pub fn record(&mut self, batch: Batch) {
        self.batches.truncate(self.at);
        self.batches.push(batch);
        self.at = self.batches.len();
        self.enforce_limit();
    }

    /// Move the cursor back after a successful undo.
    pub(crate) fn step_back(&mut self) {
        self.at = self.at.saturating_sub(1);
    }

    /// Move the cursor forward after a successful redo.
    pub(crate) fn step_forward(&mut self) {
        self.at = (self.at + 1).min(self.batches.len());
    }

    pub fn clear(&mut self) {
        self.batches.clear();
        self.at = 0;
    }

    fn enforce_limit(&mut self) {
        if self.limit == 0 || self.batches.len() <= self.limit {
            return;
        }
        let excess = self.batches.len() - self.limit;
        self.batches.drain(..excess);
        self.at = self.at.saturating_sub(excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::OpSpec;
    use crate::selection::CursorPoint;

    fn batch(tag: &str) -> Batch {
        let spec = OpSpec::DeleteComponent {
            component: tag.into(),
            cursor: None,
        };
        let sel = Selection::collapsed(CursorPoint::new("p", 0));
        Batch {
            operations: vec![Operation::new(spec.clone(), spec)],
            selection_before: sel.clone(),
            selection_after: sel,
        }
    }

    #[test]
    fn test_record_truncates_redo_tail() {
        let mut history = History::new(0);
        history.record(batch("a"));
        history.record(batch("b"));
        history.step_back();
        assert!(history.can_redo());

        history.record(batch("c"));
        assert!(!history.can_redo());
        assert_eq!(history.len(), 2);
        assert_eq!(history.undo_batch(), Some(&batch("c")));
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = History::new(2);
        for tag in ["a", "b", "c"] {
            history.record(batch(tag));
        }
        assert_eq!(history.len(), 2);
        assert_eq!(history.at(), 2);
        assert_eq!(history.batches()[0], batch("b"));
    }

    #[test]
    fn test_cursor_bounds() {
        let mut history = History::new(0);
        assert!(!history.can_undo());
        history.step_back();
        assert_eq!(history.at(), 0);
        history.record(batch("a"));
        history.step_forward();
        assert_eq!(history.at(), 1);
        assert!(history.redo_batch().is_none());
    }
}
