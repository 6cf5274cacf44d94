//! Transaction guard.
//!
//! Multi-step edits (split a paragraph, then delete what follows, then
//! insert a list) need to generate later ops against the tree produced by
//! earlier ones. A [`Transaction`] applies chunks of ops as they are built,
//! exposes the live tree in between, and records everything as one batch on
//! [`commit`](Transaction::commit). Dropping it uncommitted reverts.

use tracing::error;

use crate::article::Article;
use crate::error::Result;
use crate::history::Batch;
use crate::operation::Operation;
use crate::selection::{CursorPoint, Selection};
use crate::tree::ComponentTree;

/// An open batch on an [`Article`].
#[must_use = "dropping a transaction without committing reverts it"]
pub struct Transaction<'a> {
    article: &'a mut Article,
    applied: Vec<Operation>,
    selection_before: Selection,
    committed: bool,
}

impl<'a> Transaction<'a> {
    pub(crate) fn new(article: &'a mut Article) -> Self {
        let selection_before = article.selection.clone();
        Self {
            article,
            applied: Vec::new(),
            selection_before,
            committed: false,
        }
    }

    pub fn article(&self) -> &Article {
        &*self.article
    }

    /// The tree with every op applied so far.
    pub fn tree(&self) -> &ComponentTree {
        &self.article.tree
    }

    pub fn selection(&self) -> &Selection {
        &self.article.selection
    }

    /// Place the cursor; the final selection is what `redo` restores.
    pub fn set_cursor(&mut self, point: CursorPoint) -> Result<()> {
        self.article.set_cursor(point)
    }

    pub fn select(&mut self, a: CursorPoint, b: CursorPoint) -> Result<()> {
        self.article.select(a, b)
    }

    /// Ops applied so far.
    pub fn operations(&self) -> &[Operation] {
        &self.applied
    }

    /// Execute `ops` in order. If one fails, the ops of this chunk that
    /// already ran are reverted, the selection goes back to where it was
    /// before the chunk, and the error is returned. Earlier chunks stay
    /// applied until the transaction is dropped.
    pub fn apply(&mut self, ops: Vec<Operation>) -> Result<()> {
        let selection = self.article.selection.clone();
        for (done, op) in ops.iter().enumerate() {
            if let Err(err) = self.article.exec(&op.forward) {
                if let Err(rollback) = self.article.revert(&ops[..done]) {
                    error!(error = %rollback, "failed to roll back a partial batch");
                }
                self.article.restore_selection(selection);
                return Err(err);
            }
        }
        self.applied.extend(ops);
        Ok(())
    }

    /// Record the applied ops as one history batch. Returns `false` when
    /// nothing was applied, in which case no batch is recorded.
    pub fn commit(mut self) -> bool {
        self.committed = true;
        let operations = std::mem::take(&mut self.applied);
        if operations.is_empty() {
            return false;
        }
        self.article.normalize_selection();
        let batch = Batch {
            operations,
            selection_before: self.selection_before.clone(),
            selection_after: self.article.selection.clone(),
        };
        self.article.record(batch);
        true
    }

    /// Revert everything applied so far and close the transaction.
    pub fn rollback(mut self) -> Result<()> {
        self.committed = true;
        let applied = std::mem::take(&mut self.applied);
        self.article.revert(&applied)?;
        self.article.restore_selection(self.selection_before.clone());
        Ok(())
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        let applied = std::mem::take(&mut self.applied);
        if let Err(err) = self.article.revert(&applied) {
            error!(error = %err, "failed to roll back an abandoned transaction");
        }
        // Cursor moves without ops are abandoned too.
        if self.article.selection != self.selection_before {
            self.article.restore_selection(self.selection_before.clone());
        }
    }
}
