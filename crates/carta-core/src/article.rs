//! The article: component arena, selection and the transaction engine.
//!
//! All mutation goes through operation batches. A batch is executed op by op
//! against the arena; if any op fails, the ops already applied are reverted
//! and the history is left untouched, so a batch either lands completely or
//! not at all.

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::components::{Component, ComponentKind, Paragraph, ParagraphType, Section};
use crate::error::{EditorError, Result};
use crate::history::{Batch, History, UndoManager};
use crate::id::ComponentId;
use crate::loader::Loader;
use crate::operation::Operation;
use crate::ops::NewComponent;
use crate::platform::{ArticleView, DetachedPlatform, NullView, RangeDescriptor, SelectionPlatform};
use crate::selection::{CursorPoint, Selection};
use crate::transaction::Transaction;
use crate::tree::ComponentTree;

/// Default number of retained history batches.
pub const DEFAULT_HISTORY_LIMIT: usize = 200;

/// Deferred change notifications. Queued during a call, drained after it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArticleEvent {
    SelectionChanged,
    /// A batch was committed, undone or redone.
    Changed,
}

/// A document: sections of components, one selection, one history.
pub struct Article {
    pub(crate) tree: ComponentTree,
    pub(crate) loader: Arc<Loader>,
    pub(crate) history: History,
    pub(crate) selection: Selection,
    pub(crate) platform: Box<dyn SelectionPlatform>,
    pub(crate) view: Box<dyn ArticleView>,
    pub(crate) events: VecDeque<ArticleEvent>,
    placeholder_text: Option<String>,
}

impl std::fmt::Debug for Article {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Article")
            .field("tree", &self.tree)
            .field("selection", &self.selection)
            .field("history_at", &self.history.at())
            .field("history_len", &self.history.len())
            .finish_non_exhaustive()
    }
}

impl Article {
    /// One section holding one empty paragraph.
    pub fn new(loader: Arc<Loader>) -> Self {
        Self::with_tree(loader, ComponentTree::new(ComponentId::generate()), None)
    }

    /// Build an article from detached sections. Empty containers receive a
    /// placeholder paragraph; an empty list yields the default article.
    pub fn from_components(
        loader: Arc<Loader>,
        name: ComponentId,
        sections: Vec<NewComponent>,
    ) -> Result<Self> {
        let mut tree = ComponentTree::new(name);
        let root = tree.name().clone();
        for (index, section) in sections.iter().enumerate() {
            materialize(&mut tree, section, &root, index, &None)?;
        }
        Ok(Self::with_tree(loader, tree, None))
    }

    fn with_tree(loader: Arc<Loader>, mut tree: ComponentTree, placeholder: Option<String>) -> Self {
        if tree.sections().is_empty() {
            let root = tree.name().clone();
            let section = NewComponent::new(ComponentKind::Section(Section::default()));
            if let Err(err) = materialize(&mut tree, &section, &root, 0, &placeholder) {
                error!(error = %err, "failed to seed an empty article");
            }
        }
        let first = tree
            .first_component()
            .unwrap_or_else(|| tree.name().clone());
        Self {
            tree,
            loader,
            history: History::new(DEFAULT_HISTORY_LIMIT),
            selection: Selection::collapsed(CursorPoint::new(first, 0)),
            platform: Box::new(DetachedPlatform),
            view: Box::new(NullView),
            events: VecDeque::new(),
            placeholder_text: placeholder,
        }
    }

    /// Set the placeholder text of fresh placeholder paragraphs. Applied to
    /// the first paragraph too when the article is still empty.
    pub fn with_placeholder(mut self, placeholder: Option<String>) -> Self {
        self.placeholder_text = placeholder.clone();
        if self.len() == 0 {
            if let Some(first) = self.tree.first_component() {
                if let Ok(p) = self.tree.text_component_mut(&first, "setPlaceholder") {
                    p.placeholder_text = placeholder;
                }
            }
        }
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history.set_limit(limit);
        self
    }

    pub fn set_platform(&mut self, platform: Box<dyn SelectionPlatform>) {
        self.platform = platform;
    }

    pub fn set_view(&mut self, view: Box<dyn ArticleView>) {
        self.view = view;
    }

    pub fn name(&self) -> &ComponentId {
        self.tree.name()
    }

    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    pub fn loader(&self) -> &Arc<Loader> {
        &self.loader
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_at(&self) -> usize {
        self.history.at()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn placeholder_text(&self) -> Option<&str> {
        self.placeholder_text.as_deref()
    }

    pub fn component(&self, id: &ComponentId) -> Result<&Component> {
        self.tree.component(id)
    }

    /// The paragraph behind `id`, or `NotImplemented` for other variants.
    pub fn paragraph(&self, id: &ComponentId) -> Result<&Paragraph> {
        self.tree.text_component(id, "text")
    }

    // === Selection ===

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Collapse the selection onto `point`, clamping the offset.
    pub fn set_cursor(&mut self, point: CursorPoint) -> Result<()> {
        let point = self.clamp_point(point)?;
        self.apply_selection(Selection::collapsed(point));
        Ok(())
    }

    /// Select between two points, in whichever order they are given.
    pub fn select(&mut self, a: CursorPoint, b: CursorPoint) -> Result<()> {
        let a = self.clamp_point(a)?;
        let b = self.clamp_point(b)?;
        let selection = Selection::ordered(a, b, &self.tree);
        self.apply_selection(selection);
        Ok(())
    }

    /// Select from the start of the first leaf to the end of the last.
    pub fn select_all(&mut self) {
        let (Some(first), Some(last)) = (self.tree.first_component(), self.tree.last_component())
        else {
            return;
        };
        let end = self.tree.length(&last);
        let selection = Selection::ordered(
            CursorPoint::new(first, 0),
            CursorPoint::new(last, end),
            &self.tree,
        );
        self.apply_selection(selection);
    }

    /// Pull the native selection into the model. Returns whether a native
    /// selection was found and mapped.
    pub fn update_selection_from_platform(&mut self) -> bool {
        let Some(range) = self.platform.read() else {
            return false;
        };
        match range.resolve(&self.tree) {
            Some(selection) => {
                if selection != self.selection {
                    self.selection = selection;
                    self.events.push_back(ArticleEvent::SelectionChanged);
                }
                true
            }
            None => {
                warn!(
                    anchor = %range.anchor.owner,
                    focus = %range.focus.owner,
                    "native selection does not map onto any component"
                );
                false
            }
        }
    }

    fn clamp_point(&self, point: CursorPoint) -> Result<CursorPoint> {
        if !self.tree.contains(&point.component) {
            return Err(EditorError::ComponentNotFound(point.component));
        }
        let offset = point.offset.min(self.tree.length(&point.component));
        Ok(CursorPoint {
            component: point.component,
            offset,
        })
    }

    /// Cursor move requested by an op. Targets that do not exist are
    /// skipped; the batch-level normalization fixes the selection later.
    pub(crate) fn move_cursor(&mut self, point: &CursorPoint, select_to: Option<usize>) {
        let Ok(start) = self.clamp_point(point.clone()) else {
            warn!(component = %point.component, "op cursor targets a missing component");
            return;
        };
        let selection = match select_to {
            Some(end) if end > start.offset => {
                let end = end.min(self.tree.length(&start.component));
                Selection::ordered(
                    start.clone(),
                    CursorPoint::new(start.component.clone(), end),
                    &self.tree,
                )
            }
            _ => Selection::collapsed(start),
        };
        self.apply_selection(selection);
    }

    pub(crate) fn apply_selection(&mut self, selection: Selection) {
        if let Err(err) = self.platform.write(&RangeDescriptor::from(&selection)) {
            warn!(error = %err, "failed to write the platform selection");
        }
        self.selection = selection;
        self.events.push_back(ArticleEvent::SelectionChanged);
    }

    /// Re-anchor the selection after structural changes.
    pub(crate) fn normalize_selection(&mut self) {
        if let Some(selection) = self.selection.normalized(&self.tree) {
            if selection != self.selection {
                self.apply_selection(selection);
            }
        }
    }

    /// Restore a recorded selection, normalizing it against the tree.
    pub(crate) fn restore_selection(&mut self, selection: Selection) {
        let selection = selection.normalized(&self.tree).unwrap_or(selection);
        self.apply_selection(selection);
    }

    // === Events ===

    /// Take every queued notification.
    pub fn drain_events(&mut self) -> Vec<ArticleEvent> {
        self.events.drain(..).collect()
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    // === Transactions ===

    /// Open a transaction. Ops applied through it are recorded as one batch
    /// on `commit`; dropping it uncommitted reverts them.
    pub fn begin(&mut self) -> Transaction<'_> {
        Transaction::new(self)
    }

    /// Apply `ops` as one undoable batch.
    pub fn transaction(&mut self, ops: Vec<Operation>) -> Result<()> {
        let mut tx = self.begin();
        tx.apply(ops)?;
        tx.commit();
        Ok(())
    }

    /// Execute the inverse halves of `ops` in reverse order.
    pub(crate) fn revert(&mut self, ops: &[Operation]) -> Result<()> {
        for op in ops.iter().rev() {
            self.exec(&op.inverse)?;
        }
        Ok(())
    }

    /// Execute the forward halves of `ops` in order.
    pub(crate) fn reapply(&mut self, ops: &[Operation]) -> Result<()> {
        for op in ops {
            self.exec(&op.forward)?;
        }
        Ok(())
    }

    pub(crate) fn record(&mut self, batch: Batch) {
        let size = batch.operations.len();
        self.history.record(batch);
        self.events.push_back(ArticleEvent::Changed);
        debug!(
            history_at = self.history.at(),
            history_len = self.history.len(),
            ops = size,
            "transaction committed"
        );
    }
}

impl UndoManager for Article {
    fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn undo(&mut self) -> Result<bool> {
        let Some(batch) = self.history.undo_batch().cloned() else {
            return Ok(false);
        };
        let ops = &batch.operations;
        let selection = self.selection.clone();
        for (undone, op) in ops.iter().rev().enumerate() {
            if let Err(err) = self.exec(&op.inverse) {
                if let Err(rollback) = self.reapply(&ops[ops.len() - undone..]) {
                    error!(error = %rollback, "failed to roll back a partial undo");
                }
                self.restore_selection(selection);
                return Err(err);
            }
        }
        self.history.step_back();
        self.restore_selection(batch.selection_before);
        self.events.push_back(ArticleEvent::Changed);
        debug!(history_at = self.history.at(), ops = ops.len(), "undo");
        Ok(true)
    }

    fn redo(&mut self) -> Result<bool> {
        let Some(batch) = self.history.redo_batch().cloned() else {
            return Ok(false);
        };
        let ops = &batch.operations;
        let selection = self.selection.clone();
        for (done, op) in ops.iter().enumerate() {
            if let Err(err) = self.exec(&op.forward) {
                if let Err(rollback) = self.revert(&ops[..done]) {
                    error!(error = %rollback, "failed to roll back a partial redo");
                }
                self.restore_selection(selection);
                return Err(err);
            }
        }
        self.history.step_forward();
        self.restore_selection(batch.selection_after);
        self.events.push_back(ArticleEvent::Changed);
        debug!(history_at = self.history.at(), ops = ops.len(), "redo");
        Ok(true)
    }

    fn clear_history(&mut self) {
        self.history.clear();
    }
}

/// Attach a detached component and its subtree directly, outside history.
fn materialize(
    tree: &mut ComponentTree,
    new: &NewComponent,
    container: &ComponentId,
    index: usize,
    placeholder: &Option<String>,
) -> Result<()> {
    let mut kind = new.kind.clone();
    if let Some(c) = kind.container_mut() {
        c.children.clear();
    }
    let has_caption = kind.has_caption();
    let is_container = kind.is_container();
    tree.attach(Component::new(new.name.clone(), kind), container, index)?;
    if has_caption {
        let caption = new
            .caption
            .clone()
            .unwrap_or_else(|| Paragraph::default().with_type(ParagraphType::Caption));
        tree.attach_inline(Component::caption(&new.name, caption))?;
    }
    for (i, child) in new.children.iter().enumerate() {
        materialize(tree, child, &new.name, i, placeholder)?;
    }
    if is_container && new.children.is_empty() {
        let filler = NewComponent::placeholder(placeholder.clone());
        materialize(tree, &filler, &new.name, 0, placeholder)?;
    }
    Ok(())
}
