//! Cursor and selection over the component tree.
//!
//! Points are `(component, offset)` pairs; offsets are in the component's own
//! length units (chars for text, 0 or 1 for media). A `Selection` is always
//! kept in document order: `start` never comes after `end`.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::id::ComponentId;
use crate::tree::ComponentTree;

/// A logical cursor position.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CursorPoint {
    pub component: ComponentId,
    pub offset: usize,
}

impl CursorPoint {
    pub fn new(component: impl Into<ComponentId>, offset: usize) -> Self {
        Self {
            component: component.into(),
            offset,
        }
    }

    /// Document order of two points.
    pub fn compare(&self, other: &CursorPoint, tree: &ComponentTree) -> Ordering {
        tree.compare(&self.component, &other.component)
            .then(self.offset.cmp(&other.offset))
    }
}

/// Ordered pair of cursor points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    start: CursorPoint,
    end: CursorPoint,
}

impl Selection {
    /// Create a collapsed selection (cursor position).
    pub fn collapsed(point: CursorPoint) -> Self {
        Self {
            end: point.clone(),
            start: point,
        }
    }

    /// Build a selection, swapping the endpoints if `b` precedes `a`.
    pub fn ordered(a: CursorPoint, b: CursorPoint, tree: &ComponentTree) -> Self {
        if b.compare(&a, tree) == Ordering::Less {
            Self { start: b, end: a }
        } else {
            Self { start: a, end: b }
        }
    }

    pub fn start(&self) -> &CursorPoint {
        &self.start
    }

    pub fn end(&self) -> &CursorPoint {
        &self.end
    }

    /// Check if the selection is collapsed (cursor only).
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    pub fn is_range(&self) -> bool {
        !self.is_collapsed()
    }

    /// Both endpoints at offset 0.
    pub fn is_cursor_at_beginning(&self) -> bool {
        self.start.offset == 0 && self.end.offset == 0
    }

    /// Both endpoints at the end of their component.
    pub fn is_cursor_at_ending(&self, tree: &ComponentTree) -> bool {
        self.start.offset == tree.length(&self.start.component)
            && self.end.offset == tree.length(&self.end.component)
    }

    pub fn is_single_component(&self) -> bool {
        self.start.component == self.end.component
    }

    /// Start component, the components strictly between, and the end
    /// component when different from the start.
    pub fn selected_components(&self, tree: &ComponentTree) -> Vec<ComponentId> {
        let mut components = vec![self.start.component.clone()];
        if self.is_single_component() {
            return components;
        }
        components.extend(tree.components_between(&self.start.component, &self.end.component));
        components.push(self.end.component.clone());
        components
    }

    /// Re-anchor the selection on the current tree: endpoints on components
    /// that no longer exist move to the first leaf, offsets are clamped and
    /// the order is restored.
    pub fn normalized(&self, tree: &ComponentTree) -> Option<Selection> {
        let fallback = tree.first_component()?;
        let fix = |point: &CursorPoint| {
            let component = if tree.contains(&point.component) {
                point.component.clone()
            } else {
                fallback.clone()
            };
            let offset = point.offset.min(tree.length(&component));
            CursorPoint { component, offset }
        };
        Some(Selection::ordered(fix(&self.start), fix(&self.end), tree))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Component, ComponentKind, Figure, Paragraph, Section};

    fn tree() -> ComponentTree {
        let mut tree = ComponentTree::new("article".into());
        let root = tree.name().clone();
        let section = Component::new("s".into(), ComponentKind::Section(Section::default()));
        tree.attach(section, &root, 0).unwrap();
        for (i, (name, text)) in [("a", "alpha"), ("b", "beta")].into_iter().enumerate() {
            let p = Component::new(name.into(), ComponentKind::Paragraph(Paragraph::new(text)));
            tree.attach(p, &"s".into(), i).unwrap();
        }
        let fig = Component::new("f".into(), ComponentKind::Figure(Figure::new("x.png")));
        tree.attach(fig, &"s".into(), 2).unwrap();
        tree
    }

    #[test]
    fn test_reversed_drag_is_canonicalized() {
        let tree = tree();
        let sel = Selection::ordered(CursorPoint::new("b", 2), CursorPoint::new("a", 4), &tree);
        assert_eq!(sel.start(), &CursorPoint::new("a", 4));
        assert_eq!(sel.end(), &CursorPoint::new("b", 2));

        let sel = Selection::ordered(CursorPoint::new("a", 3), CursorPoint::new("a", 1), &tree);
        assert_eq!(sel.start().offset, 1);
        assert!(sel.is_range());
    }

    #[test]
    fn test_cursor_edges() {
        let tree = tree();
        let sel = Selection::collapsed(CursorPoint::new("a", 0));
        assert!(sel.is_cursor_at_beginning());
        assert!(!sel.is_cursor_at_ending(&tree));

        let sel = Selection::collapsed(CursorPoint::new("f", 1));
        assert!(sel.is_cursor_at_ending(&tree));
    }

    #[test]
    fn test_selected_components() {
        let tree = tree();
        let sel = Selection::ordered(CursorPoint::new("a", 1), CursorPoint::new("f", 1), &tree);
        assert_eq!(
            sel.selected_components(&tree),
            vec![ComponentId::new("a"), "b".into(), "f".into()]
        );
        let sel = Selection::collapsed(CursorPoint::new("b", 1));
        assert_eq!(sel.selected_components(&tree), vec![ComponentId::new("b")]);
    }

    #[test]
    fn test_normalized_moves_dangling_points() {
        let tree = tree();
        let sel = Selection::ordered(CursorPoint::new("gone", 3), CursorPoint::new("b", 99), &tree);
        let sel = sel.normalized(&tree).unwrap();
        assert_eq!(sel.start(), &CursorPoint::new("a", 3));
        assert_eq!(sel.end(), &CursorPoint::new("b", 4));
    }
}
