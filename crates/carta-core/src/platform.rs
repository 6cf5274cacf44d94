//! Platform abstraction traits for selection and view synchronization.
//!
//! The document model never talks to a UI directly. The native selection is
//! read and written through a [`SelectionPlatform`], and structural changes
//! are pushed to an [`ArticleView`]. Both are injected into the `Article`.

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

use crate::id::ComponentId;
use crate::selection::{CursorPoint, Selection};
use crate::tree::ComponentTree;

/// The platform refused or failed a selection write.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct PlatformError {
    pub message: String,
}

impl PlatformError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A native selection endpoint.
///
/// `owner` is the nearest component the native node belongs to. When the
/// native node sits inside nested inline formatting, `preceding_lengths`
/// holds the text lengths of the sibling nodes before it within the owner;
/// the logical offset is their sum plus `offset`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NativePoint {
    pub owner: ComponentId,
    pub preceding_lengths: Vec<usize>,
    pub offset: usize,
}

impl NativePoint {
    pub fn new(owner: impl Into<ComponentId>, offset: usize) -> Self {
        Self {
            owner: owner.into(),
            preceding_lengths: Vec::new(),
            offset,
        }
    }

    /// Map onto a logical cursor point.
    ///
    /// Points on a container resolve to its first leaf at offset 0 or to its
    /// last leaf at its end. Unknown owners yield `None`.
    pub fn resolve(&self, tree: &ComponentTree) -> Option<CursorPoint> {
        if !tree.is_root(&self.owner) && !tree.contains(&self.owner) {
            return None;
        }
        let offset = self.preceding_lengths.iter().sum::<usize>() + self.offset;
        if tree.is_container(&self.owner) {
            let point = if offset == 0 {
                CursorPoint::new(tree.first_leaf(&self.owner), 0)
            } else {
                let leaf = tree.last_leaf(&self.owner);
                let len = tree.length(&leaf);
                CursorPoint::new(leaf, len)
            };
            return Some(point);
        }
        let len = tree.length(&self.owner);
        Some(CursorPoint::new(self.owner.clone(), offset.min(len)))
    }
}

impl From<&CursorPoint> for NativePoint {
    fn from(point: &CursorPoint) -> Self {
        NativePoint::new(point.component.clone(), point.offset)
    }
}

/// A native selection: `anchor` is where the drag started, `focus` where it
/// ended. They may be in any order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeDescriptor {
    pub anchor: NativePoint,
    pub focus: NativePoint,
}

impl RangeDescriptor {
    /// Map onto a canonical selection.
    pub fn resolve(&self, tree: &ComponentTree) -> Option<Selection> {
        let anchor = self.anchor.resolve(tree)?;
        let focus = self.focus.resolve(tree)?;
        Some(Selection::ordered(anchor, focus, tree))
    }
}

impl From<&Selection> for RangeDescriptor {
    fn from(selection: &Selection) -> Self {
        Self {
            anchor: selection.start().into(),
            focus: selection.end().into(),
        }
    }
}

/// Reads and writes the platform's native selection.
pub trait SelectionPlatform {
    /// Current native selection, if the platform has one.
    fn read(&self) -> Option<RangeDescriptor>;

    /// Move the native selection.
    fn write(&mut self, range: &RangeDescriptor) -> Result<(), PlatformError>;
}

/// A platform without a native selection. Writes are accepted and dropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct DetachedPlatform;

impl SelectionPlatform for DetachedPlatform {
    fn read(&self) -> Option<RangeDescriptor> {
        None
    }

    fn write(&mut self, _range: &RangeDescriptor) -> Result<(), PlatformError> {
        Ok(())
    }
}

/// In-memory native selection shared with the caller through a handle.
///
/// Writes replace the stored range; the caller may also set it directly to
/// simulate a user selecting text.
#[derive(Clone, Debug, Default)]
pub struct MemoryPlatform {
    range: Rc<RefCell<Option<RangeDescriptor>>>,
}

impl MemoryPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// A second handle onto the same stored range.
    pub fn handle(&self) -> Self {
        self.clone()
    }

    pub fn get(&self) -> Option<RangeDescriptor> {
        self.range.borrow().clone()
    }

    pub fn set(&self, range: Option<RangeDescriptor>) {
        *self.range.borrow_mut() = range;
    }
}

impl SelectionPlatform for MemoryPlatform {
    fn read(&self) -> Option<RangeDescriptor> {
        self.get()
    }

    fn write(&mut self, range: &RangeDescriptor) -> Result<(), PlatformError> {
        self.set(Some(range.clone()));
        Ok(())
    }
}

/// Errors a view may report while mirroring model changes.
#[derive(Error, Debug, Clone)]
pub enum ViewError {
    /// The platform already removed the node (e.g. a native cut).
    #[error("view of `{0}` was already detached")]
    AlreadyDetached(ComponentId),

    #[error("view platform error: {0}")]
    Platform(#[from] PlatformError),
}

/// Receives structural notifications so a rendered view can mirror the tree.
///
/// Called after the model change has been applied.
pub trait ArticleView {
    fn inserted(&mut self, tree: &ComponentTree, id: &ComponentId) -> Result<(), ViewError>;

    fn removed(&mut self, id: &ComponentId) -> Result<(), ViewError>;

    fn updated(&mut self, tree: &ComponentTree, id: &ComponentId) -> Result<(), ViewError>;
}

/// A view that renders nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullView;

impl ArticleView for NullView {
    fn inserted(&mut self, _tree: &ComponentTree, _id: &ComponentId) -> Result<(), ViewError> {
        Ok(())
    }

    fn removed(&mut self, _id: &ComponentId) -> Result<(), ViewError> {
        Ok(())
    }

    fn updated(&mut self, _tree: &ComponentTree, _id: &ComponentId) -> Result<(), ViewError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Component, ComponentKind, Layout, LayoutType, Paragraph, Section};

    fn tree() -> ComponentTree {
        let mut tree = ComponentTree::new("article".into());
        let root = tree.name().clone();
        let section = Component::new("s".into(), ComponentKind::Section(Section::default()));
        tree.attach(section, &root, 0).unwrap();
        let layout = Component::new(
            "l".into(),
            ComponentKind::Layout(Layout::new(LayoutType::SingleColumn)),
        );
        tree.attach(layout, &"s".into(), 0).unwrap();
        for (i, (name, text)) in [("a", "one"), ("b", "three")].into_iter().enumerate() {
            let p = Component::new(name.into(), ComponentKind::Paragraph(Paragraph::new(text)));
            tree.attach(p, &"l".into(), i).unwrap();
        }
        tree
    }

    #[test]
    fn test_resolve_nested_inline_offsets() {
        let tree = tree();
        let point = NativePoint {
            owner: "b".into(),
            preceding_lengths: vec![1, 2],
            offset: 1,
        };
        assert_eq!(point.resolve(&tree), Some(CursorPoint::new("b", 4)));
    }

    #[test]
    fn test_resolve_container_to_leaf() {
        let tree = tree();
        assert_eq!(
            NativePoint::new("s", 0).resolve(&tree),
            Some(CursorPoint::new("a", 0))
        );
        assert_eq!(
            NativePoint::new("l", 1).resolve(&tree),
            Some(CursorPoint::new("b", 5))
        );
        assert_eq!(
            NativePoint::new("article", 0).resolve(&tree),
            Some(CursorPoint::new("a", 0))
        );
        assert_eq!(NativePoint::new("nope", 0).resolve(&tree), None);
    }

    #[test]
    fn test_range_descriptor_canonicalizes() {
        let tree = tree();
        let range = RangeDescriptor {
            anchor: NativePoint::new("b", 2),
            focus: NativePoint::new("a", 1),
        };
        let sel = range.resolve(&tree).unwrap();
        assert_eq!(sel.start(), &CursorPoint::new("a", 1));
        assert_eq!(sel.end(), &CursorPoint::new("b", 2));
    }

    #[test]
    fn test_memory_platform_shares_state() {
        let mut platform = MemoryPlatform::new();
        let observer = platform.handle();
        let range = RangeDescriptor::from(&Selection::collapsed(CursorPoint::new("a", 2)));
        platform.write(&range).unwrap();
        assert_eq!(observer.get(), Some(range));
    }

    #[test]
    fn test_platform_error_reads_through_view_error() {
        let err = ViewError::from(PlatformError::new("selection is in a shadow root"));
        assert_eq!(err.to_string(), "view platform error: selection is in a shadow root");
        assert!(matches!(err, ViewError::Platform(ref inner) if inner.message.contains("shadow")));
    }
}
