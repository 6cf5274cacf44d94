//! Operation generators.
//!
//! These read the current tree and produce `{do, undo}` pairs; they never
//! mutate. Every inverse carries a snapshot of what it restores (attributes,
//! format lists, removed text), so executing `undo` right after `do` gives
//! back the exact previous state.

use serde_json::Value;

use crate::components::{
    Attrs, CAPTION_FORMATS_KEY, CAPTION_KEY, ComponentKind, Paragraph, ParagraphType, Section,
    caption_to_attrs,
};
use crate::error::{EditorError, Result};
use crate::format::Format;
use crate::id::ComponentId;
use crate::operation::{OpSpec, Operation};
use crate::selection::CursorPoint;
use crate::text::TextBuffer;
use crate::tree::ComponentTree;

/// Options of [`ComponentTree::delete_ops`].
#[derive(Clone, Debug, Default)]
pub struct DeleteOptions {
    /// Subtracted from the component's index in the inverse insert. Used when
    /// earlier siblings are deleted in the same batch against the same tree.
    pub index_offset: usize,
    /// Cursor to restore once the component is gone.
    pub cursor_after: Option<CursorPoint>,
    /// Leave the owning container in place even if it becomes empty.
    pub keep_empty_container: bool,
    /// Placeholder of the paragraph inserted when the article would be
    /// left without components.
    pub placeholder_text: Option<String>,
}

/// Fields of an `updateComponent` operation.
#[derive(Clone, Debug, Default)]
pub struct ComponentUpdate {
    pub value: Option<String>,
    pub formats: Option<Vec<Format>>,
    pub attrs: Option<Attrs>,
    pub cursor_offset: Option<usize>,
    pub select_range: Option<usize>,
}

impl ComponentTree {
    /// Ops deleting `id` and, unless kept, any container it leaves empty.
    ///
    /// A container's children are deleted first, last child first, so the
    /// inverse re-inserts the container before its children.
    pub fn delete_ops(&self, id: &ComponentId, options: &DeleteOptions) -> Result<Vec<Operation>> {
        let node = self.component(id)?;
        if node.is_inline() {
            return Err(EditorError::not_implemented(node.class_name(), "deleteComponent"));
        }
        let container = node
            .section()
            .cloned()
            .ok_or_else(|| EditorError::ComponentNotFound(id.clone()))?;

        let mut ops = Vec::new();
        self.push_children_delete_ops(id, &mut ops)?;
        ops.push(self.delete_op(id, options.index_offset, options.cursor_after.clone())?);
        if !options.keep_empty_container {
            self.push_cascade_ops(&container, options, &mut ops)?;
        }
        Ok(ops)
    }

    fn push_children_delete_ops(&self, id: &ComponentId, ops: &mut Vec<Operation>) -> Result<()> {
        if !self.is_container(id) {
            return Ok(());
        }
        for child in self.children(id)?.iter().rev() {
            self.push_children_delete_ops(child, ops)?;
            ops.push(self.delete_op(child, 0, None)?);
        }
        Ok(())
    }

    fn delete_op(
        &self,
        id: &ComponentId,
        index_offset: usize,
        cursor: Option<CursorPoint>,
    ) -> Result<Operation> {
        let node = self.component(id)?;
        let section = node
            .section()
            .cloned()
            .ok_or_else(|| EditorError::ComponentNotFound(id.clone()))?;
        let index = self
            .index_in_section(id)
            .ok_or_else(|| EditorError::ComponentNotFound(id.clone()))?;
        Ok(Operation::new(
            OpSpec::DeleteComponent {
                component: id.clone(),
                cursor,
            },
            OpSpec::InsertComponent {
                component: id.clone(),
                component_class: node.class_name().into(),
                section,
                index: index.saturating_sub(index_offset),
                attrs: self.attrs_of(id)?,
                cursor: None,
            },
        ))
    }

    /// `container` is about to lose one child. If that was its only child,
    /// delete it as well, or re-seed it when it is the article's last section.
    fn push_cascade_ops(
        &self,
        container: &ComponentId,
        options: &DeleteOptions,
        ops: &mut Vec<Operation>,
    ) -> Result<()> {
        if self.is_root(container) {
            if self.sections().len() == 1 {
                let placeholder = NewComponent::placeholder(options.placeholder_text.clone());
                let cursor = CursorPoint::new(placeholder.name.clone(), 0);
                let section = NewComponent::new(ComponentKind::Section(Section::default()))
                    .with_children(vec![placeholder]);
                ops.extend(section.insert_ops(container, 0, Some(cursor))?);
            }
            return Ok(());
        }
        if self.children(container)?.len() != 1 {
            return Ok(());
        }
        if matches!(self.sections(), [only] if only == container) {
            let placeholder = NewComponent::placeholder(options.placeholder_text.clone());
            let cursor = CursorPoint::new(placeholder.name.clone(), 0);
            ops.extend(placeholder.insert_ops(container, 0, Some(cursor))?);
            return Ok(());
        }
        let parent = self
            .container_of(container)
            .cloned()
            .ok_or_else(|| EditorError::ComponentNotFound(container.clone()))?;
        ops.push(self.delete_op(container, 0, None)?);
        self.push_cascade_ops(&parent, options, ops)
    }

    /// Insert `value` at `index` of a text component.
    pub fn insert_chars_ops(
        &self,
        id: &ComponentId,
        index: usize,
        value: &str,
    ) -> Result<Vec<Operation>> {
        self.insert_chars_with_formats_ops(id, index, value, None)
    }

    /// Insert `value` and then replace the format list with `formats`.
    pub fn insert_chars_with_formats_ops(
        &self,
        id: &ComponentId,
        index: usize,
        value: &str,
        formats: Option<Vec<Format>>,
    ) -> Result<Vec<Operation>> {
        let paragraph = self.text_component(id, "insertChars")?;
        check_bounds(id, index, paragraph.len())?;
        let count = value.chars().count();
        let restore = formats.as_ref().map(|_| paragraph.formats.clone());
        Ok(vec![Operation::new(
            OpSpec::InsertChars {
                component: id.clone(),
                index,
                value: value.to_string(),
                formats,
                cursor_offset: Some(index + count),
            },
            OpSpec::RemoveChars {
                component: id.clone(),
                index,
                count,
                formats: restore,
                cursor_offset: Some(index),
            },
        )])
    }

    /// Remove `count` chars at `index` of a text component.
    pub fn remove_chars_ops(
        &self,
        id: &ComponentId,
        index: usize,
        count: usize,
    ) -> Result<Vec<Operation>> {
        let paragraph = self.text_component(id, "removeChars")?;
        check_bounds(id, index + count, paragraph.len())?;
        let removed = paragraph
            .text
            .slice(index..index + count)
            .map(|s| s.to_string())
            .unwrap_or_default();
        Ok(vec![Operation::new(
            OpSpec::RemoveChars {
                component: id.clone(),
                index,
                count,
                formats: None,
                cursor_offset: Some(index),
            },
            OpSpec::InsertChars {
                component: id.clone(),
                index,
                value: removed,
                formats: Some(paragraph.formats.clone()),
                cursor_offset: Some(index + count),
            },
        )])
    }

    /// Update text, formats or attributes of a component.
    ///
    /// The inverse restores every touched attribute from a snapshot.
    pub fn update_ops(&self, id: &ComponentId, update: ComponentUpdate) -> Result<Vec<Operation>> {
        let current = self.attrs_of(id)?;
        let mut restore = Attrs::new();
        if update.value.is_some() || update.formats.is_some() {
            self.text_component(id, "updateComponent")?;
            for key in ["text", "formats"] {
                restore.insert(key.into(), current.get(key).cloned().unwrap_or(Value::Null));
            }
        }
        if let Some(attrs) = &update.attrs {
            let mut keys: Vec<&str> = attrs.keys().map(String::as_str).collect();
            // Setting caption text clips its formats, so restore both.
            if keys.contains(&CAPTION_KEY) || keys.contains(&CAPTION_FORMATS_KEY) {
                keys.extend([CAPTION_KEY, CAPTION_FORMATS_KEY]);
            }
            for key in keys {
                restore.insert(key.to_string(), current.get(key).cloned().unwrap_or(Value::Null));
            }
        }
        Ok(vec![Operation::new(
            OpSpec::UpdateComponent {
                component: id.clone(),
                value: update.value,
                formats: update.formats,
                attrs: update.attrs,
                cursor_offset: update.cursor_offset,
                select_range: update.select_range,
            },
            OpSpec::UpdateComponent {
                component: id.clone(),
                value: None,
                formats: None,
                attrs: Some(restore),
                cursor_offset: None,
                select_range: None,
            },
        )])
    }

    /// Toggle `format` on a text component, keeping `[from, to)` selected.
    pub fn format_ops(&self, id: &ComponentId, format: Format) -> Result<Vec<Operation>> {
        let (from, to) = (format.from, format.to);
        self.update_ops(
            id,
            ComponentUpdate {
                formats: Some(vec![format]),
                cursor_offset: Some(from),
                select_range: Some(to.saturating_sub(from)),
                ..ComponentUpdate::default()
            },
        )
    }
}

fn check_bounds(id: &ComponentId, index: usize, len: usize) -> Result<()> {
    if index > len {
        return Err(EditorError::IndexOutOfBounds {
            component: id.clone(),
            index,
            len,
        });
    }
    Ok(())
}

/// A component that is not attached yet, with its caption and children.
///
/// Extensions build one of these, then turn it into insert operations.
#[derive(Clone, Debug, PartialEq)]
pub struct NewComponent {
    pub name: ComponentId,
    /// Variant data. Container children are listed in `children`, not here.
    pub kind: ComponentKind,
    pub caption: Option<Paragraph>,
    pub children: Vec<NewComponent>,
}

impl NewComponent {
    pub fn new(kind: ComponentKind) -> Self {
        let caption = kind
            .has_caption()
            .then(|| Paragraph::default().with_type(ParagraphType::Caption));
        Self {
            name: ComponentId::generate(),
            kind,
            caption,
            children: Vec::new(),
        }
    }

    pub fn paragraph(paragraph: Paragraph) -> Self {
        Self::new(ComponentKind::Paragraph(paragraph))
    }

    /// An empty paragraph, optionally showing placeholder text.
    pub fn placeholder(placeholder_text: Option<String>) -> Self {
        let mut paragraph = Paragraph::default();
        paragraph.placeholder_text = placeholder_text;
        Self::paragraph(paragraph)
    }

    pub fn with_name(mut self, name: impl Into<ComponentId>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the caption text of a media component. Ignored for other kinds.
    pub fn with_caption(mut self, text: &str) -> Self {
        if let Some(caption) = &mut self.caption {
            caption.set_text(text);
        }
        self
    }

    pub fn with_children(mut self, children: Vec<NewComponent>) -> Self {
        self.children = children;
        self
    }

    pub fn class_name(&self) -> &'static str {
        self.kind.class_name()
    }

    /// Variant attributes plus caption.
    pub fn attrs(&self) -> Result<Attrs> {
        let mut attrs = self.kind.attrs()?;
        if let Some(caption) = &self.caption {
            caption_to_attrs(caption, &mut attrs)?;
        }
        Ok(attrs)
    }

    /// Length once attached.
    pub fn len(&self) -> usize {
        match self.kind.leaf_len() {
            Some(len) => len,
            None => self.children.iter().map(NewComponent::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the first leaf once attached.
    pub fn first_leaf(&self) -> ComponentId {
        if !self.kind.is_container() {
            return self.name.clone();
        }
        match self.children.first() {
            Some(child) => child.first_leaf(),
            None => self.filler_name(),
        }
    }

    /// Name of the empty paragraph an empty container is attached with.
    fn filler_name(&self) -> ComponentId {
        ComponentId::new(format!("{}-0", self.name))
    }

    /// Ops attaching this component, then its children, at `index` of
    /// `container`. `cursor` is applied after the last insert.
    pub fn insert_ops(
        &self,
        container: &ComponentId,
        index: usize,
        cursor: Option<CursorPoint>,
    ) -> Result<Vec<Operation>> {
        let mut ops = Vec::new();
        self.push_insert_ops(container, index, &mut ops)?;
        if let Some(Operation {
            forward: OpSpec::InsertComponent { cursor: slot, .. },
            ..
        }) = ops.last_mut()
        {
            *slot = cursor;
        }
        Ok(ops)
    }

    fn push_insert_ops(
        &self,
        container: &ComponentId,
        index: usize,
        ops: &mut Vec<Operation>,
    ) -> Result<()> {
        ops.push(Operation::new(
            OpSpec::InsertComponent {
                component: self.name.clone(),
                component_class: self.class_name().into(),
                section: container.clone(),
                index,
                attrs: self.attrs()?,
                cursor: None,
            },
            OpSpec::DeleteComponent {
                component: self.name.clone(),
                cursor: None,
            },
        ));
        for (i, child) in self.children.iter().enumerate() {
            child.push_insert_ops(&self.name, i, ops)?;
        }
        if self.kind.is_container() && self.children.is_empty() {
            NewComponent::placeholder(None)
                .with_name(self.filler_name())
                .push_insert_ops(&self.name, 0, ops)?;
        }
        Ok(())
    }

    /// Capture an attached component, its caption and its subtree.
    pub fn snapshot(tree: &ComponentTree, id: &ComponentId) -> Result<Self> {
        let node = tree.component(id)?;
        let mut kind = node.kind().clone();
        if let Some(container) = kind.container_mut() {
            container.children.clear();
        }
        let caption = if kind.has_caption() {
            tree.get(&id.caption())
                .and_then(|c| c.kind().as_paragraph())
                .cloned()
        } else {
            None
        };
        let children = match node.kind().container() {
            Some(container) => container
                .children
                .iter()
                .map(|child| Self::snapshot(tree, child))
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };
        Ok(Self {
            name: id.clone(),
            kind,
            caption,
            children,
        })
    }
}
