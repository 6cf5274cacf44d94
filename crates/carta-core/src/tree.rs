//! The component arena.
//!
//! `ComponentTree` owns every live component of one article, keyed by name.
//! Structure is expressed through names: sections list their children, each
//! child points back at its owning container. Traversal flattens the whole
//! article into one order of leaves (paragraphs and media).

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::components::{Attrs, Component, ComponentKind, Paragraph, caption_to_attrs};
use crate::error::{EditorError, Result};
use crate::id::ComponentId;

/// Arena of components for one article.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentTree {
    name: ComponentId,
    sections: Vec<ComponentId>,
    nodes: HashMap<ComponentId, Component>,
}

impl ComponentTree {
    /// Empty tree with the given article root name.
    pub fn new(name: ComponentId) -> Self {
        Self {
            name,
            sections: Vec::new(),
            nodes: HashMap::new(),
        }
    }

    /// Name of the article root. Sections use it as their container.
    pub fn name(&self) -> &ComponentId {
        &self.name
    }

    pub fn sections(&self) -> &[ComponentId] {
        &self.sections
    }

    pub fn is_root(&self, id: &ComponentId) -> bool {
        id == &self.name
    }

    pub fn get(&self, id: &ComponentId) -> Option<&Component> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &ComponentId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Every live component, captions included, in no particular order.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.nodes.values()
    }

    /// Number of live components, captions included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn component(&self, id: &ComponentId) -> Result<&Component> {
        self.nodes
            .get(id)
            .ok_or_else(|| EditorError::ComponentNotFound(id.clone()))
    }

    pub(crate) fn component_mut(&mut self, id: &ComponentId) -> Result<&mut Component> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| EditorError::ComponentNotFound(id.clone()))
    }

    /// The paragraph behind `id`, or `NotImplemented` for `operation` when the
    /// component does not carry text.
    pub fn text_component(&self, id: &ComponentId, operation: &'static str) -> Result<&Paragraph> {
        let node = self.component(id)?;
        node.kind()
            .as_paragraph()
            .ok_or_else(|| EditorError::not_implemented(node.class_name(), operation))
    }

    pub(crate) fn text_component_mut(
        &mut self,
        id: &ComponentId,
        operation: &'static str,
    ) -> Result<&mut Paragraph> {
        let node = self.component_mut(id)?;
        let class = node.class_name();
        node.kind_mut()
            .as_paragraph_mut()
            .ok_or_else(|| EditorError::not_implemented(class, operation))
    }

    /// Whether `id` can hold children. The article root counts.
    pub fn is_container(&self, id: &ComponentId) -> bool {
        self.is_root(id)
            || self
                .nodes
                .get(id)
                .is_some_and(|node| node.kind().is_container())
    }

    /// Children of a container, or the section list for the article root.
    pub fn children(&self, id: &ComponentId) -> Result<&[ComponentId]> {
        if self.is_root(id) {
            return Ok(&self.sections);
        }
        self.component(id)?
            .kind()
            .container()
            .map(|c| c.children.as_slice())
            .ok_or_else(|| EditorError::NotAContainer(id.clone()))
    }

    fn children_mut(&mut self, id: &ComponentId) -> Result<&mut Vec<ComponentId>> {
        if id == &self.name {
            return Ok(&mut self.sections);
        }
        self.nodes
            .get_mut(id)
            .ok_or_else(|| EditorError::ComponentNotFound(id.clone()))?
            .kind_mut()
            .container_mut()
            .map(|c| &mut c.children)
            .ok_or_else(|| EditorError::NotAContainer(id.clone()))
    }

    /// Owning container of an attached, non-inline component.
    pub fn container_of(&self, id: &ComponentId) -> Option<&ComponentId> {
        self.nodes.get(id).and_then(Component::section)
    }

    /// Position within the owning container. Inline components sit in their
    /// parent's single slot, index 0.
    pub fn index_in_section(&self, id: &ComponentId) -> Option<usize> {
        let node = self.nodes.get(id)?;
        if node.is_inline() {
            return Some(0);
        }
        let container = node.section()?;
        self.children(container)
            .ok()?
            .iter()
            .position(|child| child == id)
    }

    /// Content length: chars for text, 1 for media, sum of children for
    /// containers and the article root. Unknown names have length 0.
    pub fn length(&self, id: &ComponentId) -> usize {
        if self.is_root(id) {
            return self.sections.iter().map(|s| self.length(s)).sum();
        }
        let Some(node) = self.nodes.get(id) else {
            return 0;
        };
        match node.kind().leaf_len() {
            Some(len) => len,
            None => node
                .kind()
                .container()
                .map(|c| c.children.iter().map(|child| self.length(child)).sum())
                .unwrap_or(0),
        }
    }

    /// First leaf at or under `id`. An empty container is its own first leaf.
    pub fn first_leaf(&self, id: &ComponentId) -> ComponentId {
        let mut current = id.clone();
        loop {
            match self.children(&current).ok().and_then(|c| c.first()) {
                Some(child) => current = child.clone(),
                None => return current,
            }
        }
    }

    /// Last leaf at or under `id`.
    pub fn last_leaf(&self, id: &ComponentId) -> ComponentId {
        let mut current = id.clone();
        loop {
            match self.children(&current).ok().and_then(|c| c.last()) {
                Some(child) => current = child.clone(),
                None => return current,
            }
        }
    }

    pub fn first_component(&self) -> Option<ComponentId> {
        self.sections.first().map(|s| self.first_leaf(s))
    }

    pub fn last_component(&self) -> Option<ComponentId> {
        self.sections.last().map(|s| self.last_leaf(s))
    }

    /// Next leaf in document order, crossing container boundaries.
    pub fn next_component(&self, id: &ComponentId) -> Option<ComponentId> {
        self.step(id, Direction::Forward)
    }

    /// Previous leaf in document order, crossing container boundaries.
    pub fn previous_component(&self, id: &ComponentId) -> Option<ComponentId> {
        self.step(id, Direction::Backward)
    }

    fn step(&self, id: &ComponentId, direction: Direction) -> Option<ComponentId> {
        let node = self.nodes.get(id)?;
        if node.is_inline() {
            let parent = node.parent_component()?.clone();
            return self.step(&parent, direction);
        }
        let mut current = id.clone();
        loop {
            let container = self.container_of(&current)?.clone();
            let siblings = self.children(&container).ok()?;
            let index = siblings.iter().position(|c| c == &current)?;
            let neighbour = match direction {
                Direction::Forward => siblings.get(index + 1),
                Direction::Backward => index.checked_sub(1).and_then(|i| siblings.get(i)),
            };
            if let Some(neighbour) = neighbour {
                return Some(match direction {
                    Direction::Forward => self.first_leaf(neighbour),
                    Direction::Backward => self.last_leaf(neighbour),
                });
            }
            if self.is_root(&container) {
                return None;
            }
            current = container;
        }
    }

    /// Leaves strictly between `a` and `b`, walking forward from `a`.
    pub fn components_between(&self, a: &ComponentId, b: &ComponentId) -> Vec<ComponentId> {
        let mut between = Vec::new();
        if a == b {
            return between;
        }
        let mut current = self.next_component(a);
        while let Some(id) = current {
            if &id == b {
                break;
            }
            current = self.next_component(&id);
            between.push(id);
        }
        between
    }

    /// Every leaf in document order.
    pub fn leaves(&self) -> Vec<ComponentId> {
        let mut out = Vec::new();
        for section in &self.sections {
            self.collect_leaves(section, &mut out);
        }
        out
    }

    fn collect_leaves(&self, id: &ComponentId, out: &mut Vec<ComponentId>) {
        match self.nodes.get(id).and_then(|n| n.kind().container()) {
            Some(container) => {
                for child in &container.children {
                    self.collect_leaves(child, out);
                }
            }
            None => out.push(id.clone()),
        }
    }

    /// Index path from the article root. Inline components extend their
    /// parent's path so they sort right after it.
    pub fn path(&self, id: &ComponentId) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = id.clone();
        if let Some(node) = self.nodes.get(id) {
            if node.is_inline() {
                if let Some(parent) = node.parent_component() {
                    path.push(0);
                    current = parent.clone();
                }
            }
        }
        while let Some(container) = self.container_of(&current) {
            let Some(index) = self
                .children(container)
                .ok()
                .and_then(|c| c.iter().position(|child| child == &current))
            else {
                break;
            };
            path.push(index);
            current = container.clone();
        }
        path.reverse();
        path
    }

    /// Document order of two components.
    pub fn compare(&self, a: &ComponentId, b: &ComponentId) -> Ordering {
        self.path(a).cmp(&self.path(b))
    }

    /// Full attribute snapshot: variant attributes plus caption.
    pub fn attrs_of(&self, id: &ComponentId) -> Result<Attrs> {
        let node = self.component(id)?;
        let mut attrs = node.kind().attrs()?;
        if node.kind().has_caption() {
            if let Some(caption) = self
                .nodes
                .get(&id.caption())
                .and_then(|c| c.kind().as_paragraph())
            {
                caption_to_attrs(caption, &mut attrs)?;
            }
        }
        Ok(attrs)
    }

    /// Attach `component` to `container` at `index`.
    pub(crate) fn attach(
        &mut self,
        mut component: Component,
        container: &ComponentId,
        index: usize,
    ) -> Result<()> {
        let name = component.name().clone();
        if self.contains(&name) || self.is_root(&name) {
            return Err(EditorError::AlreadyAttached(name));
        }
        let is_section = matches!(component.kind(), ComponentKind::Section(_));
        if self.is_root(container) != is_section {
            return Err(EditorError::NotAContainer(container.clone()));
        }
        let children = self.children_mut(container)?;
        if index > children.len() {
            return Err(EditorError::IndexOutOfBounds {
                component: container.clone(),
                index,
                len: children.len(),
            });
        }
        children.insert(index, name.clone());
        component.set_section(Some(container.clone()));
        self.nodes.insert(name, component);
        Ok(())
    }

    /// Attach an inline component (a caption) to the arena.
    pub(crate) fn attach_inline(&mut self, component: Component) -> Result<()> {
        let name = component.name().clone();
        if self.contains(&name) {
            return Err(EditorError::AlreadyAttached(name));
        }
        self.nodes.insert(name, component);
        Ok(())
    }

    /// Detach a component and its caption. Containers must be empty.
    pub(crate) fn detach(&mut self, id: &ComponentId) -> Result<Component> {
        let node = self.component(id)?;
        if node.kind().container().is_some_and(|c| !c.is_empty()) {
            return Err(EditorError::ContainerNotEmpty(id.clone()));
        }
        if let Some(container) = node.section().cloned() {
            self.children_mut(&container)?.retain(|child| child != id);
        }
        let node = self
            .nodes
            .remove(id)
            .ok_or_else(|| EditorError::ComponentNotFound(id.clone()))?;
        if node.kind().has_caption() {
            self.nodes.remove(&id.caption());
        }
        Ok(node)
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Forward,
    Backward,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Figure, Layout, LayoutType, Section};

    fn paragraph(name: &str, text: &str) -> Component {
        Component::new(name.into(), ComponentKind::Paragraph(Paragraph::new(text)))
    }

    fn section(name: &str) -> Component {
        Component::new(name.into(), ComponentKind::Section(Section::default()))
    }

    /// s1[p1, layout[fig, p2]], s2[p3]
    fn sample() -> ComponentTree {
        let mut tree = ComponentTree::new("article".into());
        let root = tree.name().clone();
        tree.attach(section("s1"), &root, 0).unwrap();
        tree.attach(section("s2"), &root, 1).unwrap();
        tree.attach(paragraph("p1", "one"), &"s1".into(), 0).unwrap();
        let layout = Component::new(
            "layout".into(),
            ComponentKind::Layout(Layout::new(LayoutType::Bleed)),
        );
        tree.attach(layout, &"s1".into(), 1).unwrap();
        let fig = Component::new("fig".into(), ComponentKind::Figure(Figure::new("a.png")));
        tree.attach(fig, &"layout".into(), 0).unwrap();
        tree.attach_inline(Component::caption(&"fig".into(), Paragraph::new("cap")))
            .unwrap();
        tree.attach(paragraph("p2", "two"), &"layout".into(), 1).unwrap();
        tree.attach(paragraph("p3", "three"), &"s2".into(), 0).unwrap();
        tree
    }

    fn ids(names: &[&str]) -> Vec<ComponentId> {
        names.iter().map(|n| ComponentId::new(*n)).collect()
    }

    #[test]
    fn test_leaves_and_length() {
        let tree = sample();
        assert_eq!(tree.leaves(), ids(&["p1", "fig", "p2", "p3"]));
        assert_eq!(tree.length(tree.name()), 3 + 1 + 3 + 5);
        assert_eq!(tree.length(&"layout".into()), 4);
    }

    #[test]
    fn test_traversal_crosses_containers() {
        let tree = sample();
        assert_eq!(tree.next_component(&"p1".into()), Some("fig".into()));
        assert_eq!(tree.next_component(&"p2".into()), Some("p3".into()));
        assert_eq!(tree.next_component(&"p3".into()), None);
        assert_eq!(tree.previous_component(&"p3".into()), Some("p2".into()));
        assert_eq!(tree.previous_component(&"fig".into()), Some("p1".into()));
        assert_eq!(tree.previous_component(&"p1".into()), None);
    }

    #[test]
    fn test_inline_defers_to_parent() {
        let tree = sample();
        let caption = ComponentId::new("fig").caption();
        assert_eq!(tree.next_component(&caption), Some("p2".into()));
        assert_eq!(tree.previous_component(&caption), Some("p1".into()));
        assert_eq!(tree.index_in_section(&caption), Some(0));
        assert_eq!(tree.compare(&"fig".into(), &caption), Ordering::Less);
        assert_eq!(tree.compare(&caption, &"p2".into()), Ordering::Less);
    }

    #[test]
    fn test_components_between() {
        let tree = sample();
        assert_eq!(
            tree.components_between(&"p1".into(), &"p3".into()),
            ids(&["fig", "p2"])
        );
        assert!(tree.components_between(&"p1".into(), &"fig".into()).is_empty());
    }

    #[test]
    fn test_detach_rules() {
        let mut tree = sample();
        assert!(matches!(
            tree.detach(&"layout".into()),
            Err(EditorError::ContainerNotEmpty(_))
        ));
        tree.detach(&"fig".into()).unwrap();
        assert!(!tree.contains(&ComponentId::new("fig").caption()));
        assert_eq!(tree.children(&"layout".into()).unwrap(), ids(&["p2"]));
    }

    #[test]
    fn test_attach_rejects_duplicates_and_bad_index() {
        let mut tree = sample();
        assert!(matches!(
            tree.attach(paragraph("p1", ""), &"s2".into(), 0),
            Err(EditorError::AlreadyAttached(_))
        ));
        assert!(matches!(
            tree.attach(paragraph("p9", ""), &"s2".into(), 5),
            Err(EditorError::IndexOutOfBounds { len: 1, .. })
        ));
        assert!(matches!(
            tree.attach(paragraph("p9", ""), &"p1".into(), 0),
            Err(EditorError::NotAContainer(_))
        ));
    }

    #[test]
    fn test_attrs_include_caption() {
        let tree = sample();
        let attrs = tree.attrs_of(&"fig".into()).unwrap();
        assert_eq!(attrs["src"], "a.png");
        assert_eq!(attrs["caption"], "cap");
    }
}
