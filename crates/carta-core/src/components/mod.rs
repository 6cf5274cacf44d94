//! Component variants and the arena node that wraps them.
//!
//! Every document node is a [`Component`]: identity and linkage live on the
//! node, variant data lives in [`ComponentKind`]. Containers embed a shared
//! [`Container`] instead of inheriting from `Section`.

mod container;
mod media;
mod paragraph;

pub use container::{Container, Layout, LayoutType, List, ListTag, Section};
pub use media::{EmbedType, EmbeddedComponent, Figure, GiphyComponent, MediaSize};
pub use paragraph::{Paragraph, ParagraphType};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use smol_str::SmolStr;

use crate::error::{EditorError, Result};
use crate::id::ComponentId;

/// Attribute map of a component, as carried by `insertComponent` and
/// `updateComponent` operations and by the document JSON.
pub type Attrs = serde_json::Map<String, Value>;

/// Attribute key of a media component's caption text.
pub const CAPTION_KEY: &str = "caption";
/// Attribute key of a media component's caption formats.
pub const CAPTION_FORMATS_KEY: &str = "captionFormats";

/// Registered class names, as they appear in operations and document JSON.
pub mod class {
    pub const PARAGRAPH: &str = "Paragraph";
    pub const FIGURE: &str = "Figure";
    pub const LIST: &str = "List";
    pub const LAYOUT: &str = "Layout";
    pub const SECTION: &str = "Section";
    pub const EMBEDDED_COMPONENT: &str = "EmbeddedComponent";
    pub const GIPHY_COMPONENT: &str = "GiphyComponent";
}

/// Variant data of a component.
#[derive(Clone, Debug, PartialEq)]
pub enum ComponentKind {
    Paragraph(Paragraph),
    Figure(Figure),
    List(List),
    Layout(Layout),
    Section(Section),
    Embedded(EmbeddedComponent),
    Giphy(GiphyComponent),
}

impl ComponentKind {
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Paragraph(_) => class::PARAGRAPH,
            Self::Figure(_) => class::FIGURE,
            Self::List(_) => class::LIST,
            Self::Layout(_) => class::LAYOUT,
            Self::Section(_) => class::SECTION,
            Self::Embedded(_) => class::EMBEDDED_COMPONENT,
            Self::Giphy(_) => class::GIPHY_COMPONENT,
        }
    }

    pub fn container(&self) -> Option<&Container> {
        match self {
            Self::List(list) => Some(&list.container),
            Self::Layout(layout) => Some(&layout.container),
            Self::Section(section) => Some(&section.container),
            _ => None,
        }
    }

    pub fn container_mut(&mut self) -> Option<&mut Container> {
        match self {
            Self::List(list) => Some(&mut list.container),
            Self::Layout(layout) => Some(&mut layout.container),
            Self::Section(section) => Some(&mut section.container),
            _ => None,
        }
    }

    pub fn is_container(&self) -> bool {
        self.container().is_some()
    }

    /// Media variants own an inline caption paragraph.
    pub fn has_caption(&self) -> bool {
        matches!(self, Self::Figure(_) | Self::Embedded(_) | Self::Giphy(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Paragraph(_))
    }

    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Self::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_paragraph_mut(&mut self) -> Option<&mut Paragraph> {
        match self {
            Self::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    /// Length of a leaf: chars for text, 1 for media. `None` for containers,
    /// whose length is the sum of their children.
    pub fn leaf_len(&self) -> Option<usize> {
        match self {
            Self::Paragraph(p) => Some(p.len()),
            Self::Figure(_) | Self::Embedded(_) | Self::Giphy(_) => Some(1),
            Self::List(_) | Self::Layout(_) | Self::Section(_) => None,
        }
    }

    /// Own attributes of the variant. Children and captions are not included.
    pub fn attrs(&self) -> Result<Attrs> {
        match self {
            Self::Paragraph(p) => to_attrs(p),
            Self::Figure(f) => to_attrs(f),
            Self::List(l) => to_attrs(l),
            Self::Layout(l) => to_attrs(l),
            Self::Section(s) => to_attrs(s),
            Self::Embedded(e) => to_attrs(e),
            Self::Giphy(g) => to_attrs(g),
        }
    }
}

fn to_attrs<T: Serialize>(value: &T) -> Result<Attrs> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Attrs::new()),
    }
}

/// Deserialize a variant from attributes, reporting the class on failure.
pub(crate) fn from_attrs<T: DeserializeOwned>(class: &str, attrs: &Attrs) -> Result<T> {
    serde_json::from_value(Value::Object(attrs.clone())).map_err(|source| {
        EditorError::InvalidAttributes {
            class: SmolStr::new(class),
            source,
        }
    })
}

pub(crate) fn paragraph_factory(attrs: &Attrs) -> Result<ComponentKind> {
    from_attrs(class::PARAGRAPH, attrs).map(ComponentKind::Paragraph)
}

pub(crate) fn figure_factory(attrs: &Attrs) -> Result<ComponentKind> {
    from_attrs(class::FIGURE, attrs).map(ComponentKind::Figure)
}

pub(crate) fn list_factory(attrs: &Attrs) -> Result<ComponentKind> {
    from_attrs(class::LIST, attrs).map(ComponentKind::List)
}

pub(crate) fn layout_factory(attrs: &Attrs) -> Result<ComponentKind> {
    from_attrs(class::LAYOUT, attrs).map(ComponentKind::Layout)
}

pub(crate) fn section_factory(attrs: &Attrs) -> Result<ComponentKind> {
    from_attrs(class::SECTION, attrs).map(ComponentKind::Section)
}

pub(crate) fn embedded_factory(attrs: &Attrs) -> Result<ComponentKind> {
    from_attrs(class::EMBEDDED_COMPONENT, attrs).map(ComponentKind::Embedded)
}

pub(crate) fn giphy_factory(attrs: &Attrs) -> Result<ComponentKind> {
    from_attrs(class::GIPHY_COMPONENT, attrs).map(ComponentKind::Giphy)
}

/// Read a caption paragraph out of `caption`/`captionFormats` attributes.
pub(crate) fn caption_from_attrs(attrs: &Attrs) -> Paragraph {
    let text = attrs
        .get(CAPTION_KEY)
        .and_then(Value::as_str)
        .unwrap_or_default();
    let formats = attrs
        .get(CAPTION_FORMATS_KEY)
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();
    Paragraph::new(text)
        .with_type(ParagraphType::Caption)
        .with_formats(formats)
}

/// Write a caption paragraph into `caption`/`captionFormats` attributes.
pub(crate) fn caption_to_attrs(caption: &Paragraph, attrs: &mut Attrs) -> Result<()> {
    attrs.insert(CAPTION_KEY.into(), Value::String(caption.text_string()));
    attrs.insert(
        CAPTION_FORMATS_KEY.into(),
        serde_json::to_value(&caption.formats)?,
    );
    Ok(())
}

/// A node of the component arena.
#[derive(Clone, Debug, PartialEq)]
pub struct Component {
    name: ComponentId,
    kind: ComponentKind,
    /// Owning container. Sections point at the article root name.
    section: Option<ComponentId>,
    /// Owner of an inline component, e.g. the figure of a caption.
    parent_component: Option<ComponentId>,
    inline: bool,
}

impl Component {
    pub fn new(name: ComponentId, kind: ComponentKind) -> Self {
        Self {
            name,
            kind,
            section: None,
            parent_component: None,
            inline: false,
        }
    }

    /// The inline caption paragraph of `owner`.
    pub fn caption(owner: &ComponentId, paragraph: Paragraph) -> Self {
        Self {
            name: owner.caption(),
            kind: ComponentKind::Paragraph(paragraph),
            section: None,
            parent_component: Some(owner.clone()),
            inline: true,
        }
    }

    pub fn name(&self) -> &ComponentId {
        &self.name
    }

    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut ComponentKind {
        &mut self.kind
    }

    pub fn class_name(&self) -> &'static str {
        self.kind.class_name()
    }

    pub fn section(&self) -> Option<&ComponentId> {
        self.section.as_ref()
    }

    pub fn parent_component(&self) -> Option<&ComponentId> {
        self.parent_component.as_ref()
    }

    pub fn is_inline(&self) -> bool {
        self.inline
    }

    pub(crate) fn set_section(&mut self, section: Option<ComponentId>) {
        self.section = section;
    }

    /// Swap variant data, keeping container children.
    pub(crate) fn replace_kind(&mut self, mut kind: ComponentKind) {
        if let (Some(old), Some(new)) = (self.kind.container(), kind.container_mut()) {
            new.children = old.children.clone();
        }
        self.kind = kind;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attrs_round_trip_through_factory() {
        let figure = ComponentKind::Figure(Figure {
            src: "cat.png".into(),
            width: Some(640),
            height: None,
        });
        let attrs = figure.attrs().unwrap();
        assert_eq!(attrs["src"], "cat.png");
        assert!(!attrs.contains_key("height"));
        assert_eq!(figure_factory(&attrs).unwrap(), figure);
    }

    #[test]
    fn test_invalid_attrs_name_the_class() {
        let mut attrs = Attrs::new();
        attrs.insert("type".into(), Value::String("layout-sideways".into()));
        let err = layout_factory(&attrs).unwrap_err();
        assert!(matches!(
            err,
            EditorError::InvalidAttributes { ref class, .. } if class == "Layout"
        ));
    }

    #[test]
    fn test_replace_kind_keeps_children() {
        let mut layout = Layout::new(LayoutType::SingleColumn);
        layout.container.children.push(ComponentId::new("fig"));
        let mut node = Component::new("l".into(), ComponentKind::Layout(layout));
        node.replace_kind(ComponentKind::Layout(Layout::new(LayoutType::Bleed)));
        let ComponentKind::Layout(layout) = node.kind() else {
            panic!("expected a layout");
        };
        assert_eq!(layout.layout_type, LayoutType::Bleed);
        assert_eq!(layout.container.children, vec![ComponentId::new("fig")]);
    }

    #[test]
    fn test_caption_attrs() {
        let mut attrs = Attrs::new();
        attrs.insert(CAPTION_KEY.into(), Value::String("a cat".into()));
        let caption = caption_from_attrs(&attrs);
        assert_eq!(caption.text_string(), "a cat");
        assert_eq!(caption.paragraph_type, ParagraphType::Caption);

        let mut out = Attrs::new();
        caption_to_attrs(&caption, &mut out).unwrap();
        assert_eq!(out[CAPTION_KEY], "a cat");
        assert_eq!(out[CAPTION_FORMATS_KEY], serde_json::json!([]));
    }

    #[test]
    fn test_leaf_lengths() {
        assert_eq!(
            ComponentKind::Paragraph(Paragraph::new("héllo")).leaf_len(),
            Some(5)
        );
        assert_eq!(ComponentKind::Giphy(GiphyComponent::default()).leaf_len(), Some(1));
        assert_eq!(ComponentKind::Section(Section::default()).leaf_len(), None);
    }
}
