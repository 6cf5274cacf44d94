//! Container variants: sections, layouts and lists.
//!
//! All three embed the same [`Container`] capability; they only differ in
//! their own attributes. Children are arena names, never owned values.

use serde::{Deserialize, Serialize};

use crate::id::ComponentId;

/// Ordered child list shared by every container variant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Container {
    pub children: Vec<ComponentId>,
}

impl Container {
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn index_of(&self, id: &ComponentId) -> Option<usize> {
        self.children.iter().position(|c| c == id)
    }
}

/// A top-level ordered container of components within an article.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(skip)]
    pub container: Container,
}

/// Visual arrangement of a layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutType {
    #[default]
    #[serde(rename = "layout-single-column")]
    SingleColumn,
    #[serde(rename = "layout-bleed")]
    Bleed,
    #[serde(rename = "layout-staged")]
    Staged,
    #[serde(rename = "layout-full-screen")]
    FullScreen,
    #[serde(rename = "layout-left")]
    Left,
    #[serde(rename = "layout-right")]
    Right,
}

impl LayoutType {
    /// Layouts that turn a leading media component into a cover.
    pub fn is_cover(self) -> bool {
        matches!(self, Self::Bleed | Self::Staged | Self::FullScreen)
    }
}

/// A visual column/bleed/staged arrangement of components.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default, rename = "type")]
    pub layout_type: LayoutType,
    #[serde(skip)]
    pub container: Container,
}

impl Layout {
    pub fn new(layout_type: LayoutType) -> Self {
        Self {
            layout_type,
            container: Container::default(),
        }
    }
}

/// List flavour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListTag {
    #[default]
    Ul,
    Ol,
}

/// A bulleted or numbered list whose children are list-item paragraphs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    #[serde(default)]
    pub tag_name: ListTag,
    #[serde(skip)]
    pub container: Container,
}

impl List {
    pub fn new(tag_name: ListTag) -> Self {
        Self {
            tag_name,
            container: Container::default(),
        }
    }
}
