//! The operation protocol.
//!
//! An [`Operation`] pairs a forward mutation with its inverse. Each half is an
//! [`OpSpec`] that carries everything needed to execute it in isolation:
//! component names, never references, plus the class name and attributes
//! needed to rebuild a component that no longer exists.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::components::Attrs;
use crate::format::Format;
use crate::id::ComponentId;
use crate::selection::CursorPoint;

/// One declarative mutation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum OpSpec {
    /// Splice `value` into a text component at `index`. `formats`, when
    /// present, replaces the format list afterwards.
    InsertChars {
        component: ComponentId,
        index: usize,
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        formats: Option<Vec<Format>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cursor_offset: Option<usize>,
    },
    /// Remove `count` chars at `index`.
    RemoveChars {
        component: ComponentId,
        index: usize,
        count: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        formats: Option<Vec<Format>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cursor_offset: Option<usize>,
    },
    /// Set text, toggle formats and/or merge attributes.
    UpdateComponent {
        component: ComponentId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        formats: Option<Vec<Format>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attrs: Option<Attrs>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cursor_offset: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        select_range: Option<usize>,
    },
    /// Build `component_class` from `attrs` under the name `component` and
    /// attach it to `section` at `index`.
    InsertComponent {
        component: ComponentId,
        component_class: SmolStr,
        section: ComponentId,
        index: usize,
        #[serde(default)]
        attrs: Attrs,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cursor: Option<CursorPoint>,
    },
    /// Detach `component`.
    DeleteComponent {
        component: ComponentId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cursor: Option<CursorPoint>,
    },
}

impl OpSpec {
    /// Name of the component this spec targets.
    pub fn component(&self) -> &ComponentId {
        match self {
            Self::InsertChars { component, .. }
            | Self::RemoveChars { component, .. }
            | Self::UpdateComponent { component, .. }
            | Self::InsertComponent { component, .. }
            | Self::DeleteComponent { component, .. } => component,
        }
    }

    /// Wire name of the operation.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InsertChars { .. } => "insertChars",
            Self::RemoveChars { .. } => "removeChars",
            Self::UpdateComponent { .. } => "updateComponent",
            Self::InsertComponent { .. } => "insertComponent",
            Self::DeleteComponent { .. } => "deleteComponent",
        }
    }
}

/// A `{do, undo}` pair. Executing `forward` then `inverse` leaves the
/// document as it was.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "do")]
    pub forward: OpSpec,
    #[serde(rename = "undo")]
    pub inverse: OpSpec,
}

impl Operation {
    pub fn new(forward: OpSpec, inverse: OpSpec) -> Self {
        Self { forward, inverse }
    }

    /// The same operation with its halves swapped.
    pub fn reversed(&self) -> Self {
        Self {
            forward: self.inverse.clone(),
            inverse: self.forward.clone(),
        }
    }
}
