//! Error types for document model operations.

use miette::Diagnostic;
use smol_str::SmolStr;
use thiserror::Error;

use crate::id::ComponentId;

/// Errors raised while building, mutating or replaying a document.
///
/// `NotImplemented` and `AlreadyRegistered` indicate integration bugs and are
/// meant to propagate to the caller rather than be swallowed.
#[derive(Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum EditorError {
    /// A component variant was asked for a mutation it does not support.
    #[error("{operation} is not implemented for {class}")]
    #[diagnostic(
        code(carta::not_implemented),
        help("only text-bearing components accept character operations")
    )]
    NotImplemented {
        class: &'static str,
        operation: &'static str,
    },

    /// Duplicate registration of a class, shortcut or pattern without `force`.
    #[error("{kind} `{name}` is already registered")]
    #[diagnostic(code(carta::already_registered))]
    AlreadyRegistered { kind: &'static str, name: String },

    /// No factory registered under this class name.
    #[error("unknown component class `{0}`")]
    #[diagnostic(code(carta::unknown_class))]
    UnknownClass(SmolStr),

    /// The name does not resolve to a live component.
    #[error("component `{0}` not found")]
    #[diagnostic(code(carta::component_not_found))]
    ComponentNotFound(ComponentId),

    /// The component was used as a container but cannot hold children.
    #[error("component `{0}` is not a container")]
    #[diagnostic(code(carta::not_a_container))]
    NotAContainer(ComponentId),

    /// A component with this name is already attached to the tree.
    #[error("component `{0}` is already attached")]
    #[diagnostic(code(carta::already_attached))]
    AlreadyAttached(ComponentId),

    /// Containers must be emptied before they are removed.
    #[error("container `{0}` still has children")]
    #[diagnostic(code(carta::container_not_empty))]
    ContainerNotEmpty(ComponentId),

    /// An index or offset outside the target's bounds.
    #[error("index {index} out of bounds for `{component}` (length {len})")]
    #[diagnostic(code(carta::index_out_of_bounds))]
    IndexOutOfBounds {
        component: ComponentId,
        index: usize,
        len: usize,
    },

    /// Attributes could not be turned into the requested variant.
    #[error("invalid attributes for {class}: {source}")]
    #[diagnostic(code(carta::invalid_attributes))]
    InvalidAttributes {
        class: SmolStr,
        #[source]
        source: serde_json::Error,
    },

    /// Document JSON could not be read or written.
    #[error(transparent)]
    #[diagnostic(code(carta::json))]
    Json(#[from] serde_json::Error),
}

impl EditorError {
    pub(crate) fn not_implemented(class: &'static str, operation: &'static str) -> Self {
        EditorError::NotImplemented { class, operation }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = EditorError> = std::result::Result<T, E>;
