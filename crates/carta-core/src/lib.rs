//! carta-core: the document model and reversible operation log of the carta
//! rich-text editor.
//!
//! This crate provides:
//! - `ComponentTree` - the name-keyed arena of sections, paragraphs, media,
//!   layouts and lists
//! - `Operation` / `OpSpec` - the `{do, undo}` mutation protocol
//! - `Article` - transactions, undo/redo history, selection and queries
//! - `Loader` - the class registry that turns class names into variants
//! - `SelectionPlatform` / `ArticleView` - seams to the native UI

pub mod article;
pub mod components;
pub mod error;
mod exec;
pub mod format;
pub mod history;
pub mod id;
pub mod json;
pub mod loader;
pub mod operation;
pub mod ops;
pub mod platform;
mod queries;
pub mod selection;
pub mod text;
pub mod transaction;
pub mod tree;

pub use article::{Article, ArticleEvent, DEFAULT_HISTORY_LIMIT};
pub use components::{
    Attrs, Component, ComponentKind, Container, EmbedType, EmbeddedComponent, Figure,
    GiphyComponent, Layout, LayoutType, List, ListTag, MediaSize, Paragraph, ParagraphType,
    Section,
};
pub use error::{EditorError, Result};
pub use format::{Format, FormatType};
pub use history::{Batch, History, UndoManager};
pub use id::ComponentId;
pub use json::{ComponentJson, DocumentJson};
pub use loader::{ComponentFactory, Loader};
pub use operation::{OpSpec, Operation};
pub use ops::{ComponentUpdate, DeleteOptions, NewComponent};
pub use platform::{
    ArticleView, DetachedPlatform, MemoryPlatform, NativePoint, NullView, PlatformError,
    RangeDescriptor, SelectionPlatform, ViewError,
};
pub use selection::{CursorPoint, Selection};
pub use smol_str::SmolStr;
pub use text::{TextBuffer, TextRope};
pub use transaction::Transaction;
pub use tree::ComponentTree;
