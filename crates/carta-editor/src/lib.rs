//! carta-editor: the input layer of the carta rich-text editor.
//!
//! This crate provides:
//! - `Editor` - an article plus input handling, executing actions as
//!   undoable batches
//! - `EditorAction` / `KeybindingConfig` - semantic edits and the shortcuts
//!   that trigger them
//! - `InputCoalescer` / `TextDiff` - debounced native text input
//! - `AutoformatRegistry` - markdown-style shortcuts at paragraph start
//! - `EditorConfig` - TOML-loadable settings

pub mod actions;
pub mod autoformat;
pub mod config;
pub mod diff;
pub mod editor;
pub mod error;
pub mod execute;
pub mod input;
pub mod text_helpers;

pub use actions::{EditorAction, Key, KeyCombo, KeybindingConfig, KeydownResult, Modifiers};
pub use autoformat::{AutoformatHandler, AutoformatRegistry, AutoformatRule};
pub use config::EditorConfig;
pub use diff::TextDiff;
pub use editor::Editor;
pub use error::{Error, Result};
pub use execute::execute_action;
pub use input::{InputCoalescer, InputKind, PendingInput};
