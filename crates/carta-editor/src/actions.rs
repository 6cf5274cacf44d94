//! Editor actions and key bindings.
//!
//! `EditorAction` is the semantic edit, decoupled from how it was triggered
//! (keyboard, toolbar, paste handler). Actions operate on the article's
//! current selection.

use std::collections::HashMap;

use carta_core::{EditorError, FormatType, NewComponent, ParagraphType};
use smol_str::SmolStr;

/// All possible editor actions.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    // === Text Insertion ===
    /// Insert text at the cursor, replacing any selected content.
    Insert { text: String },

    /// Split the paragraph at the cursor (Enter).
    InsertParagraph,

    /// Paste plain text. Each line becomes its own paragraph.
    Paste { text: String },

    /// Insert a pre-built component after the cursor's component.
    InsertComponent { component: NewComponent },

    // === Deletion ===
    /// Delete content backward (Backspace).
    DeleteBackward,

    /// Delete content forward (Delete key).
    DeleteForward,

    /// Delete word backward (Ctrl/Alt+Backspace).
    DeleteWordBackward,

    /// Delete word forward (Ctrl/Alt+Delete).
    DeleteWordForward,

    // === History ===
    Undo,
    Redo,

    // === Formatting ===
    ToggleBold,
    ToggleItalic,
    ToggleUnderline,
    ToggleStrikethrough,
    ToggleCode,

    /// Toggle a link over the selection (or the word at the cursor).
    ToggleLink { href: SmolStr },

    /// Change the block type of every selected paragraph.
    SetParagraphType { paragraph_type: ParagraphType },

    // === Selection ===
    SelectAll,
}

impl EditorAction {
    /// The inline format this action toggles, if it is a format toggle.
    pub fn format_type(&self) -> Option<FormatType> {
        match self {
            Self::ToggleBold => Some(FormatType::Bold),
            Self::ToggleItalic => Some(FormatType::Italic),
            Self::ToggleUnderline => Some(FormatType::Underline),
            Self::ToggleStrikethrough => Some(FormatType::Strikethrough),
            Self::ToggleCode => Some(FormatType::Code),
            Self::ToggleLink { .. } => Some(FormatType::Link),
            _ => None,
        }
    }
}

/// A key as reported by the platform, reduced to what the shortcut table
/// and keydown routing look at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable key. Letters are stored lowercase.
    Character(SmolStr),
    Backspace,
    Delete,
    Enter,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    PageUp,
    PageDown,
    Alt,
    Control,
    Meta,
    Shift,
    /// Dedicated undo/redo keys on some keyboards.
    Undo,
    Redo,
}

impl Key {
    /// Shift+Z and Shift+z look up the same binding.
    pub fn character(s: impl Into<SmolStr>) -> Self {
        let s: SmolStr = s.into();
        if s.chars().any(char::is_uppercase) {
            Self::Character(s.to_lowercase().into())
        } else {
            Self::Character(s)
        }
    }

    /// Keys that move the caret; the view handles these natively.
    pub fn is_navigation(&self) -> bool {
        use Key::*;
        matches!(
            self,
            ArrowLeft | ArrowRight | ArrowUp | ArrowDown | Home | End | PageUp | PageDown
        )
    }

    pub fn is_modifier(&self) -> bool {
        matches!(self, Self::Alt | Self::Control | Self::Meta | Self::Shift)
    }
}

/// Held modifier keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Cmd on macOS, Ctrl elsewhere.
    pub fn primary(is_mac: bool) -> Self {
        Self {
            ctrl: !is_mac,
            meta: is_mac,
            ..Self::default()
        }
    }

    /// Option on macOS, Ctrl elsewhere. Used for word-wise deletion.
    pub fn word(is_mac: bool) -> Self {
        Self {
            ctrl: !is_mac,
            alt: is_mac,
            ..Self::default()
        }
    }

    pub fn shifted(self) -> Self {
        Self {
            shift: true,
            ..self
        }
    }
}

/// A key plus the modifiers held with it; the shortcut table key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
        }
    }

    pub fn with(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

impl std::fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let m = self.modifiers;
        for (on, name) in [
            (m.ctrl, "Ctrl+"),
            (m.meta, "Cmd+"),
            (m.alt, "Alt+"),
            (m.shift, "Shift+"),
        ] {
            if on {
                f.write_str(name)?;
            }
        }
        match &self.key {
            Key::Character(s) => f.write_str(s),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Result of handling a keydown event.
#[derive(Debug, Clone, PartialEq)]
pub enum KeydownResult {
    /// Event was handled, prevent default.
    Handled,
    /// Event was not a keybinding, let platform handle it.
    NotHandled,
    /// Event should be passed through (navigation, etc.).
    PassThrough,
}

/// Shortcut table.
#[derive(Debug, Clone, Default)]
pub struct KeybindingConfig {
    bindings: HashMap<KeyCombo, EditorAction>,
}

impl KeybindingConfig {
    /// No bindings at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The stock shortcuts, with Cmd or Ctrl as the primary modifier.
    pub fn default_for_platform(is_mac: bool) -> Self {
        let primary = Modifiers::primary(is_mac);
        let shortcut =
            |s: &str, modifiers: Modifiers| KeyCombo::new(Key::character(s)).with(modifiers);
        let defaults = [
            (KeyCombo::new(Key::Enter), EditorAction::InsertParagraph),
            (KeyCombo::new(Key::Backspace), EditorAction::DeleteBackward),
            (KeyCombo::new(Key::Delete), EditorAction::DeleteForward),
            (
                KeyCombo::new(Key::Backspace).with(Modifiers::word(is_mac)),
                EditorAction::DeleteWordBackward,
            ),
            (
                KeyCombo::new(Key::Delete).with(Modifiers::word(is_mac)),
                EditorAction::DeleteWordForward,
            ),
            (shortcut("z", primary), EditorAction::Undo),
            (shortcut("z", primary.shifted()), EditorAction::Redo),
            (shortcut("y", primary), EditorAction::Redo),
            (KeyCombo::new(Key::Undo), EditorAction::Undo),
            (KeyCombo::new(Key::Redo), EditorAction::Redo),
            (shortcut("b", primary), EditorAction::ToggleBold),
            (shortcut("i", primary), EditorAction::ToggleItalic),
            (shortcut("u", primary), EditorAction::ToggleUnderline),
            (shortcut("x", primary.shifted()), EditorAction::ToggleStrikethrough),
            (shortcut("e", primary), EditorAction::ToggleCode),
            (shortcut("a", primary), EditorAction::SelectAll),
        ];
        let mut config = Self::empty();
        for (combo, action) in defaults {
            config.bindings.insert(combo, action);
        }
        config
    }

    /// Bind `combo`. An existing binding is only replaced with `force`.
    pub fn bind(
        &mut self,
        combo: KeyCombo,
        action: EditorAction,
        force: bool,
    ) -> Result<(), EditorError> {
        if !force && self.bindings.contains_key(&combo) {
            return Err(EditorError::AlreadyRegistered {
                kind: "shortcut",
                name: combo.to_string(),
            });
        }
        self.bindings.insert(combo, action);
        Ok(())
    }

    pub fn unbind(&mut self, combo: &KeyCombo) -> Option<EditorAction> {
        self.bindings.remove(combo)
    }

    pub fn lookup(&self, combo: &KeyCombo) -> Option<&EditorAction> {
        self.bindings.get(combo)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
