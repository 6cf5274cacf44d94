//! Text storage for text-bearing components.
//!
//! The `TextBuffer` trait is the char-offset interface paragraphs edit
//! through; `TextRope` is the ropey-backed implementation stored in the model.

use std::ops::Range;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smol_str::{SmolStr, ToSmolStr};

/// A text buffer addressed in chars (Unicode scalar values), never bytes.
pub trait TextBuffer {
    /// Total length in chars.
    fn len_chars(&self) -> usize;

    /// Check if empty.
    fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    /// Insert text at char offset.
    fn insert(&mut self, char_offset: usize, text: &str);

    /// Delete char range.
    fn delete(&mut self, char_range: Range<usize>);

    /// Replace char range with text.
    fn replace(&mut self, char_range: Range<usize>, text: &str) {
        self.delete(char_range.clone());
        self.insert(char_range.start, text);
    }

    /// Get a slice as SmolStr. Returns None if range is invalid.
    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr>;

    /// Get character at offset. Returns None if out of bounds.
    fn char_at(&self, char_offset: usize) -> Option<char>;

    /// Convert entire buffer to String.
    fn to_string(&self) -> String;
}

/// Ropey-backed text of a single component.
///
/// Serializes as a plain JSON string.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TextRope {
    rope: ropey::Rope,
}

impl TextRope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_str(s: &str) -> Self {
        Self {
            rope: ropey::Rope::from_str(s),
        }
    }

    /// Get a reference to the underlying rope.
    pub fn rope(&self) -> &ropey::Rope {
        &self.rope
    }

    /// Whether the text is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.rope.chars().all(char::is_whitespace)
    }
}

impl TextBuffer for TextRope {
    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn insert(&mut self, char_offset: usize, text: &str) {
        self.rope.insert(char_offset, text);
    }

    fn delete(&mut self, char_range: Range<usize>) {
        self.rope.remove(char_range);
    }

    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr> {
        if char_range.start > char_range.end || char_range.end > self.len_chars() {
            return None;
        }
        Some(self.rope.slice(char_range).to_smolstr())
    }

    fn char_at(&self, char_offset: usize) -> Option<char> {
        if char_offset >= self.len_chars() {
            return None;
        }
        Some(self.rope.char(char_offset))
    }

    fn to_string(&self) -> String {
        self.rope.to_string()
    }
}

impl std::fmt::Debug for TextRope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.rope.to_string())
    }
}

impl From<&str> for TextRope {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for TextRope {
    fn from(s: String) -> Self {
        Self::from_str(&s)
    }
}

impl Serialize for TextRope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.rope)
    }
}

impl<'de> Deserialize<'de> for TextRope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_str(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut rope = TextRope::from_str("hello world");
        assert_eq!(rope.len_chars(), 11);
        assert_eq!(rope.to_string(), "hello world");

        rope.insert(5, " beautiful");
        assert_eq!(rope.to_string(), "hello beautiful world");

        rope.delete(5..15);
        assert_eq!(rope.to_string(), "hello world");
    }

    #[test]
    fn test_char_at_and_slice() {
        let rope = TextRope::from_str("héllo");
        assert_eq!(rope.char_at(1), Some('é'));
        assert_eq!(rope.char_at(5), None);
        assert_eq!(rope.slice(1..3).as_deref(), Some("él"));
        assert_eq!(rope.slice(0..100), None);
    }

    #[test]
    fn test_blank() {
        assert!(TextRope::from_str("").is_blank());
        assert!(TextRope::from_str(" \t").is_blank());
        assert!(!TextRope::from_str(" a ").is_blank());
    }

    #[test]
    fn test_serde_as_string() {
        let rope = TextRope::from_str("hi");
        assert_eq!(serde_json::to_string(&rope).unwrap(), "\"hi\"");
        let back: TextRope = serde_json::from_str("\"hi\"").unwrap();
        assert_eq!(back, rope);
    }
}
