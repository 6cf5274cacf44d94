//! Text paragraphs: the only text-bearing component variant.
//!
//! Headers, quotes, code blocks, captions and list items are all paragraphs
//! that differ by `ParagraphType`.

use serde::{Deserialize, Serialize};

use crate::format::{self, Format, FormatType};
use crate::text::{TextBuffer, TextRope};

/// Block type of a paragraph, serialized with its HTML tag name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParagraphType {
    #[default]
    #[serde(rename = "p")]
    Paragraph,
    #[serde(rename = "h1")]
    MainHeader,
    #[serde(rename = "h2")]
    SecondaryHeader,
    #[serde(rename = "h3")]
    ThirdHeader,
    #[serde(rename = "blockquote")]
    Quote,
    #[serde(rename = "pre")]
    Code,
    #[serde(rename = "figcaption")]
    Caption,
    #[serde(rename = "li")]
    ListItem,
}

impl ParagraphType {
    pub fn is_header(self) -> bool {
        matches!(
            self,
            Self::MainHeader | Self::SecondaryHeader | Self::ThirdHeader
        )
    }
}

/// A run of formatted text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    #[serde(default)]
    pub text: TextRope,
    #[serde(default)]
    pub formats: Vec<Format>,
    #[serde(default)]
    pub paragraph_type: ParagraphType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder_text: Option<String>,
}

impl Paragraph {
    pub fn new(text: &str) -> Self {
        Self {
            text: TextRope::from_str(text),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, paragraph_type: ParagraphType) -> Self {
        self.paragraph_type = paragraph_type;
        self
    }

    pub fn with_formats(mut self, formats: Vec<Format>) -> Self {
        self.formats = formats;
        format::normalize(&mut self.formats);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder_text = Some(placeholder.into());
        self
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.text.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn text_string(&self) -> String {
        self.text.to_string()
    }

    /// Insert `value` at char `index`. Caller guarantees `index <= len`.
    pub fn insert_chars(&mut self, index: usize, value: &str) {
        let added = value.chars().count();
        self.text.insert(index, value);
        format::shift_for_insert(&mut self.formats, index, added);
    }

    /// Remove `count` chars at `index`, returning the removed text.
    /// Caller guarantees `index + count <= len`.
    pub fn remove_chars(&mut self, index: usize, count: usize) -> String {
        let removed = self
            .text
            .slice(index..index + count)
            .map(|s| s.to_string())
            .unwrap_or_default();
        self.text.delete(index..index + count);
        format::shift_for_remove(&mut self.formats, index, count);
        removed
    }

    /// Replace the whole text; runs past the new end are clipped.
    pub fn set_text(&mut self, text: &str) {
        self.text = TextRope::from_str(text);
        let len = self.len();
        for f in &mut self.formats {
            f.from = f.from.min(len);
            f.to = f.to.min(len);
        }
        format::normalize(&mut self.formats);
    }

    /// Toggle a format run, clamped to the text.
    pub fn apply_format(&mut self, format: Format) {
        let len = self.len();
        let clamped = format.with_range(format.from.min(len), format.to.min(len));
        format::toggle_format(&mut self.formats, clamped);
    }

    /// Runs intersecting `[from, to)`.
    pub fn formatted_ranges(
        &self,
        from: usize,
        to: usize,
        format_type: Option<FormatType>,
    ) -> Vec<&Format> {
        format::formatted_ranges(&self.formats, from, to, format_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_remove_chars() {
        let mut p = Paragraph::new("hello");
        p.insert_chars(5, " world");
        assert_eq!(p.text_string(), "hello world");
        assert_eq!(p.len(), 11);

        let removed = p.remove_chars(0, 6);
        assert_eq!(removed, "hello ");
        assert_eq!(p.text_string(), "world");
    }

    #[test]
    fn test_format_shifts_with_text() {
        let mut p = Paragraph::new("hello world")
            .with_formats(vec![Format::new(FormatType::Bold, 6, 11)]);
        p.insert_chars(0, ">> ");
        assert_eq!(p.formats, vec![Format::new(FormatType::Bold, 9, 14)]);
        p.remove_chars(0, 3);
        assert_eq!(p.formats, vec![Format::new(FormatType::Bold, 6, 11)]);
    }

    #[test]
    fn test_set_text_clips_formats() {
        let mut p = Paragraph::new("hello world")
            .with_formats(vec![Format::new(FormatType::Italic, 3, 11)]);
        p.set_text("hey");
        assert!(p.formats.is_empty());

        let mut p = Paragraph::new("hello world")
            .with_formats(vec![Format::new(FormatType::Italic, 1, 11)]);
        p.set_text("hey");
        assert_eq!(p.formats, vec![Format::new(FormatType::Italic, 1, 3)]);
    }

    #[test]
    fn test_apply_format_toggles() {
        let mut p = Paragraph::new("hello world");
        p.apply_format(Format::new(FormatType::Bold, 0, 5));
        assert_eq!(p.formatted_ranges(0, 11, None).len(), 1);
        p.apply_format(Format::new(FormatType::Bold, 0, 5));
        assert!(p.formats.is_empty());
    }

    #[test]
    fn test_paragraph_type_wire_names() {
        let p = Paragraph::new("x").with_type(ParagraphType::SecondaryHeader);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["paragraphType"], "h2");
        assert_eq!(json["text"], "x");
        assert_eq!(json["formats"], serde_json::json!([]));
        assert!(json.get("placeholderText").is_none());
    }
}
