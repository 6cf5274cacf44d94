//! Word navigation over paragraph text.
//!
//! These work on any [`TextBuffer`], in char offsets.

use carta_core::TextBuffer;

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '\''
}

/// Find word boundary backward from cursor.
pub fn find_word_boundary_backward<B: TextBuffer + ?Sized>(text: &B, cursor: usize) -> usize {
    if cursor == 0 {
        return 0;
    }

    let mut pos = cursor.min(text.len_chars());

    // Skip any whitespace/punctuation immediately before cursor.
    while pos > 0 {
        match text.char_at(pos - 1) {
            Some(c) if is_word_char(c) => break,
            Some(_) => pos -= 1,
            None => break,
        }
    }

    // Skip the word characters.
    while pos > 0 {
        match text.char_at(pos - 1) {
            Some(c) if is_word_char(c) => pos -= 1,
            _ => break,
        }
    }

    pos
}

/// Find word boundary forward from cursor.
pub fn find_word_boundary_forward<B: TextBuffer + ?Sized>(text: &B, cursor: usize) -> usize {
    let len = text.len_chars();
    if cursor >= len {
        return len;
    }

    let mut pos = cursor;

    // Skip word characters first.
    while pos < len {
        match text.char_at(pos) {
            Some(c) if is_word_char(c) => pos += 1,
            _ => break,
        }
    }

    // Then skip whitespace/punctuation.
    while pos < len {
        match text.char_at(pos) {
            Some(c) if is_word_char(c) => break,
            Some(_) => pos += 1,
            None => break,
        }
    }

    pos
}

/// The whitespace-delimited word around `offset`, as `(start, end)`.
/// Empty when the offset sits in whitespace.
pub fn word_at<B: TextBuffer + ?Sized>(text: &B, offset: usize) -> (usize, usize) {
    let len = text.len_chars();
    let offset = offset.min(len);

    let mut start = offset;
    while start > 0 {
        match text.char_at(start - 1) {
            Some(c) if !c.is_whitespace() => start -= 1,
            _ => break,
        }
    }

    let mut end = offset;
    while end < len {
        match text.char_at(end) {
            Some(c) if !c.is_whitespace() => end += 1,
            _ => break,
        }
    }

    (start, end)
}

/// Split pasted text into paragraphs, accepting `\n`, `\r\n` and `\r`.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    text.split("\r\n")
        .flat_map(|chunk| chunk.split(['\n', '\r']))
        .collect()
}
