//! Char-level diff between the model text and what the view now shows.
//!
//! The view layer reads the edited paragraph's text back after native input
//! and hands both strings here; nothing in this module touches a view.

/// One contiguous change, in char offsets of the old text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextDiff {
    Inserted { index: usize, text: String },
    Removed { index: usize, count: usize },
    Replaced { index: usize, count: usize, text: String },
}

impl TextDiff {
    /// Smallest single edit turning `old` into `new`, found by trimming the
    /// common prefix and suffix. `None` when the texts are equal.
    pub fn compute(old: &str, new: &str) -> Option<TextDiff> {
        let old: Vec<char> = old.chars().collect();
        let new: Vec<char> = new.chars().collect();

        let prefix = old
            .iter()
            .zip(new.iter())
            .take_while(|(a, b)| a == b)
            .count();
        let max_suffix = old.len().min(new.len()) - prefix;
        let suffix = old[prefix..]
            .iter()
            .rev()
            .zip(new[prefix..].iter().rev())
            .take(max_suffix)
            .take_while(|(a, b)| a == b)
            .count();

        let removed = old.len() - prefix - suffix;
        let inserted: String = new[prefix..new.len() - suffix].iter().collect();

        match (removed, inserted.is_empty()) {
            (0, true) => None,
            (0, false) => Some(TextDiff::Inserted {
                index: prefix,
                text: inserted,
            }),
            (count, true) => Some(TextDiff::Removed {
                index: prefix,
                count,
            }),
            (count, false) => Some(TextDiff::Replaced {
                index: prefix,
                count,
                text: inserted,
            }),
        }
    }

    pub fn index(&self) -> usize {
        match self {
            TextDiff::Inserted { index, .. }
            | TextDiff::Removed { index, .. }
            | TextDiff::Replaced { index, .. } => *index,
        }
    }

    /// Where the cursor sits once the change is applied.
    pub fn cursor_after(&self) -> usize {
        match self {
            TextDiff::Inserted { index, text } | TextDiff::Replaced { index, text, .. } => {
                index + text.chars().count()
            }
            TextDiff::Removed { index, .. } => *index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_at_end() {
        assert_eq!(
            TextDiff::compute("hell", "hello"),
            Some(TextDiff::Inserted {
                index: 4,
                text: "o".into()
            })
        );
    }

    #[test]
    fn test_repeated_chars_prefer_prefix() {
        // "aa" -> "aaa": the new char is reported after the common prefix.
        assert_eq!(
            TextDiff::compute("aa", "aaa"),
            Some(TextDiff::Inserted {
                index: 2,
                text: "a".into()
            })
        );
        assert_eq!(
            TextDiff::compute("aaa", "a"),
            Some(TextDiff::Removed { index: 1, count: 2 })
        );
    }

    #[test]
    fn test_replacement_in_middle() {
        let diff = TextDiff::compute("teh cat", "the cat").unwrap();
        assert_eq!(
            diff,
            TextDiff::Replaced {
                index: 1,
                count: 2,
                text: "he".into()
            }
        );
        assert_eq!(diff.cursor_after(), 3);
    }

    #[test]
    fn test_multibyte_offsets_are_chars() {
        assert_eq!(
            TextDiff::compute("héllo", "héllo😀"),
            Some(TextDiff::Inserted {
                index: 5,
                text: "😀".into()
            })
        );
        assert_eq!(TextDiff::compute("same", "same"), None);
    }
}
