//! Inline formats of text components.
//!
//! A paragraph carries a list of `Format` runs over char offsets. The list is
//! kept normalized: sorted by `(from, type)`, no empty runs, and runs with the
//! same type and attrs never overlap or touch.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Inline format kinds. Serialized with their HTML tag names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FormatType {
    #[serde(rename = "strong")]
    Bold,
    #[serde(rename = "em")]
    Italic,
    #[serde(rename = "u")]
    Underline,
    #[serde(rename = "s")]
    Strikethrough,
    #[serde(rename = "code")]
    Code,
    #[serde(rename = "a")]
    Link,
}

/// A formatted char run `[from, to)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Format {
    #[serde(rename = "type")]
    pub format_type: FormatType,
    pub from: usize,
    pub to: usize,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<SmolStr, SmolStr>,
}

impl Format {
    pub fn new(format_type: FormatType, from: usize, to: usize) -> Self {
        Self {
            format_type,
            from,
            to,
            attrs: BTreeMap::new(),
        }
    }

    /// A link run pointing at `href`.
    pub fn link(from: usize, to: usize, href: impl Into<SmolStr>) -> Self {
        let mut attrs = BTreeMap::new();
        attrs.insert(SmolStr::new_static("href"), href.into());
        Self {
            format_type: FormatType::Link,
            from,
            to,
            attrs,
        }
    }

    pub fn with_range(&self, from: usize, to: usize) -> Self {
        Self {
            from,
            to,
            ..self.clone()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.from >= self.to
    }

    pub fn len(&self) -> usize {
        self.to.saturating_sub(self.from)
    }

    fn same_kind(&self, other: &Format) -> bool {
        self.format_type == other.format_type && self.attrs == other.attrs
    }

    fn covers(&self, from: usize, to: usize) -> bool {
        self.from <= from && self.to >= to
    }

    fn intersects(&self, from: usize, to: usize) -> bool {
        self.from < to && self.to > from
    }
}

/// Toggle `format` over its range.
///
/// If a run of the same type and attrs already covers the whole range, the
/// range is carved out of it. Otherwise the range is added, replacing any
/// same-type run with different attrs (e.g. another link target).
pub fn toggle_format(formats: &mut Vec<Format>, format: Format) {
    if format.is_empty() {
        return;
    }
    let covered = formats
        .iter()
        .any(|f| f.same_kind(&format) && f.covers(format.from, format.to));
    if covered {
        carve(formats, &format, |f| f.same_kind(&format));
    } else {
        carve(formats, &format, |f| {
            f.format_type == format.format_type && f.attrs != format.attrs
        });
        formats.push(format);
    }
    normalize(formats);
}

/// Remove `[range.from, range.to)` from every run selected by `pred`.
fn carve(formats: &mut Vec<Format>, range: &Format, pred: impl Fn(&Format) -> bool) {
    let mut out = Vec::with_capacity(formats.len() + 1);
    for f in formats.drain(..) {
        if !pred(&f) || !f.intersects(range.from, range.to) {
            out.push(f);
            continue;
        }
        if f.from < range.from {
            out.push(f.with_range(f.from, range.from));
        }
        if f.to > range.to {
            out.push(f.with_range(range.to, f.to));
        }
    }
    *formats = out;
}

/// Sort, drop empty runs and merge touching runs of the same kind.
pub fn normalize(formats: &mut Vec<Format>) {
    formats.retain(|f| !f.is_empty());
    formats.sort_by(|a, b| {
        (a.format_type, &a.attrs, a.from, a.to).cmp(&(b.format_type, &b.attrs, b.from, b.to))
    });
    let mut merged: Vec<Format> = Vec::with_capacity(formats.len());
    for f in formats.drain(..) {
        match merged.last_mut() {
            Some(last) if last.same_kind(&f) && f.from <= last.to => {
                last.to = last.to.max(f.to);
            }
            _ => merged.push(f),
        }
    }
    merged.sort_by(|a, b| (a.from, a.format_type).cmp(&(b.from, b.format_type)));
    *formats = merged;
}

/// Shift runs for `len` chars inserted at `index`.
///
/// A run ending exactly at the insertion point grows, so typing at the end of
/// a bold word stays bold.
pub fn shift_for_insert(formats: &mut [Format], index: usize, len: usize) {
    for f in formats.iter_mut() {
        if f.from >= index {
            f.from += len;
        }
        if f.to >= index {
            f.to += len;
        }
    }
}

/// Shift runs for `count` chars removed at `index`.
pub fn shift_for_remove(formats: &mut Vec<Format>, index: usize, count: usize) {
    let end = index + count;
    let map = |p: usize| {
        if p <= index {
            p
        } else if p >= end {
            p - count
        } else {
            index
        }
    };
    for f in formats.iter_mut() {
        f.from = map(f.from);
        f.to = map(f.to);
    }
    normalize(formats);
}

/// Runs intersecting `[from, to)`, optionally filtered by type.
///
/// A collapsed range matches runs strictly containing the point.
pub fn formatted_ranges(
    formats: &[Format],
    from: usize,
    to: usize,
    format_type: Option<FormatType>,
) -> Vec<&Format> {
    formats
        .iter()
        .filter(|f| format_type.is_none_or(|t| f.format_type == t))
        .filter(|f| {
            if from == to {
                f.from < from && f.to > from
            } else {
                f.intersects(from, to)
            }
        })
        .collect()
}

/// Runs clipped to `[from, to)` and rebased so `from` becomes 0.
pub fn formats_in(formats: &[Format], from: usize, to: usize) -> Vec<Format> {
    formats
        .iter()
        .filter(|f| f.intersects(from, to))
        .map(|f| f.with_range(f.from.max(from) - from, f.to.min(to) - from))
        .collect()
}

/// Whether every char of `[from, to)` is covered by a run of `format_type`.
pub fn is_fully_formatted(formats: &[Format], from: usize, to: usize, format_type: FormatType) -> bool {
    if from >= to {
        return false;
    }
    let mut pos = from;
    let mut runs: Vec<&Format> = formats
        .iter()
        .filter(|f| f.format_type == format_type && f.intersects(from, to))
        .collect();
    runs.sort_by_key(|f| f.from);
    for f in runs {
        if f.from > pos {
            return false;
        }
        pos = pos.max(f.to);
        if pos >= to {
            return true;
        }
    }
    pos >= to
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold(from: usize, to: usize) -> Format {
        Format::new(FormatType::Bold, from, to)
    }

    #[test]
    fn test_toggle_on_then_off() {
        let mut formats = Vec::new();
        toggle_format(&mut formats, bold(0, 5));
        assert_eq!(formats, vec![bold(0, 5)]);
        assert_eq!(formatted_ranges(&formats, 2, 8, None), vec![&bold(0, 5)]);

        toggle_format(&mut formats, bold(0, 5));
        assert!(formats.is_empty());
    }

    #[test]
    fn test_toggle_carves_middle() {
        let mut formats = vec![bold(0, 10)];
        toggle_format(&mut formats, bold(3, 6));
        assert_eq!(formats, vec![bold(0, 3), bold(6, 10)]);
    }

    #[test]
    fn test_toggle_merges_overlapping() {
        let mut formats = vec![bold(0, 5)];
        toggle_format(&mut formats, bold(3, 8));
        assert_eq!(formats, vec![bold(0, 8)]);

        toggle_format(&mut formats, bold(8, 10));
        assert_eq!(formats, vec![bold(0, 10)]);
    }

    #[test]
    fn test_link_replaces_other_target() {
        let mut formats = vec![Format::link(0, 5, "https://a.example")];
        toggle_format(&mut formats, Format::link(2, 4, "https://b.example"));
        assert_eq!(
            formats,
            vec![
                Format::link(0, 2, "https://a.example"),
                Format::link(2, 4, "https://b.example"),
                Format::link(4, 5, "https://a.example"),
            ]
        );
    }

    #[test]
    fn test_sorted_by_from_then_type() {
        let mut formats = Vec::new();
        toggle_format(&mut formats, Format::new(FormatType::Italic, 0, 3));
        toggle_format(&mut formats, bold(0, 2));
        toggle_format(&mut formats, Format::new(FormatType::Code, 1, 2));
        let order: Vec<_> = formats.iter().map(|f| (f.from, f.format_type)).collect();
        assert_eq!(
            order,
            vec![
                (0, FormatType::Bold),
                (0, FormatType::Italic),
                (1, FormatType::Code)
            ]
        );
    }

    #[test]
    fn test_insert_then_remove_restores() {
        let original = vec![bold(0, 5), Format::new(FormatType::Italic, 5, 8)];
        for index in 0..=8 {
            let mut formats = original.clone();
            shift_for_insert(&mut formats, index, 3);
            shift_for_remove(&mut formats, index, 3);
            assert_eq!(formats, original, "insert/remove at {index}");
        }
    }

    #[test]
    fn test_insert_extends_run_ending_at_point() {
        let mut formats = vec![bold(0, 5)];
        shift_for_insert(&mut formats, 5, 2);
        assert_eq!(formats, vec![bold(0, 7)]);

        let mut formats = vec![bold(5, 8)];
        shift_for_insert(&mut formats, 5, 2);
        assert_eq!(formats, vec![bold(7, 10)]);
    }

    #[test]
    fn test_remove_drops_swallowed_runs() {
        let mut formats = vec![bold(2, 4), Format::new(FormatType::Italic, 6, 9)];
        shift_for_remove(&mut formats, 1, 5);
        assert_eq!(formats, vec![Format::new(FormatType::Italic, 1, 4)]);
    }

    #[test]
    fn test_formats_in_rebases() {
        let formats = vec![bold(0, 4), Format::new(FormatType::Italic, 6, 9)];
        assert_eq!(
            formats_in(&formats, 3, 7),
            vec![bold(0, 1), Format::new(FormatType::Italic, 3, 4)]
        );
    }

    #[test]
    fn test_fully_formatted() {
        let formats = vec![bold(0, 3), bold(3, 6)];
        assert!(is_fully_formatted(&formats, 1, 6, FormatType::Bold));
        assert!(!is_fully_formatted(&formats, 1, 7, FormatType::Bold));
        assert!(!is_fully_formatted(&formats, 1, 3, FormatType::Italic));
    }
}
