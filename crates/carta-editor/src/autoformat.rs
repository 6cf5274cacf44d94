//! Markdown-ish shortcuts typed at the start of a paragraph.
//!
//! Each rule pairs an anchored regex with a handler. After buffered input
//! is flushed, the first rule matching the start of a plain paragraph runs
//! as its own undoable batch, so undo restores the typed marker.

use carta_core::{
    Attrs, ComponentId, ComponentKind, CursorPoint, DeleteOptions, List, ListTag, NewComponent,
    Paragraph, ParagraphType, Transaction, format::formats_in,
};
use regex::Regex;

use crate::error::{Error, Result};

/// Rewrites the paragraph `id` whose first `marker` chars matched a rule.
pub type AutoformatHandler =
    fn(&mut Transaction<'_>, id: &ComponentId, marker: usize) -> carta_core::Result<()>;

#[derive(Debug, Clone)]
pub struct AutoformatRule {
    pattern: Regex,
    handler: AutoformatHandler,
}

impl AutoformatRule {
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

#[derive(Debug, Clone)]
pub struct AutoformatRegistry {
    rules: Vec<AutoformatRule>,
}

impl Default for AutoformatRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl AutoformatRegistry {
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_builtin() -> Self {
        let builtin: [(&str, AutoformatHandler); 7] = [
            (r"^\* ", bulleted_list),
            (r"^- ", bulleted_list),
            (r"^1\. ", numbered_list),
            (r"^# ", main_header),
            (r"^## ", secondary_header),
            (r"^### ", third_header),
            (r"^> ", quote),
        ];
        let mut registry = Self::empty();
        for (pattern, handler) in builtin {
            // Built-in patterns are constant and known to compile.
            if let Ok(pattern) = Regex::new(pattern) {
                registry.rules.push(AutoformatRule { pattern, handler });
            }
        }
        registry
    }

    /// Register `pattern`. A rule with the same pattern is only replaced
    /// with `force`.
    pub fn register(&mut self, pattern: &str, handler: AutoformatHandler, force: bool) -> Result<()> {
        let existing = self.rules.iter().position(|r| r.pattern.as_str() == pattern);
        if existing.is_some() && !force {
            return Err(carta_core::EditorError::AlreadyRegistered {
                kind: "autoformat pattern",
                name: pattern.to_string(),
            }
            .into());
        }
        let compiled = Regex::new(pattern).map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        let rule = AutoformatRule {
            pattern: compiled,
            handler,
        };
        match existing {
            Some(index) => self.rules[index] = rule,
            None => self.rules.push(rule),
        }
        Ok(())
    }

    pub fn rules(&self) -> &[AutoformatRule] {
        &self.rules
    }

    /// First rule matching at the start of `text`, with the match length
    /// in chars.
    pub fn find(&self, text: &str) -> Option<(&AutoformatRule, usize)> {
        self.rules.iter().find_map(|rule| {
            let m = rule.pattern.find(text).filter(|m| m.start() == 0)?;
            Some((rule, text[..m.end()].chars().count()))
        })
    }

    /// Run the first matching rule on `id` if it is a plain paragraph.
    /// Returns whether a rule ran.
    pub fn apply(&self, tx: &mut Transaction<'_>, id: &ComponentId) -> carta_core::Result<bool> {
        let Some(paragraph) = tx.tree().get(id).and_then(|c| c.kind().as_paragraph()) else {
            return Ok(false);
        };
        if paragraph.paragraph_type != ParagraphType::Paragraph {
            return Ok(false);
        }
        let text = paragraph.text_string();
        let Some((rule, marker)) = self.find(&text) else {
            return Ok(false);
        };
        (rule.handler)(tx, id, marker)?;
        Ok(true)
    }
}

fn set_type(
    tx: &mut Transaction<'_>,
    id: &ComponentId,
    marker: usize,
    paragraph_type: ParagraphType,
) -> carta_core::Result<()> {
    let ops = tx.tree().remove_chars_ops(id, 0, marker)?;
    tx.apply(ops)?;
    let mut attrs = Attrs::new();
    attrs.insert("paragraphType".into(), serde_json::to_value(paragraph_type)?);
    let ops = tx.tree().update_ops(
        id,
        carta_core::ComponentUpdate {
            attrs: Some(attrs),
            cursor_offset: Some(0),
            ..Default::default()
        },
    )?;
    tx.apply(ops)
}

fn to_list(
    tx: &mut Transaction<'_>,
    id: &ComponentId,
    marker: usize,
    tag: ListTag,
) -> carta_core::Result<()> {
    let tree = tx.tree();
    let container = tree
        .container_of(id)
        .cloned()
        .ok_or_else(|| carta_core::EditorError::ComponentNotFound(id.clone()))?;
    let index = tree
        .index_in_section(id)
        .ok_or_else(|| carta_core::EditorError::ComponentNotFound(id.clone()))?;
    let paragraph = tree.text_component(id, "autoformat")?;
    let len = paragraph.len();
    let rest: String = paragraph.text_string().chars().skip(marker).collect();
    let item = NewComponent::paragraph(
        Paragraph::new(&rest)
            .with_type(ParagraphType::ListItem)
            .with_formats(formats_in(&paragraph.formats, marker, len)),
    );
    let cursor = CursorPoint::new(item.name.clone(), 0);
    let list = NewComponent::new(ComponentKind::List(List::new(tag))).with_children(vec![item]);

    let ops = list.insert_ops(&container, index, None)?;
    tx.apply(ops)?;
    let options = DeleteOptions {
        cursor_after: Some(cursor),
        ..DeleteOptions::default()
    };
    let ops = tx.tree().delete_ops(id, &options)?;
    tx.apply(ops)
}

fn bulleted_list(tx: &mut Transaction<'_>, id: &ComponentId, marker: usize) -> carta_core::Result<()> {
    to_list(tx, id, marker, ListTag::Ul)
}

fn numbered_list(tx: &mut Transaction<'_>, id: &ComponentId, marker: usize) -> carta_core::Result<()> {
    to_list(tx, id, marker, ListTag::Ol)
}

fn main_header(tx: &mut Transaction<'_>, id: &ComponentId, marker: usize) -> carta_core::Result<()> {
    set_type(tx, id, marker, ParagraphType::MainHeader)
}

fn secondary_header(
    tx: &mut Transaction<'_>,
    id: &ComponentId,
    marker: usize,
) -> carta_core::Result<()> {
    set_type(tx, id, marker, ParagraphType::SecondaryHeader)
}

fn third_header(tx: &mut Transaction<'_>, id: &ComponentId, marker: usize) -> carta_core::Result<()> {
    set_type(tx, id, marker, ParagraphType::ThirdHeader)
}

fn quote(tx: &mut Transaction<'_>, id: &ComponentId, marker: usize) -> carta_core::Result<()> {
    set_type(tx, id, marker, ParagraphType::Quote)
}
