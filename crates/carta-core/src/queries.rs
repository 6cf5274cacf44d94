//! Derived read-only queries over an article, plus `trim`.

use crate::article::Article;
use crate::components::{ComponentKind, Paragraph, ParagraphType};
use crate::error::Result;
use crate::id::ComponentId;
use crate::ops::DeleteOptions;

impl Article {
    /// Total length: sum over sections.
    pub fn len(&self) -> usize {
        self.tree.length(self.tree.name())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn paragraphs(&self) -> impl Iterator<Item = (ComponentId, &Paragraph)> + '_ {
        self.tree.leaves().into_iter().filter_map(|id| {
            let paragraph = self.tree.get(&id)?.kind().as_paragraph()?;
            Some((id, paragraph))
        })
    }

    /// Text of the first non-blank header.
    pub fn title(&self) -> Option<String> {
        self.paragraphs()
            .find(|(_, p)| p.paragraph_type.is_header() && !p.text.is_blank())
            .map(|(_, p)| p.text_string().trim().to_string())
    }

    /// First non-blank body paragraph (not a header).
    pub fn first_text_component(&self) -> Option<ComponentId> {
        self.paragraphs()
            .find(|(_, p)| !p.paragraph_type.is_header() && !p.text.is_blank())
            .map(|(id, _)| id)
    }

    /// Up to `words` words of body text, in document order. An ellipsis is
    /// appended when text was cut.
    pub fn snippet(&self, words: usize) -> String {
        let mut taken: Vec<String> = Vec::new();
        let mut truncated = false;
        for (_, paragraph) in self
            .paragraphs()
            .filter(|(_, p)| !p.paragraph_type.is_header())
        {
            for word in paragraph.text_string().split_whitespace() {
                if taken.len() == words {
                    truncated = true;
                    break;
                }
                taken.push(word.to_string());
            }
            if truncated {
                break;
            }
        }
        let mut snippet = taken.join(" ");
        if truncated {
            snippet.push('…');
        }
        snippet
    }

    /// Whether the article opens with a media component in a cover layout:
    /// the first layout with children must be bleed, staged or full screen,
    /// and its first child a figure or an embed.
    pub fn has_cover(&self) -> bool {
        let first_layout = self
            .tree
            .sections()
            .iter()
            .flat_map(|s| self.tree.children(s).unwrap_or_default())
            .filter_map(|id| match self.tree.get(id)?.kind() {
                ComponentKind::Layout(layout) if !layout.container.is_empty() => Some(layout),
                _ => None,
            })
            .next();
        let Some(layout) = first_layout else {
            return false;
        };
        if !layout.layout_type.is_cover() {
            return false;
        }
        layout
            .container
            .children
            .first()
            .and_then(|id| self.tree.get(id))
            .is_some_and(|c| {
                matches!(c.kind(), ComponentKind::Figure(_) | ComponentKind::Embedded(_))
            })
    }

    /// Remove blank plain paragraphs from both ends of the article as one
    /// undoable batch. The last remaining leaf is never removed. Returns the
    /// number of paragraphs removed.
    pub fn trim(&mut self) -> Result<usize> {
        let placeholder = self.placeholder_text().map(str::to_string);
        let mut tx = self.begin();
        let mut removed = 0;
        for from_start in [true, false] {
            loop {
                let tree = tx.tree();
                let candidate = if from_start {
                    tree.first_component()
                } else {
                    tree.last_component()
                };
                let Some(id) = candidate else {
                    break;
                };
                if tree.leaves().len() <= 1 || !is_blank_paragraph(tree.get(&id).map(|c| c.kind())) {
                    break;
                }
                let options = DeleteOptions {
                    placeholder_text: placeholder.clone(),
                    ..DeleteOptions::default()
                };
                let ops = tree.delete_ops(&id, &options)?;
                tx.apply(ops)?;
                removed += 1;
            }
        }
        tx.commit();
        Ok(removed)
    }
}

fn is_blank_paragraph(kind: Option<&ComponentKind>) -> bool {
    matches!(
        kind,
        Some(ComponentKind::Paragraph(p))
            if p.paragraph_type == ParagraphType::Paragraph && p.text.is_blank()
    )
}
