//! Action execution.
//!
//! `execute_action` turns an [`EditorAction`] into operations inside an open
//! [`Transaction`]. Each step generates ops against the live tree, applies
//! them, and reads the result before building the next step, so splits,
//! merges and cascading deletes always see the current structure.

use carta_core::format::{formats_in, is_fully_formatted, normalize};
use carta_core::{
    ComponentId, ComponentTree, CursorPoint, DeleteOptions, Format, FormatType, NewComponent,
    Paragraph, ParagraphType, Result, SmolStr, Transaction,
};

use crate::actions::EditorAction;
use crate::text_helpers::{
    find_word_boundary_backward, find_word_boundary_forward, split_paragraphs, word_at,
};

/// Execute an editor action inside `tx`.
///
/// Returns whether anything was applied. History and whole-article
/// selection actions (`Undo`, `Redo`, `SelectAll`) act outside a
/// transaction and are reported as not handled here.
pub fn execute_action(tx: &mut Transaction<'_>, action: &EditorAction) -> Result<bool> {
    match action {
        EditorAction::Insert { text } => execute_insert(tx, text),
        EditorAction::InsertParagraph => execute_insert_paragraph(tx),
        EditorAction::Paste { text } => execute_paste(tx, text),
        EditorAction::InsertComponent { component } => execute_insert_component(tx, component),
        EditorAction::DeleteBackward => execute_delete_backward(tx),
        EditorAction::DeleteForward => execute_delete_forward(tx),
        EditorAction::DeleteWordBackward => execute_delete_word_backward(tx),
        EditorAction::DeleteWordForward => execute_delete_word_forward(tx),
        EditorAction::ToggleBold
        | EditorAction::ToggleItalic
        | EditorAction::ToggleUnderline
        | EditorAction::ToggleStrikethrough
        | EditorAction::ToggleCode => match action.format_type() {
            Some(format_type) => execute_toggle_format(tx, format_type, None),
            None => Ok(false),
        },
        EditorAction::ToggleLink { href } => {
            execute_toggle_format(tx, FormatType::Link, Some(href.clone()))
        }
        EditorAction::SetParagraphType { paragraph_type } => {
            execute_set_paragraph_type(tx, *paragraph_type)
        }
        EditorAction::Undo | EditorAction::Redo | EditorAction::SelectAll => Ok(false),
    }
}

// === Helpers ===

fn paragraph<'t>(tree: &'t ComponentTree, id: &ComponentId) -> Option<&'t Paragraph> {
    tree.get(id)?.kind().as_paragraph()
}

fn is_inline(tree: &ComponentTree, id: &ComponentId) -> bool {
    tree.get(id).is_some_and(|c| c.is_inline())
}

/// The component that owns `id` at block level: the owner for captions.
fn block_of(tree: &ComponentTree, id: &ComponentId) -> ComponentId {
    tree.get(id)
        .filter(|c| c.is_inline())
        .and_then(|c| c.parent_component())
        .cloned()
        .unwrap_or_else(|| id.clone())
}

/// Text and formats from `from` to the end, rebased to 0.
fn tail(paragraph: &Paragraph, from: usize) -> (String, Vec<Format>) {
    let text = paragraph.text_string().chars().skip(from).collect();
    let formats = formats_in(&paragraph.formats, from, paragraph.len());
    (text, formats)
}

fn shifted(formats: &[Format], by: usize) -> Vec<Format> {
    formats
        .iter()
        .map(|f| f.with_range(f.from + by, f.to + by))
        .collect()
}

/// Where the cursor goes when `id` disappears: the end of the previous
/// leaf, else the start of the next one.
fn neighbour_cursor(tree: &ComponentTree, id: &ComponentId) -> Option<CursorPoint> {
    if let Some(prev) = tree.previous_component(id) {
        let len = tree.length(&prev);
        return Some(CursorPoint::new(prev, len));
    }
    tree.next_component(id).map(|next| CursorPoint::new(next, 0))
}

fn remove_chars(tx: &mut Transaction<'_>, id: &ComponentId, index: usize, count: usize) -> Result<()> {
    if count == 0 {
        return Ok(());
    }
    let ops = tx.tree().remove_chars_ops(id, index, count)?;
    tx.apply(ops)
}

fn insert_chars(tx: &mut Transaction<'_>, id: &ComponentId, index: usize, text: &str) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    let ops = tx.tree().insert_chars_ops(id, index, text)?;
    tx.apply(ops)
}

/// Append text with its formats to the end of paragraph `id`.
fn append_into(tx: &mut Transaction<'_>, id: &ComponentId, text: &str, formats: &[Format]) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    let target = tx.tree().text_component(id, "insertChars")?;
    let at = target.len();
    let mut merged = target.formats.clone();
    merged.extend(shifted(formats, at));
    normalize(&mut merged);
    let ops = tx
        .tree()
        .insert_chars_with_formats_ops(id, at, text, Some(merged))?;
    tx.apply(ops)
}

fn delete_component(tx: &mut Transaction<'_>, id: &ComponentId, cursor: Option<CursorPoint>) -> Result<()> {
    let options = DeleteOptions {
        cursor_after: cursor,
        placeholder_text: tx.article().placeholder_text().map(str::to_string),
        ..DeleteOptions::default()
    };
    let ops = tx.tree().delete_ops(id, &options)?;
    tx.apply(ops)
}

/// Insert `component` right after `anchor` in the anchor's container.
fn insert_after(
    tx: &mut Transaction<'_>,
    anchor: &ComponentId,
    component: &NewComponent,
    cursor: Option<CursorPoint>,
) -> Result<()> {
    let tree = tx.tree();
    let (Some(container), Some(index)) = (tree.container_of(anchor), tree.index_in_section(anchor))
    else {
        return Err(carta_core::EditorError::ComponentNotFound(anchor.clone()));
    };
    let ops = component.insert_ops(container, index + 1, cursor)?;
    tx.apply(ops)
}

/// Delete the selected range, if any, and return the collapsed cursor.
fn collapse(tx: &mut Transaction<'_>) -> Result<CursorPoint> {
    if tx.selection().is_range() {
        delete_selection(tx)
    } else {
        Ok(tx.selection().start().clone())
    }
}

/// Remove everything between the selection endpoints. Text left after the
/// end point is joined onto the start paragraph.
fn delete_selection(tx: &mut Transaction<'_>) -> Result<CursorPoint> {
    let start = tx.selection().start().clone();
    let end = tx.selection().end().clone();
    let start_text = paragraph(tx.tree(), &start.component).is_some();
    let end_text = paragraph(tx.tree(), &end.component).is_some();

    if start.component == end.component {
        if start_text {
            remove_chars(tx, &start.component, start.offset, end.offset - start.offset)?;
            tx.set_cursor(start.clone())?;
            return Ok(start);
        }
        let cursor = neighbour_cursor(tx.tree(), &start.component);
        delete_component(tx, &start.component, cursor)?;
        return Ok(tx.selection().start().clone());
    }

    // Captions cannot be deleted on their own; a range reaching into one
    // stops at its owner, which is kept.
    let (start, start_text) = if is_inline(tx.tree(), &start.component) {
        (CursorPoint::new(block_of(tx.tree(), &start.component), 1), false)
    } else {
        (start, start_text)
    };
    let (end, end_text) = if is_inline(tx.tree(), &end.component) {
        (CursorPoint::new(block_of(tx.tree(), &end.component), 0), false)
    } else {
        (end, end_text)
    };

    let end_tail = paragraph(tx.tree(), &end.component).map(|p| tail(p, end.offset));
    let between = tx
        .tree()
        .components_between(&start.component, &end.component);
    for id in between {
        if tx.tree().contains(&id) {
            delete_component(tx, &id, None)?;
        }
    }

    match (start_text, end_text) {
        (true, true) => {
            delete_component(tx, &end.component, None)?;
        }
        (false, true) => {
            remove_chars(tx, &end.component, 0, end.offset)?;
        }
        (_, false) if end.offset > 0 => {
            delete_component(tx, &end.component, None)?;
        }
        _ => {}
    }

    if start_text {
        let len = tx.tree().length(&start.component);
        remove_chars(tx, &start.component, start.offset, len - start.offset.min(len))?;
        if end_text {
            if let Some((text, formats)) = end_tail {
                append_into(tx, &start.component, &text, &formats)?;
            }
        }
        tx.set_cursor(start.clone())?;
        return Ok(start);
    }

    if start.offset == 0 {
        let cursor = if tx.tree().contains(&end.component) {
            Some(CursorPoint::new(end.component.clone(), 0))
        } else {
            neighbour_cursor(tx.tree(), &start.component)
        };
        delete_component(tx, &start.component, cursor)?;
        return Ok(tx.selection().start().clone());
    }

    tx.set_cursor(start.clone())?;
    Ok(start)
}

// === Insertion ===

fn execute_insert(tx: &mut Transaction<'_>, text: &str) -> Result<bool> {
    if text.contains(['\n', '\r']) {
        return execute_paste(tx, text);
    }
    if text.is_empty() && !tx.selection().is_range() {
        return Ok(false);
    }
    let cursor = collapse(tx)?;
    if text.is_empty() {
        return Ok(true);
    }

    if paragraph(tx.tree(), &cursor.component).is_some() {
        insert_chars(tx, &cursor.component, cursor.offset, text)?;
        let offset = cursor.offset + text.chars().count();
        tx.set_cursor(CursorPoint::new(cursor.component, offset))?;
    } else {
        // Typing on a media component starts a paragraph after it.
        let new = NewComponent::paragraph(Paragraph::new(text));
        let point = CursorPoint::new(new.name.clone(), text.chars().count());
        insert_after(tx, &cursor.component, &new, Some(point.clone()))?;
        tx.set_cursor(point)?;
    }
    Ok(true)
}

fn execute_insert_paragraph(tx: &mut Transaction<'_>) -> Result<bool> {
    let cursor = collapse(tx)?;
    let id = cursor.component.clone();

    let split = match paragraph(tx.tree(), &id) {
        Some(p) if !is_inline(tx.tree(), &id) => Some((
            p.len(),
            p.paragraph_type,
            p.is_empty(),
            tail(p, cursor.offset),
        )),
        _ => None,
    };

    let Some((len, paragraph_type, empty, (tail_text, tail_formats))) = split else {
        // Media or caption: open an empty paragraph after the block.
        let anchor = block_of(tx.tree(), &id);
        let new = NewComponent::paragraph(Paragraph::default());
        let point = CursorPoint::new(new.name.clone(), 0);
        insert_after(tx, &anchor, &new, Some(point.clone()))?;
        tx.set_cursor(point)?;
        return Ok(true);
    };

    if paragraph_type == ParagraphType::ListItem && empty {
        if let Some(list) = last_item_list(tx.tree(), &id) {
            return exit_list(tx, &id, &list);
        }
    }

    let new_type = match paragraph_type {
        ParagraphType::ListItem => ParagraphType::ListItem,
        other if cursor.offset < len => other,
        _ => ParagraphType::Paragraph,
    };

    remove_chars(tx, &id, cursor.offset, len - cursor.offset)?;
    let new = NewComponent::paragraph(
        Paragraph::new(&tail_text)
            .with_type(new_type)
            .with_formats(tail_formats),
    );
    let point = CursorPoint::new(new.name.clone(), 0);
    insert_after(tx, &id, &new, Some(point.clone()))?;
    tx.set_cursor(point)?;
    Ok(true)
}

/// The list `id` is the last item of, if any.
fn last_item_list(tree: &ComponentTree, id: &ComponentId) -> Option<ComponentId> {
    let list = tree.container_of(id)?;
    let is_list = matches!(
        tree.get(list).map(|c| c.kind()),
        Some(carta_core::ComponentKind::List(_))
    );
    let children = tree.children(list).ok()?;
    (is_list && children.last() == Some(id)).then(|| list.clone())
}

/// Enter on an empty last list item: drop the item and continue with a
/// plain paragraph after the list.
fn exit_list(tx: &mut Transaction<'_>, item: &ComponentId, list: &ComponentId) -> Result<bool> {
    let new = NewComponent::paragraph(Paragraph::default());
    let point = CursorPoint::new(new.name.clone(), 0);
    insert_after(tx, list, &new, Some(point.clone()))?;
    delete_component(tx, item, Some(point.clone()))?;
    tx.set_cursor(point)?;
    Ok(true)
}

fn execute_paste(tx: &mut Transaction<'_>, text: &str) -> Result<bool> {
    let lines = split_paragraphs(text);
    let Some((first, rest)) = lines.split_first() else {
        return Ok(false);
    };
    if rest.is_empty() {
        return execute_insert(tx, first);
    }

    let cursor = collapse(tx)?;
    let id = cursor.component.clone();

    if is_inline(tx.tree(), &id) {
        // Captions hold a single line.
        let joined = lines.join(" ");
        insert_chars(tx, &id, cursor.offset, &joined)?;
        let offset = cursor.offset + joined.chars().count();
        tx.set_cursor(CursorPoint::new(id, offset))?;
        return Ok(true);
    }

    let target = paragraph(tx.tree(), &id).map(|p| {
        let item_type = match p.paragraph_type {
            ParagraphType::ListItem => ParagraphType::ListItem,
            _ => ParagraphType::Paragraph,
        };
        (p.len(), item_type, tail(p, cursor.offset))
    });

    let (item_type, tail_text, tail_formats, new_lines) = match target {
        Some((len, item_type, (tail_text, tail_formats))) => {
            remove_chars(tx, &id, cursor.offset, len - cursor.offset)?;
            insert_chars(tx, &id, cursor.offset, first)?;
            (item_type, tail_text, tail_formats, rest)
        }
        None => (ParagraphType::Paragraph, String::new(), Vec::new(), &lines[..]),
    };

    let mut anchor = id;
    let mut point = CursorPoint::new(anchor.clone(), 0);
    for (i, line) in new_lines.iter().enumerate() {
        let line_len = line.chars().count();
        let paragraph = if i + 1 == new_lines.len() {
            Paragraph::new(&format!("{line}{tail_text}"))
                .with_type(item_type)
                .with_formats(shifted(&tail_formats, line_len))
        } else {
            Paragraph::new(line).with_type(item_type)
        };
        let new = NewComponent::paragraph(paragraph);
        point = CursorPoint::new(new.name.clone(), line_len);
        insert_after(tx, &anchor, &new, Some(point.clone()))?;
        anchor = new.name;
    }
    tx.set_cursor(point)?;
    Ok(true)
}

fn execute_insert_component(tx: &mut Transaction<'_>, component: &NewComponent) -> Result<bool> {
    let cursor = collapse(tx)?;
    let anchor = block_of(tx.tree(), &cursor.component);
    let point = CursorPoint::new(component.first_leaf(), 0);

    let replace_empty = paragraph(tx.tree(), &anchor)
        .is_some_and(|p| p.is_empty() && p.paragraph_type == ParagraphType::Paragraph);
    if replace_empty {
        let tree = tx.tree();
        let (Some(container), Some(index)) =
            (tree.container_of(&anchor), tree.index_in_section(&anchor))
        else {
            return Err(carta_core::EditorError::ComponentNotFound(anchor));
        };
        let ops = component.insert_ops(container, index, None)?;
        tx.apply(ops)?;
        delete_component(tx, &anchor, Some(point.clone()))?;
    } else {
        insert_after(tx, &anchor, component, Some(point.clone()))?;
    }
    tx.set_cursor(point)?;
    Ok(true)
}

// === Deletion ===

fn execute_delete_backward(tx: &mut Transaction<'_>) -> Result<bool> {
    if tx.selection().is_range() {
        delete_selection(tx)?;
        return Ok(true);
    }
    let cursor = tx.selection().start().clone();
    let id = cursor.component.clone();

    let Some(current) = paragraph(tx.tree(), &id) else {
        let point = neighbour_cursor(tx.tree(), &id);
        delete_component(tx, &id, point)?;
        return Ok(true);
    };

    if cursor.offset > 0 {
        remove_chars(tx, &id, cursor.offset - 1, 1)?;
        return Ok(true);
    }
    if is_inline(tx.tree(), &id) {
        return Ok(false);
    }
    let (text, formats) = tail(current, 0);
    let empty = current.is_empty();

    let Some(prev) = tx.tree().previous_component(&id) else {
        return Ok(false);
    };
    match paragraph(tx.tree(), &prev).map(Paragraph::len) {
        Some(prev_len) => {
            let point = CursorPoint::new(prev.clone(), prev_len);
            append_into(tx, &prev, &text, &formats)?;
            delete_component(tx, &id, Some(point.clone()))?;
            tx.set_cursor(point)?;
        }
        None if empty => {
            // An empty paragraph after media goes away; the cursor lands on the media.
            let point = CursorPoint::new(prev.clone(), tx.tree().length(&prev));
            delete_component(tx, &id, Some(point.clone()))?;
            tx.set_cursor(point)?;
        }
        None => {
            let point = CursorPoint::new(id.clone(), 0);
            delete_component(tx, &prev, Some(point.clone()))?;
            tx.set_cursor(point)?;
        }
    }
    Ok(true)
}

fn execute_delete_forward(tx: &mut Transaction<'_>) -> Result<bool> {
    if tx.selection().is_range() {
        delete_selection(tx)?;
        return Ok(true);
    }
    let cursor = tx.selection().start().clone();
    let id = cursor.component.clone();

    let Some(current) = paragraph(tx.tree(), &id) else {
        let point = tx
            .tree()
            .next_component(&id)
            .map(|next| CursorPoint::new(next, 0))
            .or_else(|| neighbour_cursor(tx.tree(), &id));
        delete_component(tx, &id, point)?;
        return Ok(true);
    };

    let len = current.len();
    if cursor.offset < len {
        remove_chars(tx, &id, cursor.offset, 1)?;
        return Ok(true);
    }
    if is_inline(tx.tree(), &id) {
        return Ok(false);
    }

    let Some(next) = tx.tree().next_component(&id) else {
        return Ok(false);
    };
    let point = CursorPoint::new(id.clone(), len);
    match paragraph(tx.tree(), &next).map(|p| tail(p, 0)) {
        Some((text, formats)) => {
            append_into(tx, &id, &text, &formats)?;
            delete_component(tx, &next, Some(point.clone()))?;
        }
        None => {
            delete_component(tx, &next, Some(point.clone()))?;
        }
    }
    tx.set_cursor(point)?;
    Ok(true)
}

fn execute_delete_word_backward(tx: &mut Transaction<'_>) -> Result<bool> {
    if tx.selection().is_range() {
        delete_selection(tx)?;
        return Ok(true);
    }
    let cursor = tx.selection().start().clone();
    let start = match paragraph(tx.tree(), &cursor.component) {
        Some(p) if cursor.offset > 0 => find_word_boundary_backward(&p.text, cursor.offset),
        _ => return execute_delete_backward(tx),
    };
    remove_chars(tx, &cursor.component, start, cursor.offset - start)?;
    Ok(true)
}

fn execute_delete_word_forward(tx: &mut Transaction<'_>) -> Result<bool> {
    if tx.selection().is_range() {
        delete_selection(tx)?;
        return Ok(true);
    }
    let cursor = tx.selection().start().clone();
    let end = match paragraph(tx.tree(), &cursor.component) {
        Some(p) if cursor.offset < p.len() => find_word_boundary_forward(&p.text, cursor.offset),
        _ => return execute_delete_forward(tx),
    };
    remove_chars(tx, &cursor.component, cursor.offset, end - cursor.offset)?;
    Ok(true)
}

// === Formatting ===

/// Text spans covered by the selection, one per paragraph.
fn selected_spans(tx: &Transaction<'_>) -> Vec<(ComponentId, usize, usize)> {
    let selection = tx.selection();
    let tree = tx.tree();
    selection
        .selected_components(tree)
        .into_iter()
        .filter_map(|id| {
            let len = paragraph(tree, &id)?.len();
            let from = if id == selection.start().component {
                selection.start().offset
            } else {
                0
            };
            let to = if id == selection.end().component {
                selection.end().offset
            } else {
                len
            };
            (from < to).then_some((id, from, to))
        })
        .collect()
}

fn execute_toggle_format(
    tx: &mut Transaction<'_>,
    format_type: FormatType,
    href: Option<SmolStr>,
) -> Result<bool> {
    let make = |from: usize, to: usize| match &href {
        Some(href) => Format::link(from, to, href.clone()),
        None => Format::new(format_type, from, to),
    };
    let start = tx.selection().start().clone();
    let end = tx.selection().end().clone();

    if tx.selection().is_collapsed() {
        // Toggle the word under the cursor, keeping the cursor where it is.
        let Some(p) = paragraph(tx.tree(), &start.component) else {
            return Ok(false);
        };
        let (from, to) = word_at(&p.text, start.offset);
        if from == to {
            return Ok(false);
        }
        let ops = tx.tree().format_ops(&start.component, make(from, to))?;
        tx.apply(ops)?;
        tx.set_cursor(start)?;
        return Ok(true);
    }

    let spans = selected_spans(tx);
    if spans.is_empty() {
        return Ok(false);
    }
    let covered = |tree: &ComponentTree, (id, from, to): &(ComponentId, usize, usize)| {
        paragraph(tree, id).is_some_and(|p| is_fully_formatted(&p.formats, *from, *to, format_type))
    };
    // Formatted everywhere: remove. Otherwise add where missing.
    let remove = spans.iter().all(|span| covered(tx.tree(), span));
    for span in &spans {
        if remove || !covered(tx.tree(), span) {
            let (id, from, to) = span;
            let ops = tx.tree().format_ops(id, make(*from, *to))?;
            tx.apply(ops)?;
        }
    }
    tx.select(start, end)?;
    Ok(true)
}

fn execute_set_paragraph_type(tx: &mut Transaction<'_>, paragraph_type: ParagraphType) -> Result<bool> {
    let start = tx.selection().start().clone();
    let end = tx.selection().end().clone();
    let value = serde_json::to_value(paragraph_type)?;

    let targets: Vec<ComponentId> = tx
        .selection()
        .selected_components(tx.tree())
        .into_iter()
        .filter(|id| !is_inline(tx.tree(), id))
        .filter(|id| {
            paragraph(tx.tree(), id).is_some_and(|p| p.paragraph_type != paragraph_type)
        })
        .collect();
    if targets.is_empty() {
        return Ok(false);
    }
    for id in &targets {
        let mut attrs = carta_core::Attrs::new();
        attrs.insert("paragraphType".into(), value.clone());
        let ops = tx.tree().update_ops(
            id,
            carta_core::ComponentUpdate {
                attrs: Some(attrs),
                ..Default::default()
            },
        )?;
        tx.apply(ops)?;
    }
    tx.select(start, end)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use carta_core::{Article, ComponentKind, Loader, Section};

    use super::*;

    fn article(texts: &[(&str, &str)]) -> Article {
        let children = texts
            .iter()
            .map(|(name, text)| NewComponent::paragraph(Paragraph::new(text)).with_name(*name))
            .collect();
        let section = NewComponent::new(ComponentKind::Section(Section::default()))
            .with_name("s")
            .with_children(children);
        Article::from_components(Arc::new(Loader::default()), "article".into(), vec![section]).unwrap()
    }

    fn run(article: &mut Article, action: EditorAction) -> bool {
        let mut tx = article.begin();
        let applied = execute_action(&mut tx, &action).unwrap();
        tx.commit();
        applied
    }

    fn texts(article: &Article) -> Vec<String> {
        article
            .tree()
            .leaves()
            .iter()
            .map(|id| article.paragraph(id).unwrap().text_string())
            .collect()
    }

    #[test]
    fn test_insert() {
        let mut article = article(&[("p", "hello")]);
        article.set_cursor(CursorPoint::new("p", 5)).unwrap();
        assert!(run(&mut article, EditorAction::Insert { text: " world".into() }));
        assert_eq!(texts(&article), vec!["hello world"]);
        assert_eq!(article.selection().start().offset, 11);
    }

    #[test]
    fn test_delete_backward() {
        let mut article = article(&[("p", "hello")]);
        article.set_cursor(CursorPoint::new("p", 5)).unwrap();
        assert!(run(&mut article, EditorAction::DeleteBackward));
        assert_eq!(texts(&article), vec!["hell"]);
    }

    #[test]
    fn test_delete_selection_across_paragraphs() {
        let mut article = article(&[("a", "hello"), ("b", "middle"), ("c", "world")]);
        article
            .select(CursorPoint::new("a", 2), CursorPoint::new("c", 3))
            .unwrap();
        assert!(run(&mut article, EditorAction::DeleteBackward));
        assert_eq!(texts(&article), vec!["held"]);
        assert_eq!(article.selection().start(), &CursorPoint::new("a", 2));
    }

    #[test]
    fn test_backspace_at_start_does_nothing_in_first_paragraph() {
        let mut article = article(&[("p", "x")]);
        assert!(!run(&mut article, EditorAction::DeleteBackward));
        assert_eq!(article.history_len(), 0);
    }

    #[test]
    fn test_delete_word_backward() {
        let mut article = article(&[("p", "hello world")]);
        article.set_cursor(CursorPoint::new("p", 11)).unwrap();
        assert!(run(&mut article, EditorAction::DeleteWordBackward));
        assert_eq!(texts(&article), vec!["hello "]);
    }

    #[test]
    fn test_toggle_bold_on_word_under_cursor() {
        let mut article = article(&[("p", "hello world")]);
        article.set_cursor(CursorPoint::new("p", 8)).unwrap();
        assert!(run(&mut article, EditorAction::ToggleBold));
        let p = article.paragraph(&"p".into()).unwrap();
        assert_eq!(p.formats, vec![Format::new(FormatType::Bold, 6, 11)]);
        assert!(article.selection().is_collapsed());
    }
}
