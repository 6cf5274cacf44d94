//! Execution of single op specs against the arena.
//!
//! Each executor validates before it mutates, so a failing spec leaves the
//! tree untouched and the enclosing batch can be reverted cleanly.

use serde_json::Value;
use tracing::{trace, warn};

use crate::article::Article;
use crate::components::{
    Attrs, CAPTION_FORMATS_KEY, CAPTION_KEY, Component, ComponentKind, caption_from_attrs,
};
use crate::error::{EditorError, Result};
use crate::format::Format;
use crate::id::ComponentId;
use crate::operation::OpSpec;
use crate::platform::ViewError;
use crate::selection::CursorPoint;

impl Article {
    /// Execute one half of an operation.
    pub(crate) fn exec(&mut self, spec: &OpSpec) -> Result<()> {
        trace!(op = spec.name(), component = %spec.component(), "exec");
        match spec {
            OpSpec::InsertChars {
                component,
                index,
                value,
                formats,
                cursor_offset,
            } => {
                let paragraph = self.tree.text_component_mut(component, "insertChars")?;
                bounds(component, *index, paragraph.len())?;
                paragraph.insert_chars(*index, value);
                if let Some(formats) = formats {
                    paragraph.formats = formats.clone();
                }
                self.notify_updated(component);
                self.cursor_after(component, *cursor_offset, None);
            }
            OpSpec::RemoveChars {
                component,
                index,
                count,
                formats,
                cursor_offset,
            } => {
                let paragraph = self.tree.text_component_mut(component, "removeChars")?;
                bounds(component, *index + *count, paragraph.len())?;
                paragraph.remove_chars(*index, *count);
                if let Some(formats) = formats {
                    paragraph.formats = formats.clone();
                }
                self.notify_updated(component);
                self.cursor_after(component, *cursor_offset, None);
            }
            OpSpec::UpdateComponent {
                component,
                value,
                formats,
                attrs,
                cursor_offset,
                select_range,
            } => {
                self.update_component(component, value.as_deref(), formats.as_deref(), attrs.as_ref())?;
                self.notify_updated(component);
                self.cursor_after(component, *cursor_offset, *select_range);
            }
            OpSpec::DeleteComponent { component, cursor } => {
                self.tree.detach(component)?;
                self.notify_removed(component);
                if let Some(cursor) = cursor {
                    self.move_cursor(cursor, None);
                }
            }
            OpSpec::InsertComponent {
                component,
                component_class,
                section,
                index,
                attrs,
                cursor,
            } => {
                let kind = self.loader.build(component_class, attrs)?;
                let caption = kind.has_caption().then(|| caption_from_attrs(attrs));
                if caption.is_some() && self.tree.contains(&component.caption()) {
                    return Err(EditorError::AlreadyAttached(component.caption()));
                }
                self.tree
                    .attach(Component::new(component.clone(), kind), section, *index)?;
                if let Some(caption) = caption {
                    self.tree.attach_inline(Component::caption(component, caption))?;
                }
                self.notify_inserted(component);
                if let Some(cursor) = cursor {
                    self.move_cursor(cursor, None);
                }
            }
        }
        Ok(())
    }

    fn update_component(
        &mut self,
        component: &ComponentId,
        value: Option<&str>,
        formats: Option<&[Format]>,
        attrs: Option<&Attrs>,
    ) -> Result<()> {
        // Resolve everything fallible before mutating.
        if value.is_some() || formats.is_some() {
            self.tree.text_component(component, "updateComponent")?;
        }
        let rebuilt = match attrs {
            Some(attrs) => Some(self.rebuild_from_attrs(component, attrs)?),
            None => None,
        };

        if let Some((kind, caption)) = rebuilt {
            self.tree.component_mut(component)?.replace_kind(kind);
            if let Some(caption) = caption {
                let paragraph = self
                    .tree
                    .text_component_mut(&component.caption(), "updateComponent")?;
                if let Some(text) = caption.text {
                    paragraph.set_text(&text);
                }
                if let Some(formats) = caption.formats {
                    paragraph.formats = formats;
                }
            }
        }
        if value.is_some() || formats.is_some() {
            let paragraph = self.tree.text_component_mut(component, "updateComponent")?;
            if let Some(value) = value {
                paragraph.set_text(value);
            }
            for format in formats.unwrap_or_default() {
                paragraph.apply_format(format.clone());
            }
        }
        Ok(())
    }

    /// Merge `attrs` over the current attributes and rebuild the variant
    /// through the loader. Caption keys are split off.
    fn rebuild_from_attrs(
        &self,
        component: &ComponentId,
        attrs: &Attrs,
    ) -> Result<(ComponentKind, Option<CaptionUpdate>)> {
        let node = self.tree.component(component)?;
        let mut merged = node.kind().attrs()?;
        for (key, value) in attrs {
            if key != CAPTION_KEY && key != CAPTION_FORMATS_KEY {
                merged.insert(key.clone(), value.clone());
            }
        }
        let kind = self.loader.build(node.class_name(), &merged)?;

        let touches_caption =
            attrs.contains_key(CAPTION_KEY) || attrs.contains_key(CAPTION_FORMATS_KEY);
        if !touches_caption || !node.kind().has_caption() {
            return Ok((kind, None));
        }
        let text = attrs
            .get(CAPTION_KEY)
            .and_then(Value::as_str)
            .map(str::to_string);
        let formats = match attrs.get(CAPTION_FORMATS_KEY) {
            Some(Value::Null) | None => None,
            Some(value) => Some(serde_json::from_value(value.clone())?),
        };
        Ok((kind, Some(CaptionUpdate { text, formats })))
    }

    fn cursor_after(&mut self, component: &ComponentId, offset: Option<usize>, range: Option<usize>) {
        if let Some(offset) = offset {
            let point = CursorPoint::new(component.clone(), offset);
            self.move_cursor(&point, range.map(|r| offset + r));
        }
    }

    fn notify_inserted(&mut self, id: &ComponentId) {
        if let Err(err) = self.view.inserted(&self.tree, id) {
            warn!(component = %id, error = %err, "view failed to mirror an insert");
        }
    }

    fn notify_updated(&mut self, id: &ComponentId) {
        if let Err(err) = self.view.updated(&self.tree, id) {
            warn!(component = %id, error = %err, "view failed to mirror an update");
        }
    }

    fn notify_removed(&mut self, id: &ComponentId) {
        match self.view.removed(id) {
            Ok(()) => {}
            Err(ViewError::AlreadyDetached(_)) => {
                warn!(component = %id, "view was already detached by the platform");
            }
            Err(err) => {
                warn!(component = %id, error = %err, "view failed to mirror a removal");
            }
        }
    }
}

/// Caption part of an attribute update.
struct CaptionUpdate {
    text: Option<String>,
    formats: Option<Vec<Format>>,
}

fn bounds(component: &ComponentId, index: usize, len: usize) -> Result<()> {
    if index > len {
        return Err(EditorError::IndexOutOfBounds {
            component: component.clone(),
            index,
            len,
        });
    }
    Ok(())
}
