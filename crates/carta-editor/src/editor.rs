//! The editor: an article plus everything that turns user input into
//! transactions on it.

use std::sync::Arc;

use carta_core::{Article, ComponentId, Loader, UndoManager};
use tracing::{debug, trace, warn};
use web_time::Instant;

use crate::actions::{EditorAction, KeyCombo, KeybindingConfig, KeydownResult};
use crate::autoformat::AutoformatRegistry;
use crate::config::EditorConfig;
use crate::diff::TextDiff;
use crate::error::Result;
use crate::execute::execute_action;
use crate::input::{InputCoalescer, InputKind, PendingInput};

pub struct Editor {
    article: Article,
    config: EditorConfig,
    keybindings: KeybindingConfig,
    autoformat: AutoformatRegistry,
    input: InputCoalescer,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("article", self.article.name())
            .field("config", &self.config)
            .field("pending_input", &self.input.pending())
            .finish_non_exhaustive()
    }
}

impl Editor {
    /// A fresh article holding one empty paragraph.
    pub fn new(loader: Arc<Loader>, config: EditorConfig) -> Self {
        Self::with_article(Article::new(loader), config)
    }

    /// Edit an existing article. History limit and placeholder come from
    /// `config`.
    pub fn with_article(article: Article, config: EditorConfig) -> Self {
        let article = article
            .with_history_limit(config.history_limit)
            .with_placeholder(config.placeholder_text.clone());
        Self {
            article,
            keybindings: KeybindingConfig::default_for_platform(config.mac_keybindings),
            autoformat: AutoformatRegistry::with_builtin(),
            input: InputCoalescer::new(config.input_debounce()),
            config,
        }
    }

    pub fn article(&self) -> &Article {
        &self.article
    }

    /// Direct access to the article. Buffered input is not flushed first.
    pub fn article_mut(&mut self) -> &mut Article {
        &mut self.article
    }

    pub fn into_article(self) -> Article {
        self.article
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn keybindings(&self) -> &KeybindingConfig {
        &self.keybindings
    }

    pub fn keybindings_mut(&mut self) -> &mut KeybindingConfig {
        &mut self.keybindings
    }

    pub fn autoformat(&self) -> &AutoformatRegistry {
        &self.autoformat
    }

    pub fn autoformat_mut(&mut self) -> &mut AutoformatRegistry {
        &mut self.autoformat
    }

    pub fn has_pending_input(&self) -> bool {
        self.input.is_pending()
    }

    /// Snippet sized by the configured word budget.
    pub fn snippet(&self) -> String {
        self.article.snippet(self.config.snippet_words)
    }

    /// Route a keydown through the shortcut table.
    pub fn handle_keydown(&mut self, combo: &KeyCombo) -> Result<KeydownResult> {
        if let Some(action) = self.keybindings.lookup(combo).cloned() {
            trace!(%combo, ?action, "keybinding matched");
            self.execute(&action)?;
            return Ok(KeydownResult::Handled);
        }
        if combo.key.is_navigation() || combo.key.is_modifier() {
            return Ok(KeydownResult::PassThrough);
        }
        Ok(KeydownResult::NotHandled)
    }

    /// Run `action` as one undoable batch. Buffered input is flushed first
    /// so the action sees the text the user sees.
    ///
    /// Returns whether the article changed. On error nothing from the action
    /// is left applied.
    pub fn execute(&mut self, action: &EditorAction) -> Result<bool> {
        self.flush_input()?;
        let changed = match action {
            EditorAction::Undo => self.article.undo()?,
            EditorAction::Redo => self.article.redo()?,
            EditorAction::SelectAll => {
                self.article.select_all();
                true
            }
            _ => {
                let mut tx = self.article.begin();
                if !execute_action(&mut tx, action)? {
                    return Ok(false);
                }
                tx.commit()
            }
        };
        debug!(?action, changed, "executed action");
        Ok(changed)
    }

    /// Report the text the view now shows for `component` after native
    /// input. The change is buffered and turned into ops once input pauses.
    pub fn handle_input(&mut self, component: ComponentId, text: String, now: Instant) -> Result<()> {
        let previous = match self.input.pending() {
            Some(pending) if pending.component == component => pending.text.clone(),
            _ => self.article.paragraph(&component)?.text_string(),
        };
        let Some(diff) = TextDiff::compute(&previous, &text) else {
            return Ok(());
        };
        let (kind, edit) = match &diff {
            TextDiff::Inserted { index, text } => {
                (InputKind::Insert, *index..index + text.chars().count())
            }
            TextDiff::Removed { index, count } => (InputKind::Remove, *index..index + count),
            TextDiff::Replaced { index, count, .. } => (InputKind::Replace, *index..index + count),
        };
        trace!(%component, ?kind, ?edit, "buffered input");
        if let Some(stale) = self.input.push(component, kind, text, edit, now) {
            self.flush(stale)?;
        }
        Ok(())
    }

    /// Flush buffered input whose window has elapsed. Returns whether
    /// anything was committed.
    pub fn tick(&mut self, now: Instant) -> Result<bool> {
        match self.input.take_due(now) {
            Some(pending) => self.flush(pending),
            None => Ok(false),
        }
    }

    /// Flush buffered input now.
    pub fn flush_input(&mut self) -> Result<bool> {
        match self.input.take() {
            Some(pending) => self.flush(pending),
            None => Ok(false),
        }
    }

    fn flush(&mut self, pending: PendingInput) -> Result<bool> {
        let id = pending.component;
        let old = match self.article.paragraph(&id) {
            Ok(paragraph) => paragraph.text_string(),
            Err(err) => {
                warn!(component = %id, error = %err, "dropping input for a component that cannot take text");
                return Ok(false);
            }
        };
        let Some(diff) = TextDiff::compute(&old, &pending.text) else {
            return Ok(false);
        };

        let mut tx = self.article.begin();
        match &diff {
            TextDiff::Inserted { index, text } => {
                let ops = tx.tree().insert_chars_ops(&id, *index, text)?;
                tx.apply(ops)?;
            }
            TextDiff::Removed { index, count } => {
                let ops = tx.tree().remove_chars_ops(&id, *index, *count)?;
                tx.apply(ops)?;
            }
            TextDiff::Replaced { index, count, text } => {
                let ops = tx.tree().remove_chars_ops(&id, *index, *count)?;
                tx.apply(ops)?;
                let ops = tx.tree().insert_chars_ops(&id, *index, text)?;
                tx.apply(ops)?;
            }
        }
        tx.commit();
        debug!(component = %id, kind = ?pending.kind, ?diff, "flushed buffered input");

        if self.config.autoformat {
            let mut tx = self.article.begin();
            if self.autoformat.apply(&mut tx, &id)? {
                tx.commit();
                debug!(component = %id, "autoformatted");
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use carta_core::ParagraphType;

    use super::*;
    use crate::actions::Key;

    fn editor() -> Editor {
        Editor::new(Arc::new(Loader::default()), EditorConfig::default())
    }

    fn first(editor: &Editor) -> ComponentId {
        editor.article().tree().leaves()[0].clone()
    }

    #[test]
    fn test_input_is_flushed_after_the_window() {
        let mut editor = editor();
        let p = first(&editor);
        let t0 = Instant::now();
        editor.handle_input(p.clone(), "h".into(), t0).unwrap();
        editor.handle_input(p.clone(), "hi".into(), t0 + Duration::from_millis(100)).unwrap();
        assert!(editor.has_pending_input());
        assert!(!editor.tick(t0 + Duration::from_millis(200)).unwrap());
        assert!(editor.tick(t0 + Duration::from_millis(400)).unwrap());

        assert_eq!(editor.article().paragraph(&p).unwrap().text_string(), "hi");
        assert_eq!(editor.article().history_len(), 1);
    }

    #[test]
    fn test_autoformat_runs_as_its_own_batch() {
        let mut editor = editor();
        let p = first(&editor);
        editor.handle_input(p.clone(), "# Title".into(), Instant::now()).unwrap();
        editor.flush_input().unwrap();

        let paragraph = editor.article().paragraph(&p).unwrap();
        assert_eq!(paragraph.text_string(), "Title");
        assert_eq!(paragraph.paragraph_type, ParagraphType::MainHeader);
        assert_eq!(editor.article().history_len(), 2);

        editor.execute(&EditorAction::Undo).unwrap();
        let paragraph = editor.article().paragraph(&p).unwrap();
        assert_eq!(paragraph.text_string(), "# Title");
        assert_eq!(paragraph.paragraph_type, ParagraphType::Paragraph);
    }

    #[test]
    fn test_actions_flush_pending_input_first() {
        let mut editor = editor();
        let p = first(&editor);
        editor.handle_input(p.clone(), "ab".into(), Instant::now()).unwrap();
        editor.execute(&EditorAction::DeleteBackward).unwrap();
        assert_eq!(editor.article().paragraph(&p).unwrap().text_string(), "a");
        assert!(!editor.has_pending_input());
    }

    #[test]
    fn test_keydown_results() {
        let mut editor = editor();
        assert_eq!(
            editor.handle_keydown(&KeyCombo::new(Key::ArrowLeft)).unwrap(),
            KeydownResult::PassThrough
        );
        assert_eq!(
            editor.handle_keydown(&KeyCombo::new(Key::character("q"))).unwrap(),
            KeydownResult::NotHandled
        );
        assert_eq!(
            editor.handle_keydown(&KeyCombo::new(Key::Enter)).unwrap(),
            KeydownResult::Handled
        );
        assert_eq!(editor.article().tree().leaves().len(), 2);
    }
}
