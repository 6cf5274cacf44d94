//! Debounced native input.
//!
//! Native text input lands in the view before the model hears about it.
//! Rather than one transaction per keystroke, the latest view text of the
//! edited paragraph is buffered here and flushed as a single transaction
//! once input pauses, or right away when something incompatible arrives.
//! Only contiguous edits of one kind share a run: typing at a second spot
//! in the same paragraph starts a new one.

use std::ops::Range;
use std::time::Duration;

use carta_core::ComponentId;
use web_time::Instant;

/// Direction of a buffered edit. Runs of the same kind coalesce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    Insert,
    Remove,
    /// Spell-check corrections and similar; never coalesced.
    Replace,
}

/// View text waiting to be turned into ops.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingInput {
    pub component: ComponentId,
    pub kind: InputKind,
    /// The full text the view shows for `component`.
    pub text: String,
    /// Chars of `text` the run has touched. Collapsed for removals.
    pub span: Range<usize>,
    pub started_at: Instant,
    pub updated_at: Instant,
}

impl PendingInput {
    fn new(
        component: ComponentId,
        kind: InputKind,
        text: String,
        edit: Range<usize>,
        now: Instant,
    ) -> Self {
        let span = match kind {
            InputKind::Remove => edit.start..edit.start,
            InputKind::Insert | InputKind::Replace => edit,
        };
        Self {
            component,
            kind,
            text,
            span,
            started_at: now,
            updated_at: now,
        }
    }

    /// Grow the run by `edit` if it continues where the run left off.
    fn absorb(&mut self, component: &ComponentId, kind: InputKind, edit: &Range<usize>) -> bool {
        if &self.component != component || self.kind != kind {
            return false;
        }
        match kind {
            InputKind::Insert if edit.start == self.span.end => {
                self.span.end = edit.end;
                true
            }
            // Backspace walks left, forward delete stays put.
            InputKind::Remove if edit.end == self.span.start => {
                self.span = edit.start..edit.start;
                true
            }
            InputKind::Remove => edit.start == self.span.start,
            _ => false,
        }
    }
}

#[derive(Debug)]
pub struct InputCoalescer {
    window: Duration,
    pending: Option<PendingInput>,
}

impl InputCoalescer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn pending(&self) -> Option<&PendingInput> {
        self.pending.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Buffer new view text. `edit` is the char range the change covers:
    /// the inserted chars in `text`, or the removed chars in the text before.
    ///
    /// If the previous run cannot absorb it, that run is returned and must
    /// be flushed before this one.
    pub fn push(
        &mut self,
        component: ComponentId,
        kind: InputKind,
        text: String,
        edit: Range<usize>,
        now: Instant,
    ) -> Option<PendingInput> {
        if let Some(pending) = &mut self.pending {
            if pending.absorb(&component, kind, &edit) {
                pending.text = text;
                pending.updated_at = now;
                return None;
            }
        }
        self.pending
            .replace(PendingInput::new(component, kind, text, edit, now))
    }

    /// Whether the buffered run has been quiet for a full window.
    pub fn is_due(&self, now: Instant) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|p| now.saturating_duration_since(p.updated_at) >= self.window)
    }

    /// Take the buffered run if it is due.
    pub fn take_due(&mut self, now: Instant) -> Option<PendingInput> {
        if self.is_due(now) {
            self.pending.take()
        } else {
            None
        }
    }

    /// Take the buffered run regardless of timing.
    pub fn take(&mut self) -> Option<PendingInput> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_same_kind_coalesces() {
        let t0 = Instant::now();
        let mut input = InputCoalescer::new(ms(300));
        assert!(input.push("p".into(), InputKind::Insert, "h".into(), 0..1, t0).is_none());
        assert!(input.push("p".into(), InputKind::Insert, "he".into(), 1..2, t0 + ms(100)).is_none());

        assert!(!input.is_due(t0 + ms(350)));
        assert!(input.is_due(t0 + ms(400)));
        let pending = input.take_due(t0 + ms(400)).unwrap();
        assert_eq!(pending.text, "he");
        assert_eq!(pending.started_at, t0);
        assert!(!input.is_pending());
    }

    #[test]
    fn test_switching_kind_hands_back_previous_run() {
        let t0 = Instant::now();
        let mut input = InputCoalescer::new(ms(300));
        input.push("p".into(), InputKind::Insert, "hey".into(), 0..3, t0);
        let flushed = input.push("p".into(), InputKind::Remove, "he".into(), 2..3, t0 + ms(10));
        assert_eq!(flushed.map(|p| p.text).as_deref(), Some("hey"));
        assert_eq!(input.pending().map(|p| p.kind), Some(InputKind::Remove));
    }

    #[test]
    fn test_other_component_hands_back_previous_run() {
        let t0 = Instant::now();
        let mut input = InputCoalescer::new(ms(300));
        input.push("a".into(), InputKind::Insert, "x".into(), 0..1, t0);
        let flushed = input.push("b".into(), InputKind::Insert, "y".into(), 0..1, t0);
        assert_eq!(flushed.map(|p| p.component), Some(ComponentId::new("a")));
    }

    #[test]
    fn test_replacements_never_coalesce() {
        let t0 = Instant::now();
        let mut input = InputCoalescer::new(ms(300));
        input.push("p".into(), InputKind::Replace, "the".into(), 0..3, t0);
        assert!(input
            .push("p".into(), InputKind::Replace, "then".into(), 3..4, t0)
            .is_some());
    }

    #[test]
    fn test_typing_elsewhere_starts_a_new_run() {
        let t0 = Instant::now();
        let mut input = InputCoalescer::new(ms(300));
        input.push("p".into(), InputKind::Insert, "Xab".into(), 0..1, t0);
        let flushed = input.push("p".into(), InputKind::Insert, "XabY".into(), 3..4, t0);
        assert_eq!(flushed.map(|p| p.text).as_deref(), Some("Xab"));
        assert_eq!(input.pending().map(|p| p.span.clone()), Some(3..4));
    }

    #[test]
    fn test_backspace_and_delete_runs() {
        let t0 = Instant::now();
        let mut input = InputCoalescer::new(ms(300));
        input.push("p".into(), InputKind::Remove, "abd".into(), 2..3, t0);
        assert!(input.push("p".into(), InputKind::Remove, "ad".into(), 1..2, t0).is_none());
        assert!(input.push("p".into(), InputKind::Remove, "a".into(), 1..2, t0).is_none());
        assert_eq!(input.pending().map(|p| p.span.clone()), Some(1..1));
        assert!(input.push("p".into(), InputKind::Remove, "".into(), 0..1, t0).is_none());
        assert!(input
            .push("p".into(), InputKind::Insert, "z".into(), 0..1, t0)
            .is_some());
    }
}
