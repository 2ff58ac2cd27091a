// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key router implementation.
//!
//! Focus persists across frames; the soft-keyboard decision is transient and
//! resolved once per frame. Tab presses never reach handlers: they drive
//! focus through the frame's declaration order instead.

use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

use crate::types::{
    EditorState, InputHint, Key, KeyDelivery, KeyEvent, KeyFrame, KeyboardVisibility, Modifiers,
    NamedKey,
};

/// Persistent per-handler record, keyed by tag across frames.
#[derive(Clone, Debug)]
struct HandlerState {
    /// Declared in the current frame.
    visible: bool,
    /// First seen in the current frame.
    new: bool,
    hint: InputHint,
}

/// Routes key and focus input to the focused handler.
///
/// All methods run to completion on the caller's thread; the router performs
/// no internal synchronization and callers must serialize access.
pub struct KeyRouter<T> {
    focus: Option<T>,
    handlers: HashMap<T, HandlerState>,
    /// Tab order: this frame's declaration order.
    order: Vec<T>,
    visibility: KeyboardVisibility,
    hint: InputHint,
    editor: EditorState,
}

impl<T> fmt::Debug for KeyRouter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyRouter")
            .field("handlers", &self.handlers.len())
            .field("focused", &self.focus.is_some())
            .field("visibility", &self.visibility)
            .finish_non_exhaustive()
    }
}

impl<T> Default for KeyRouter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> KeyRouter<T> {
    /// Create a router with no handlers and no focus.
    pub fn new() -> Self {
        Self {
            focus: None,
            handlers: HashMap::new(),
            order: Vec::new(),
            visibility: KeyboardVisibility::Keep,
            hint: InputHint::Any,
            editor: EditorState::default(),
        }
    }

    /// The soft-keyboard decision of the most recent frame.
    pub fn visibility(&self) -> KeyboardVisibility {
        self.visibility
    }

    /// The cached edit state of the focused handler.
    pub fn editor_state(&self) -> EditorState {
        self.editor
    }
}

impl<T: Copy + Eq + Hash> KeyRouter<T> {
    /// The currently focused handler, if any.
    pub fn focus(&self) -> Option<T> {
        self.focus
    }

    /// The focused handler's input hint, and whether it changed since the
    /// last query.
    pub fn input_hint(&mut self) -> (InputHint, bool) {
        let Some(focus) = self.focus else {
            return (self.hint, false);
        };
        let Some(h) = self.handlers.get(&focus) else {
            return (self.hint, false);
        };
        let old = self.hint;
        self.hint = h.hint;
        (self.hint, old != self.hint)
    }

    /// Cache edit state for a handler; ignored unless it is focused.
    pub fn set_editor_state(&mut self, tag: T, state: EditorState) {
        if self.focus == Some(tag) {
            self.editor = state;
        }
    }

    /// Commit a new frame.
    ///
    /// Applies declarations (first sightings get a quiet `Focus(false)`
    /// reset unless they are about to receive focus), drops handlers that
    /// vanished (closing the keyboard if the focus went with them), applies
    /// the frame's soft-keyboard request, and resolves the focus request.
    /// A request naming a handler that is not live this frame is discarded.
    pub fn frame(&mut self, staged: KeyFrame<T>, out: &mut Vec<KeyDelivery<T>>) {
        self.visibility = KeyboardVisibility::Keep;
        for h in self.handlers.values_mut() {
            h.visible = false;
            h.new = false;
        }
        self.order.clear();
        if let Some(show) = staged.keyboard {
            self.visibility = if show {
                KeyboardVisibility::Open
            } else {
                KeyboardVisibility::Close
            };
        }

        for d in &staged.decls {
            match self.handlers.entry(d.tag) {
                Entry::Occupied(mut e) => {
                    let h = e.get_mut();
                    if !h.visible {
                        h.visible = true;
                        self.order.push(d.tag);
                    }
                    h.hint = d.hint;
                }
                Entry::Vacant(v) => {
                    v.insert(HandlerState {
                        visible: true,
                        new: true,
                        hint: d.hint,
                    });
                    self.order.push(d.tag);
                }
            }
        }

        let vanished: Vec<T> = self
            .handlers
            .iter()
            .filter(|(_, h)| !h.visible)
            .map(|(tag, _)| *tag)
            .collect();
        for tag in vanished {
            self.handlers.remove(&tag);
            if self.focus == Some(tag) {
                self.focus = None;
                self.visibility = KeyboardVisibility::Close;
            }
        }

        let mut request = staged.focus_request;
        if let Some(Some(tag)) = request {
            if !self.handlers.contains_key(&tag) {
                // A request naming a non-live tag is a producer slip, not a
                // frame failure: discard it.
                request = None;
            }
        }
        let incoming = request.flatten();

        // Reset handlers on first sighting, without forcing a redraw.
        // Declaration order keeps delivery deterministic.
        for &tag in &self.order {
            if self.handlers[&tag].new && incoming != Some(tag) {
                out.push(KeyDelivery::quiet(tag, KeyEvent::Focus(false)));
            }
        }

        if let Some(target) = request {
            self.change_focus(target, out);
        }
    }

    /// Route one raw key event.
    ///
    /// Tab presses are consumed for focus navigation; everything else
    /// forwards verbatim to the focused handler or is dropped.
    pub fn push(&mut self, event: KeyEvent, out: &mut Vec<KeyDelivery<T>>) {
        match event {
            KeyEvent::Press {
                key: Key::Named(NamedKey::Tab),
                modifiers,
            } => {
                self.tab_focus(modifiers.contains(Modifiers::SHIFT), out);
            }
            other => {
                if let Some(focus) = self.focus {
                    out.push(KeyDelivery::new(focus, other));
                }
            }
        }
    }

    /// Move focus one step through the frame's declaration order.
    fn tab_focus(&mut self, reverse: bool, out: &mut Vec<KeyDelivery<T>>) {
        let n = self.order.len();
        if n == 0 {
            return;
        }
        let current = self
            .focus
            .and_then(|f| self.order.iter().position(|t| *t == f));
        let next = match (current, reverse) {
            (Some(i), false) => (i + 1) % n,
            (Some(i), true) => (i + n - 1) % n,
            (None, false) => 0,
            (None, true) => n - 1,
        };
        self.change_focus(Some(self.order[next]), out);
    }

    /// Move focus, bracketing the change with `Focus(false)`/`Focus(true)`.
    fn change_focus(&mut self, target: Option<T>, out: &mut Vec<KeyDelivery<T>>) {
        if target == self.focus {
            return;
        }
        self.editor = EditorState::default();
        if let Some(old) = self.focus {
            out.push(KeyDelivery::new(old, KeyEvent::Focus(false)));
        }
        self.focus = target;
        match target {
            Some(tag) => out.push(KeyDelivery::new(tag, KeyEvent::Focus(true))),
            None => self.visibility = KeyboardVisibility::Close,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{KeyDecl, Selection};
    use alloc::string::ToString;
    use alloc::vec;
    use kurbo::Point;

    fn decls(tags: &[u32]) -> KeyFrame<u32> {
        KeyFrame {
            decls: tags
                .iter()
                .map(|&tag| KeyDecl {
                    tag,
                    hint: InputHint::Any,
                })
                .collect(),
            focus_request: None,
            keyboard: None,
        }
    }

    fn focus_events(out: &[KeyDelivery<u32>]) -> Vec<(u32, bool)> {
        out.iter()
            .filter_map(|d| match d.event {
                KeyEvent::Focus(f) => Some((d.tag, f)),
                _ => None,
            })
            .collect()
    }

    fn tab() -> KeyEvent {
        KeyEvent::Press {
            key: Key::Named(NamedKey::Tab),
            modifiers: Modifiers::empty(),
        }
    }

    fn shift_tab() -> KeyEvent {
        KeyEvent::Press {
            key: Key::Named(NamedKey::Tab),
            modifiers: Modifiers::SHIFT,
        }
    }

    #[test]
    fn first_sighting_gets_quiet_reset() {
        let mut r: KeyRouter<u32> = KeyRouter::new();
        let mut out = Vec::new();
        r.frame(decls(&[1, 2]), &mut out);
        assert_eq!(focus_events(&out), vec![(1, false), (2, false)]);
        assert!(out.iter().all(|d| !d.redraw));

        // Already-known handlers are not reset again.
        out.clear();
        r.frame(decls(&[1, 2]), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn focus_change_is_bracketed() {
        let mut r: KeyRouter<u32> = KeyRouter::new();
        let mut out = Vec::new();
        let mut frame = decls(&[1, 2]);
        frame.focus_request = Some(Some(1));
        r.frame(frame, &mut out);
        // Handler 1 is new but about to receive focus, so it skips the quiet
        // reset and gets the real Focus(true).
        assert_eq!(focus_events(&out), vec![(2, false), (1, true)]);
        assert_eq!(r.focus(), Some(1));

        out.clear();
        let mut frame = decls(&[1, 2]);
        frame.focus_request = Some(Some(2));
        r.frame(frame, &mut out);
        assert_eq!(focus_events(&out), vec![(1, false), (2, true)]);
        assert_eq!(r.focus(), Some(2));
    }

    #[test]
    fn refocusing_the_focused_handler_is_silent() {
        let mut r: KeyRouter<u32> = KeyRouter::new();
        let mut out = Vec::new();
        let mut frame = decls(&[1]);
        frame.focus_request = Some(Some(1));
        r.frame(frame, &mut out);

        out.clear();
        let mut frame = decls(&[1]);
        frame.focus_request = Some(Some(1));
        r.frame(frame, &mut out);
        assert!(out.is_empty());
        assert_eq!(r.focus(), Some(1));
    }

    #[test]
    fn dropping_the_focused_handler_closes_the_keyboard() {
        let mut r: KeyRouter<u32> = KeyRouter::new();
        let mut out = Vec::new();
        let mut frame = decls(&[1, 2]);
        frame.focus_request = Some(Some(1));
        r.frame(frame, &mut out);

        out.clear();
        r.frame(decls(&[2]), &mut out);
        assert_eq!(r.focus(), None);
        assert_eq!(r.visibility(), KeyboardVisibility::Close);
    }

    #[test]
    fn nonlive_focus_request_is_discarded() {
        let mut r: KeyRouter<u32> = KeyRouter::new();
        let mut out = Vec::new();
        let mut frame = decls(&[1]);
        frame.focus_request = Some(Some(1));
        r.frame(frame, &mut out);

        out.clear();
        let mut frame = decls(&[1]);
        frame.focus_request = Some(Some(99));
        r.frame(frame, &mut out);
        assert!(out.is_empty());
        assert_eq!(r.focus(), Some(1));
    }

    #[test]
    fn explicit_clear_forces_close() {
        let mut r: KeyRouter<u32> = KeyRouter::new();
        let mut out = Vec::new();
        let mut frame = decls(&[1]);
        frame.focus_request = Some(Some(1));
        r.frame(frame, &mut out);

        out.clear();
        let mut frame = decls(&[1]);
        frame.focus_request = Some(None);
        r.frame(frame, &mut out);
        assert_eq!(focus_events(&out), vec![(1, false)]);
        assert_eq!(r.focus(), None);
        assert_eq!(r.visibility(), KeyboardVisibility::Close);
    }

    #[test]
    fn tab_from_unfocused_lands_on_first() {
        let mut r: KeyRouter<u32> = KeyRouter::new();
        let mut out = Vec::new();
        r.frame(decls(&[10, 20, 30]), &mut out);

        out.clear();
        r.push(tab(), &mut out);
        assert_eq!(r.focus(), Some(10));
        assert_eq!(focus_events(&out), vec![(10, true)]);
    }

    #[test]
    fn tab_cycles_back_to_start() {
        let mut r: KeyRouter<u32> = KeyRouter::new();
        let mut out = Vec::new();
        r.frame(decls(&[10, 20, 30]), &mut out);

        for _ in 0..3 {
            r.push(tab(), &mut out);
        }
        assert_eq!(r.focus(), Some(30));
        r.push(tab(), &mut out);
        assert_eq!(r.focus(), Some(10));
    }

    #[test]
    fn shift_tab_goes_backward() {
        let mut r: KeyRouter<u32> = KeyRouter::new();
        let mut out = Vec::new();
        r.frame(decls(&[10, 20, 30]), &mut out);

        r.push(shift_tab(), &mut out);
        assert_eq!(r.focus(), Some(30));
        r.push(shift_tab(), &mut out);
        assert_eq!(r.focus(), Some(20));
    }

    #[test]
    fn tab_is_consumed_not_forwarded() {
        let mut r: KeyRouter<u32> = KeyRouter::new();
        let mut out = Vec::new();
        let mut frame = decls(&[1]);
        frame.focus_request = Some(Some(1));
        r.frame(frame, &mut out);

        out.clear();
        r.push(tab(), &mut out);
        // The focused handler is alone in the order, so the focus does not
        // move and nothing at all is delivered.
        assert!(out.is_empty());
        assert_eq!(r.focus(), Some(1));
    }

    #[test]
    fn tab_with_no_handlers_is_a_noop() {
        let mut r: KeyRouter<u32> = KeyRouter::new();
        let mut out = Vec::new();
        r.frame(KeyFrame::default(), &mut out);
        r.push(tab(), &mut out);
        assert!(out.is_empty());
        assert_eq!(r.focus(), None);
    }

    #[test]
    fn keys_forward_to_focus_or_drop() {
        let mut r: KeyRouter<u32> = KeyRouter::new();
        let mut out = Vec::new();
        r.frame(decls(&[1]), &mut out);

        // No focus: dropped.
        out.clear();
        r.push(
            KeyEvent::Press {
                key: Key::Char('a'),
                modifiers: Modifiers::empty(),
            },
            &mut out,
        );
        assert!(out.is_empty());

        let mut frame = decls(&[1]);
        frame.focus_request = Some(Some(1));
        r.frame(frame, &mut out);
        out.clear();
        r.push(KeyEvent::Edit("a".to_string()), &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].tag, 1);
        assert_eq!(out[0].event, KeyEvent::Edit("a".to_string()));
        assert!(out[0].redraw);
    }

    #[test]
    fn soft_keyboard_request_is_transient() {
        let mut r: KeyRouter<u32> = KeyRouter::new();
        let mut out = Vec::new();
        let mut frame = decls(&[1]);
        frame.focus_request = Some(Some(1));
        frame.keyboard = Some(true);
        r.frame(frame, &mut out);
        assert_eq!(r.visibility(), KeyboardVisibility::Open);

        r.frame(decls(&[1]), &mut out);
        assert_eq!(r.visibility(), KeyboardVisibility::Keep);
    }

    #[test]
    fn editor_state_is_cleared_on_focus_change() {
        let mut r: KeyRouter<u32> = KeyRouter::new();
        let mut out = Vec::new();
        let mut frame = decls(&[1, 2]);
        frame.focus_request = Some(Some(1));
        r.frame(frame, &mut out);

        let state = EditorState {
            selection: Selection { start: 2, end: 5 },
            caret: Point::new(10.0, 20.0),
        };
        r.set_editor_state(1, state);
        assert_eq!(r.editor_state(), state);
        // Setting through a non-focused tag is ignored.
        r.set_editor_state(2, EditorState::default());
        assert_eq!(r.editor_state(), state);

        r.push(tab(), &mut out);
        assert_eq!(r.editor_state(), EditorState::default());
    }

    #[test]
    fn input_hint_reports_changes_once() {
        let mut r: KeyRouter<u32> = KeyRouter::new();
        let mut out = Vec::new();
        let frame = KeyFrame {
            decls: vec![
                KeyDecl {
                    tag: 1,
                    hint: InputHint::Numeric,
                },
                KeyDecl {
                    tag: 2,
                    hint: InputHint::Any,
                },
            ],
            focus_request: Some(Some(1)),
            keyboard: None,
        };
        r.frame(frame, &mut out);

        assert_eq!(r.input_hint(), (InputHint::Numeric, true));
        assert_eq!(r.input_hint(), (InputHint::Numeric, false));

        r.push(tab(), &mut out);
        assert_eq!(r.input_hint(), (InputHint::Any, true));
    }
}
