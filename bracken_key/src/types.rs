// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key events, input hints, and per-frame declarations.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Point;

/// A named, non-character key.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum NamedKey {
    /// Tab; intercepted by the router for focus navigation.
    Tab,
    /// Enter / Return.
    Enter,
    /// Escape.
    Escape,
    /// Space bar.
    Space,
    /// Backspace.
    Backspace,
    /// Forward delete.
    Delete,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
}

/// A key identity, as reported by the platform layer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Key {
    /// A key with a dedicated name.
    Named(NamedKey),
    /// A character-producing key, identified by its unmodified character.
    Char(char),
}

bitflags::bitflags! {
    /// Modifier keys held during a key press.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift; reverses tab navigation.
        const SHIFT = 1 << 0;
        /// Control.
        const CTRL = 1 << 1;
        /// Alt / Option.
        const ALT = 1 << 2;
        /// Meta / Command / Super.
        const META = 1 << 3;
    }
}

/// What kind of content the focused handler edits.
///
/// Forwarded to the platform layer so an on-screen keyboard can pick an
/// appropriate layout.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum InputHint {
    /// No particular content kind.
    #[default]
    Any,
    /// Free-form text.
    Text,
    /// Numeric input.
    Numeric,
    /// An email address.
    Email,
    /// A URL.
    Url,
    /// A telephone number.
    Telephone,
    /// A password; the platform may disable suggestions.
    Password,
}

/// Per-frame soft-keyboard decision reported to the platform layer.
///
/// `Keep` means no call is needed.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum KeyboardVisibility {
    /// Leave the soft keyboard as it is.
    #[default]
    Keep,
    /// Hide the soft keyboard.
    Close,
    /// Show the soft keyboard.
    Open,
}

/// A key event, raw or delivered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyEvent {
    /// A key went down.
    Press {
        /// Which key.
        key: Key,
        /// Modifiers held at the time.
        modifiers: Modifiers,
    },
    /// A text edit produced by the platform's input method.
    Edit(String),
    /// Focus state: synthesized on focus transitions, or forwarded verbatim
    /// when the platform reports a window focus change.
    Focus(bool),
}

/// A text selection, in the focused handler's own indexing.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub struct Selection {
    /// Selection start.
    pub start: usize,
    /// Selection end; equal to `start` for a plain caret.
    pub end: usize,
}

/// Cached edit state of the focused handler, for input-method placement.
///
/// Set by the host, cleared by the router on every focus change so a new
/// focus never sees its predecessor's selection.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct EditorState {
    /// Current selection.
    pub selection: Selection,
    /// Caret position in scene space.
    pub caret: Point,
}

/// One frame's declaration of a key handler, in declaration order.
///
/// Declaration order doubles as the frame's tab order.
#[derive(Copy, Clone, Debug)]
pub struct KeyDecl<T> {
    /// The handler's identity.
    pub tag: T,
    /// What the handler edits.
    pub hint: InputHint,
}

/// Everything the key router needs from one frame's op stream.
#[derive(Clone, Debug, Default)]
pub struct KeyFrame<T> {
    /// Handler declarations in op-stream order.
    pub decls: Vec<KeyDecl<T>>,
    /// Focus request: `Some(Some(tag))` to move, `Some(None)` to clear,
    /// `None` when the frame made no request.
    pub focus_request: Option<Option<T>>,
    /// Soft-keyboard request, latest declaration wins.
    pub keyboard: Option<bool>,
}

/// A single key event addressed to a single handler.
#[derive(Clone, Debug)]
pub struct KeyDelivery<T> {
    /// The receiving handler.
    pub tag: T,
    /// The event.
    pub event: KeyEvent,
    /// Whether this delivery warrants a redraw. The `Focus(false)` reset a
    /// handler receives on first sighting does not.
    pub redraw: bool,
}

impl<T> KeyDelivery<T> {
    /// A normal, redraw-warranting delivery.
    pub const fn new(tag: T, event: KeyEvent) -> Self {
        Self {
            tag,
            event,
            redraw: true,
        }
    }

    /// A delivery that should not force a redraw.
    pub const fn quiet(tag: T, event: KeyEvent) -> Self {
        Self {
            tag,
            event,
            redraw: false,
        }
    }
}
