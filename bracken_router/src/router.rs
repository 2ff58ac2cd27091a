// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The router façade: drives both sub-routers and owns the event queues.

use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;

use bracken_hit_tree::{BuildError, Cursor, HitMap, HitMapBuilder};
use bracken_key::{
    EditorState, InputHint, KeyDecl, KeyDelivery, KeyFrame, KeyRouter, KeyboardVisibility,
};
use bracken_pointer::{HandlerDecl, PointerDelivery, PointerFrame, PointerRouter};
use hashbrown::HashMap;

use crate::ops::{Event, SceneOp, Timestamp};

/// Composes the pointer and key routers behind one interface.
///
/// Per frame: [`Router::frame`] consumes the scene op stream, rebuilds the
/// hit-testing structures, reconciles handler sets, and resolves focus.
/// Between frames: [`Router::push`] routes raw input against last frame's
/// structures, and [`Router::events`] drains what a handler received.
///
/// All methods run to completion on the caller's thread; callers must
/// serialize access.
pub struct Router<T> {
    pointer: PointerRouter<T>,
    key: KeyRouter<T>,
    queues: HashMap<T, Vec<Event>>,
    redraw: bool,
    wake: Option<Timestamp>,
    /// Last frame's retired hit map, recycled into the next build.
    spare_map: HitMap<T>,
    pointer_out: Vec<PointerDelivery<T>>,
    key_out: Vec<KeyDelivery<T>>,
}

impl<T> fmt::Debug for Router<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("pointer", &self.pointer)
            .field("key", &self.key)
            .field("queued", &self.queues.len())
            .field("redraw", &self.redraw)
            .field("wake", &self.wake)
            .finish_non_exhaustive()
    }
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Router<T> {
    /// Create an empty router.
    pub fn new() -> Self {
        Self {
            pointer: PointerRouter::new(),
            key: KeyRouter::new(),
            queues: HashMap::new(),
            redraw: false,
            wake: None,
            spare_map: HitMap::new(),
            pointer_out: Vec::new(),
            key_out: Vec::new(),
        }
    }

    /// The cursor for the most recent pointer position.
    pub fn cursor(&self) -> Cursor {
        self.pointer.cursor()
    }

    /// The soft-keyboard decision of the most recent frame.
    /// [`KeyboardVisibility::Keep`] means no platform call is needed.
    pub fn soft_keyboard(&self) -> KeyboardVisibility {
        self.key.visibility()
    }

    /// The cached edit state of the focused handler.
    pub fn editor_state(&self) -> EditorState {
        self.key.editor_state()
    }

    /// Whether anything happened since the last frame that warrants drawing
    /// a new one.
    pub fn redraw_needed(&self) -> bool {
        self.redraw
    }

    /// The earliest wake time requested by the last frame, if any.
    pub fn wake_at(&self) -> Option<Timestamp> {
        self.wake
    }
}

impl<T: Copy + Eq + Hash> Router<T> {
    /// The currently focused key handler, if any.
    pub fn focus(&self) -> Option<T> {
        self.key.focus()
    }

    /// The focused handler's input hint, and whether it changed since the
    /// last query.
    pub fn input_hint(&mut self) -> (InputHint, bool) {
        self.key.input_hint()
    }

    /// Cache edit state for a handler; ignored unless it is focused.
    pub fn set_editor_state(&mut self, tag: T, state: EditorState) {
        self.key.set_editor_state(tag, state);
    }

    /// Replace the declared handlers from one frame's op stream.
    ///
    /// The whole stream is staged before anything is committed: a malformed
    /// stream returns an error and leaves last frame's routing untouched.
    pub fn frame(&mut self, ops: &[SceneOp<T>]) -> Result<(), BuildError> {
        let mut builder = HitMapBuilder::reusing(core::mem::take(&mut self.spare_map));
        let mut pointer_decls = Vec::new();
        let mut key_decls = Vec::new();
        let mut focus_request = None;
        let mut keyboard = None;
        let mut wake = None;

        for op in ops {
            match *op {
                SceneOp::Transform(t) => builder.transform(t),
                SceneOp::PushScope => builder.push_scope(),
                SceneOp::PopScope => builder.pop_scope()?,
                SceneOp::Area { kind, bounds } => builder.area(kind, bounds),
                SceneOp::PassThrough(pass) => builder.pass_through(pass),
                SceneOp::Cursor(cursor) => builder.cursor(cursor)?,
                SceneOp::PointerHandler {
                    tag,
                    wants_grab,
                    mask,
                    scroll_range,
                } => {
                    let area = builder.handler(tag);
                    pointer_decls.push(HandlerDecl {
                        tag,
                        area,
                        wants_grab,
                        mask,
                        scroll_range,
                    });
                }
                SceneOp::KeyHandler { tag, hint } => key_decls.push(KeyDecl { tag, hint }),
                SceneOp::FocusRequest(tag) => focus_request = Some(tag),
                SceneOp::SoftKeyboard(show) => keyboard = Some(show),
                SceneOp::InvalidateAt(t) => {
                    wake = Some(wake.map_or(t, |w: Timestamp| w.min(t)));
                }
            }
        }
        let map = builder.finish()?;

        // Commit point: everything below is infallible.
        self.wake = wake;
        self.redraw = false;

        let mut out = core::mem::take(&mut self.pointer_out);
        out.clear();
        self.spare_map = self.pointer.frame(
            PointerFrame {
                map,
                decls: pointer_decls,
            },
            &mut out,
        );
        for d in &out {
            self.file(d.tag, Event::Pointer(d.event), d.redraw);
        }
        self.pointer_out = out;

        let mut out = core::mem::take(&mut self.key_out);
        out.clear();
        self.key.frame(
            KeyFrame {
                decls: key_decls,
                focus_request,
                keyboard,
            },
            &mut out,
        );
        for d in out.drain(..) {
            let redraw = d.redraw;
            self.file(d.tag, Event::Key(d.event), redraw);
        }
        self.key_out = out;

        Ok(())
    }

    /// Route one raw input event against last frame's structures.
    ///
    /// Returns whether any handler received something.
    pub fn push(&mut self, event: Event) -> bool {
        match event {
            Event::Pointer(e) => {
                let mut out = core::mem::take(&mut self.pointer_out);
                out.clear();
                self.pointer.push(e, &mut out);
                let matched = !out.is_empty();
                for d in &out {
                    self.file(d.tag, Event::Pointer(d.event), d.redraw);
                }
                self.pointer_out = out;
                matched
            }
            Event::Key(e) => {
                let mut out = core::mem::take(&mut self.key_out);
                out.clear();
                self.key.push(e, &mut out);
                let matched = !out.is_empty();
                for d in out.drain(..) {
                    let redraw = d.redraw;
                    self.file(d.tag, Event::Key(d.event), redraw);
                }
                self.key_out = out;
                matched
            }
        }
    }

    /// Drain and clear the events queued for a handler.
    ///
    /// A non-empty drain re-arms the redraw signal: delivery typically
    /// changes consumer state that the next frame has to reflect.
    pub fn events(&mut self, tag: T) -> Vec<Event> {
        let Some(queue) = self.queues.get_mut(&tag) else {
            return Vec::new();
        };
        let drained = core::mem::take(queue);
        if !drained.is_empty() {
            self.redraw = true;
        }
        drained
    }

    fn file(&mut self, tag: T, event: Event, redraw: bool) {
        self.queues.entry(tag).or_default().push(event);
        if redraw {
            self.redraw = true;
        }
    }
}
