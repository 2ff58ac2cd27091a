// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bracken Router: the input-routing engine of an op-stream-driven scene.
//!
//! ## Overview
//!
//! Each frame, the application declares input regions and handler
//! registrations as a sequence of [`SceneOp`] records (supplied, already
//! typed, by the op-stream decoder). [`Router::frame`] consumes that stream
//! once: it rebuilds the hit-testing structures, reconciles the pointer and
//! key handler sets, resolves focus and grabs, and re-synthesizes
//! enter/leave for stationary pointers. Between frames, raw input pushed
//! through [`Router::push`] routes immediately against last frame's
//! structures, and handlers drain what they received with
//! [`Router::events`].
//!
//! The platform layer reads the router's outputs after each frame or input
//! batch: the active [`Cursor`], the [`KeyboardVisibility`] transition
//! (`Keep` means no call), the focused handler's [`InputHint`], the earliest
//! requested wake time, and whether a redraw is warranted.
//!
//! ## Minimal example
//!
//! ```rust
//! use bracken_router::{Event, Router, SceneOp};
//! use bracken_router::{PointerEvent, PointerId, PointerKind, PointerMask, ScrollRange};
//! use bracken_router::AreaKind;
//! use kurbo::{Point, Rect};
//!
//! let mut router: Router<u32> = Router::new();
//! router
//!     .frame(&[
//!         SceneOp::PushScope,
//!         SceneOp::Area {
//!             kind: AreaKind::Rect,
//!             bounds: Rect::new(0.0, 0.0, 100.0, 100.0),
//!         },
//!         SceneOp::PointerHandler {
//!             tag: 1,
//!             wants_grab: false,
//!             mask: PointerMask::all(),
//!             scroll_range: ScrollRange::ZERO,
//!         },
//!         SceneOp::PopScope,
//!     ])
//!     .unwrap();
//!
//! router.push(Event::Pointer(PointerEvent::new(
//!     PointerKind::Move,
//!     PointerId(1),
//!     Point::new(50.0, 50.0),
//! )));
//! let events = router.events(1);
//! assert!(!events.is_empty());
//! ```
//!
//! ## Error handling
//!
//! Malformed op streams (unbalanced scopes, a cursor with no area) are
//! producer bugs: [`Router::frame`] fails with a [`BuildError`] and leaves
//! last frame's routing untouched, rather than silently misrouting input.
//! Runtime anomalies in raw input are absorbed as no-ops, and a handler
//! dropped for any reason is always sent a final `Cancel`.
//!
//! ## Concurrency
//!
//! Single-threaded and synchronous: `frame`, `push`, and `events` run to
//! completion on the caller's thread with no internal parallelism, blocking,
//! or re-entrant callbacks. The engine reports a desired wake time but never
//! schedules anything itself.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod ops;
mod router;

pub use ops::{Event, SceneOp, Timestamp};
pub use router::Router;

pub use bracken_hit_tree::{AreaKind, BuildError, Cursor};
pub use bracken_key::{
    EditorState, InputHint, Key, KeyEvent, KeyboardVisibility, Modifiers, NamedKey, Selection,
};
pub use bracken_pointer::{
    PointerEvent, PointerId, PointerKind, PointerMask, PointerPriority, PointerSource, ScrollRange,
};
