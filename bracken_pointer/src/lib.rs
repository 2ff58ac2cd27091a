// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bracken Pointer: per-device pointer routing over a frame's hit tree.
//!
//! ## Overview
//!
//! The [`PointerRouter`] turns raw pointer input — press, move, release,
//! scroll, cancel — into ordered per-handler deliveries. Each frame the host
//! hands it a freshly built [`bracken_hit_tree::HitMap`] together with that
//! frame's handler declarations; between frames raw input routes immediately
//! against the most recent map.
//!
//! ## Interaction model
//!
//! - A *device* (mouse, touch point, pen tip) is tracked while it is pressed
//!   or hovering over at least one handler, and forgotten afterwards.
//! - A `Press` fixes the device's *participants* to the handlers under the
//!   press position, frontmost first. While the press lasts, moves (retyped
//!   [`PointerKind::Drag`]) never add participants; a `Release` returns the
//!   device to unrestricted hit testing.
//! - A handler declared with `wants_grab` becomes the sole participant of
//!   any pressed device holding it, at the end of the frame; every evicted
//!   participant receives [`PointerKind::Cancel`].
//! - [`PointerKind::Enter`]/[`PointerKind::Leave`] are synthesized from the
//!   difference between the previously entered set and the current hits, on
//!   every input and again at each frame for stationary pointers.
//! - Scroll deltas fan out across participants: each one clamps the
//!   remaining delta to its declared [`ScrollRange`] and passes the rest on.
//!
//! ## Delivery
//!
//! The router appends [`PointerDelivery`] records to a caller-owned buffer;
//! the host files them into per-handler queues. Deliveries marked quiet
//! (the reset `Cancel` a handler receives on first sighting) should not
//! force a redraw. `Cancel` is always delivered regardless of a handler's
//! event mask, so no handler is left believing it still owns input it lost.
//!
//! Handler tags are opaque, externally supplied identities compared by
//! identity only; use a small `Copy` handle.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod router;
mod types;

pub use router::PointerRouter;
pub use types::{
    HandlerDecl, PointerDelivery, PointerEvent, PointerFrame, PointerId, PointerKind, PointerMask,
    PointerPriority, PointerSource, ScrollRange,
};
