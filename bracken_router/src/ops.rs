// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene op records and the unified event type.

use bracken_hit_tree::{AreaKind, Cursor};
use bracken_key::{InputHint, KeyEvent};
use bracken_pointer::{PointerEvent, PointerMask, ScrollRange};
use kurbo::{Affine, Rect};

/// Milliseconds since an arbitrary host epoch.
///
/// The engine never reads a clock; it only compares and reports timestamps.
pub type Timestamp = u64;

/// One record of a frame's scene op stream.
///
/// The binary encoding and decoding of these records is the producer's
/// concern; the router consumes them already typed, in declaration order,
/// once per frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SceneOp<T> {
    /// Compose an affine transform onto the current scope's transform.
    Transform(Affine),
    /// Enter a nested scope, saving transform, area chain, and pass flag.
    PushScope,
    /// Leave the current scope, restoring the saved state.
    PopScope,
    /// Push a hit-test shape onto the current area chain.
    Area {
        /// Shape kind.
        kind: AreaKind,
        /// Local bounds of the shape.
        bounds: Rect,
    },
    /// Set the scoped pass flag for subsequently declared nodes.
    PassThrough(bool),
    /// Attach a cursor to the current area.
    Cursor(Cursor),
    /// Declare a pointer handler at the current chain position.
    PointerHandler {
        /// The handler's identity.
        tag: T,
        /// Request to become a pressed device's sole participant.
        wants_grab: bool,
        /// Which pointer event kinds to deliver.
        mask: PointerMask,
        /// Scroll capacity per axis.
        scroll_range: ScrollRange,
    },
    /// Declare a key handler; declaration order is the frame's tab order.
    KeyHandler {
        /// The handler's identity.
        tag: T,
        /// What the handler edits.
        hint: InputHint,
    },
    /// Request a focus move (`Some`) or an explicit clear (`None`).
    FocusRequest(Option<T>),
    /// Request the soft keyboard shown or hidden.
    SoftKeyboard(bool),
    /// Request a wake no later than the given time; the earliest request of
    /// the frame wins.
    InvalidateAt(Timestamp),
}

/// A routed event: raw input on the way in, a delivery on the way out.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A pointer event.
    Pointer(PointerEvent),
    /// A key or focus event.
    Key(KeyEvent),
}
