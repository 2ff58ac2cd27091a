// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer events, masks, and per-frame declarations.

use alloc::vec::Vec;

use bracken_hit_tree::{AreaId, HitMap};
use kurbo::{Point, Vec2};

/// Identifier of a pointing device (mouse, touch point, pen tip).
///
/// Supplied by the platform layer; the router only compares ids.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub struct PointerId(pub u64);

/// What kind of hardware produced a pointer event.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum PointerSource {
    /// A mouse or mouse-like device that hovers.
    #[default]
    Mouse,
    /// A touch contact; it cannot hover, so it leaves when lifted.
    Touch,
    /// A pen tip.
    Pen,
}

/// Kind of a pointer event.
///
/// `Press`, `Release`, `Move`, `Scroll`, and `Cancel` arrive as raw input;
/// `Drag`, `Enter`, and `Leave` are synthesized by the router.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PointerKind {
    /// A button or contact went down.
    Press,
    /// A button or contact went up.
    Release,
    /// The pointer moved while not pressed.
    Move,
    /// The pointer moved while pressed (retyped from `Move`).
    Drag,
    /// A scroll wheel or gesture delta.
    Scroll,
    /// The pointer started hitting a handler's areas.
    Enter,
    /// The pointer stopped hitting a handler's areas.
    Leave,
    /// The interaction was abandoned; handlers must reset their state.
    Cancel,
}

impl PointerKind {
    /// The mask bit selecting this kind.
    ///
    /// `Cancel` is always delivered and never filtered, so its bit is only
    /// nominal.
    pub const fn mask(self) -> PointerMask {
        match self {
            Self::Press => PointerMask::PRESS,
            Self::Release => PointerMask::RELEASE,
            Self::Move => PointerMask::MOVE,
            Self::Drag => PointerMask::DRAG,
            Self::Scroll => PointerMask::SCROLL,
            Self::Enter => PointerMask::ENTER,
            Self::Leave => PointerMask::LEAVE,
            Self::Cancel => PointerMask::CANCEL,
        }
    }
}

bitflags::bitflags! {
    /// Which pointer event kinds a handler wants delivered.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct PointerMask: u8 {
        /// Deliver [`PointerKind::Press`].
        const PRESS = 1 << 0;
        /// Deliver [`PointerKind::Release`].
        const RELEASE = 1 << 1;
        /// Deliver [`PointerKind::Move`].
        const MOVE = 1 << 2;
        /// Deliver [`PointerKind::Drag`].
        const DRAG = 1 << 3;
        /// Deliver [`PointerKind::Scroll`].
        const SCROLL = 1 << 4;
        /// Deliver [`PointerKind::Enter`].
        const ENTER = 1 << 5;
        /// Deliver [`PointerKind::Leave`].
        const LEAVE = 1 << 6;
        /// Nominal bit for [`PointerKind::Cancel`]; cancels bypass the mask.
        const CANCEL = 1 << 7;
    }
}

/// Standing of a handler in a delivery, used for gesture arbitration.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum PointerPriority {
    /// One of several participants, not the frontmost.
    #[default]
    Shared,
    /// The frontmost participant of the event.
    Foremost,
    /// The sole participant of a pressed device.
    Grabbed,
}

/// Per-axis scroll capacity of a handler.
///
/// `min` is the most negative delta the handler can still consume on each
/// axis, `max` the most positive. A zero range consumes nothing.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct ScrollRange {
    /// Lower bounds per axis (usually non-positive).
    pub min: Vec2,
    /// Upper bounds per axis (usually non-negative).
    pub max: Vec2,
}

impl ScrollRange {
    /// A range that consumes no scrolling at all.
    pub const ZERO: Self = Self {
        min: Vec2::ZERO,
        max: Vec2::ZERO,
    };

    /// Range consuming horizontal deltas in `min..=max`.
    pub const fn horizontal(min: f64, max: f64) -> Self {
        Self {
            min: Vec2::new(min, 0.0),
            max: Vec2::new(max, 0.0),
        }
    }

    /// Range consuming vertical deltas in `min..=max`.
    pub const fn vertical(min: f64, max: f64) -> Self {
        Self {
            min: Vec2::new(0.0, min),
            max: Vec2::new(0.0, max),
        }
    }
}

/// A pointer event, raw or delivered.
///
/// Raw events carry scene-space positions; delivered events have their
/// position mapped into the receiving handler's local space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// What happened.
    pub kind: PointerKind,
    /// Which device it happened on.
    pub device: PointerId,
    /// What kind of hardware it came from.
    pub source: PointerSource,
    /// Position (scene space when raw, handler-local when delivered).
    pub position: Point,
    /// Scroll delta; zero except for [`PointerKind::Scroll`].
    pub scroll: Vec2,
    /// Delivery priority; ignored on raw input.
    pub priority: PointerPriority,
}

impl PointerEvent {
    /// A raw event of `kind` at `position` on `device`, from a mouse.
    pub fn new(kind: PointerKind, device: PointerId, position: Point) -> Self {
        Self {
            kind,
            device,
            source: PointerSource::Mouse,
            position,
            scroll: Vec2::ZERO,
            priority: PointerPriority::Shared,
        }
    }

    /// The cancel pseudo-event delivered when interactions are abandoned.
    pub fn cancel() -> Self {
        Self::new(PointerKind::Cancel, PointerId::default(), Point::ZERO)
    }

    /// Replace the source.
    pub fn with_source(mut self, source: PointerSource) -> Self {
        self.source = source;
        self
    }

    /// Replace the scroll delta.
    pub fn with_scroll(mut self, scroll: Vec2) -> Self {
        self.scroll = scroll;
        self
    }
}

/// One frame's declaration of a pointer handler, in declaration order.
#[derive(Copy, Clone, Debug)]
pub struct HandlerDecl<T> {
    /// The handler's identity.
    pub tag: T,
    /// The area the handler was declared under, if any.
    pub area: Option<AreaId>,
    /// Whether the handler asked to become a pressed device's sole
    /// participant.
    pub wants_grab: bool,
    /// Which event kinds the handler wants.
    pub mask: PointerMask,
    /// How much scrolling the handler can consume per axis.
    pub scroll_range: ScrollRange,
}

/// Everything the pointer router needs from one frame's op stream.
///
/// Built in full by the caller before being committed, so a failed frame
/// build never leaves the router with partial state.
#[derive(Debug)]
pub struct PointerFrame<T> {
    /// The frame's hit-testing structure.
    pub map: HitMap<T>,
    /// Handler declarations in op-stream order.
    pub decls: Vec<HandlerDecl<T>>,
}

/// A single event addressed to a single handler.
#[derive(Copy, Clone, Debug)]
pub struct PointerDelivery<T> {
    /// The receiving handler.
    pub tag: T,
    /// The event, with a handler-local position.
    pub event: PointerEvent,
    /// Whether this delivery warrants a redraw. The reset `Cancel` queued at
    /// a handler's first sighting does not.
    pub redraw: bool,
}

impl<T> PointerDelivery<T> {
    /// A normal, redraw-warranting delivery.
    pub const fn new(tag: T, event: PointerEvent) -> Self {
        Self {
            tag,
            event,
            redraw: true,
        }
    }

    /// A delivery that should not force a redraw.
    pub const fn quiet(tag: T, event: PointerEvent) -> Self {
        Self {
            tag,
            event,
            redraw: false,
        }
    }
}
