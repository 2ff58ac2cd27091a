// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types: area identifiers, shape kinds, and cursors.

/// Index of an area in the current frame's arena.
///
/// Area identifiers are only meaningful against the [`HitMap`](crate::HitMap)
/// they were produced with; the arena is rebuilt from scratch every frame.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct AreaId(pub(crate) u32);

impl AreaId {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Area arenas are rebuilt per frame and never approach u32::MAX entries."
    )]
    pub(crate) const fn new(idx: usize) -> Self {
        Self(idx as u32)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Shape of a hit-test area, evaluated in the area's local space.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AreaKind {
    /// Axis-aligned rectangle; containment is half-open on the max edges.
    Rect,
    /// Ellipse inscribed in the declared bounds.
    Ellipse,
}

/// Cursor requested while the pointer is over an area.
///
/// The engine only resolves which cursor is active; mapping these names onto
/// platform cursors is the host's job.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum Cursor {
    /// The platform's default arrow cursor.
    #[default]
    Default,
    /// Pointing hand, for activatable elements.
    Pointer,
    /// Text selection caret.
    Text,
    /// Crosshair, for precise picking.
    Crosshair,
    /// Open hand, for draggable content.
    Grab,
    /// Closed hand, while dragging.
    Grabbing,
    /// Action not allowed.
    NotAllowed,
    /// Horizontal resize.
    EwResize,
    /// Vertical resize.
    NsResize,
}
