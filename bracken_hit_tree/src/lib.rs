// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bracken Hit Tree: per-frame area stack and hit tree for declared input regions.
//!
//! ## Overview
//!
//! A scene declares input regions each frame as a stream of nested scopes,
//! transforms, and shapes. This crate flattens those declarations into two
//! arena-backed arrays — an area stack and a hit tree — that together answer
//! the question "which handlers contain point `p`, and in what order?".
//!
//! Both arrays are discarded and rebuilt every frame; there is no cross-frame
//! identity. Reset is O(1) truncation rather than graph bookkeeping, which is
//! why areas link to their parents by index instead of by pointer.
//!
//! ## Areas
//!
//! An [`AreaKind::Rect`] or [`AreaKind::Ellipse`] shape plus the cumulative
//! affine transform from scene space into its local space. Areas declared in
//! the same scope chain together, and a point must satisfy every shape on the
//! chain to count as inside (logical AND). An area may carry a [`Cursor`]
//! that becomes active while the pointer is over it.
//!
//! ## Hit tree
//!
//! Scope boundaries and handler leaves are appended to a single list in
//! declaration order. [`HitMap::hits_at`] scans that list from the most
//! recent entry backward, so the handler declared last — the frontmost one —
//! is reported first. Each node carries a pass flag; once an opaque node is
//! hit, the scan follows the node's chain upward instead of visiting covered
//! siblings, which is what makes an opaque descendant block everything
//! beneath it regardless of its ancestors' own flags.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use bracken_hit_tree::{AreaKind, HitMapBuilder};
//!
//! let mut b: HitMapBuilder<u32> = HitMapBuilder::new();
//! b.push_scope();
//! b.area(AreaKind::Rect, Rect::new(0.0, 0.0, 100.0, 100.0));
//! b.handler(1);
//! b.pop_scope().unwrap();
//! let map = b.finish().unwrap();
//!
//! let mut hits = Vec::new();
//! map.hits_at(Point::new(50.0, 50.0), &mut hits);
//! assert_eq!(hits, vec![1]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod map;
mod types;

pub use map::{BuildError, HitMap, HitMapBuilder};
pub use types::{AreaId, AreaKind, Cursor};
