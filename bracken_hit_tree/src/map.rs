// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame construction and hit queries.

use alloc::vec::Vec;
use core::fmt;

use kurbo::{Affine, Point, Rect};

use crate::types::{AreaId, AreaKind, Cursor};

/// A hit-test area: a shape plus the cumulative transform into its local space.
///
/// Transforms are declared parent-relative in the op stream but stored
/// cumulative, so a single inverse maps a scene-space point into this area's
/// local space.
#[derive(Clone, Debug)]
struct AreaNode {
    transform: Affine,
    kind: AreaKind,
    bounds: Rect,
    cursor: Option<Cursor>,
    parent: Option<AreaId>,
}

impl AreaNode {
    fn shape_contains(&self, p: Point) -> bool {
        let b = self.bounds;
        match self.kind {
            AreaKind::Rect => p.x >= b.x0 && p.x < b.x1 && p.y >= b.y0 && p.y < b.y1,
            AreaKind::Ellipse => {
                let rx = b.width() / 2.0;
                let ry = b.height() / 2.0;
                let dx = p.x - b.x0 - rx;
                let dy = p.y - b.y0 - ry;
                // 0/0 is NaN, not <= 1, so a degenerate ellipse never hits.
                (dx * dx) / (rx * rx) + (dy * dy) / (ry * ry) <= 1.0
            }
        }
    }
}

/// One entry in the flattened hit tree.
///
/// `next` links a node to the entry that was current when it was appended:
/// the previous leaf in the same chain, or the enclosing scope boundary.
/// Following `next` instead of scanning backward is what skips the covered
/// siblings of an opaque hit.
#[derive(Clone, Debug)]
struct HitNode<T> {
    next: Option<usize>,
    area: Option<AreaId>,
    tag: Option<T>,
    pass: bool,
}

/// Per-frame hit-testing structure.
///
/// Built by [`HitMapBuilder`], queried until the next frame replaces it.
/// The tag type `T` is the externally supplied handler identity; it is
/// expected to be a small `Copy` handle compared by identity, never content.
#[derive(Clone)]
pub struct HitMap<T> {
    areas: Vec<AreaNode>,
    nodes: Vec<HitNode<T>>,
}

impl<T> fmt::Debug for HitMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HitMap")
            .field("areas", &self.areas.len())
            .field("nodes", &self.nodes.len())
            .finish_non_exhaustive()
    }
}

impl<T> Default for HitMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HitMap<T> {
    /// Create an empty map that hits nothing.
    pub const fn new() -> Self {
        Self {
            areas: Vec::new(),
            nodes: Vec::new(),
        }
    }

    /// True if no areas or handlers were declared.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn clear(&mut self) {
        self.areas.clear();
        self.nodes.clear();
    }
}

impl<T: Copy + Eq> HitMap<T> {
    /// Whether `p` lies inside every shape on the chain starting at `area`.
    ///
    /// `None` denotes the implicit root, which contains everything.
    pub fn contains(&self, area: Option<AreaId>, p: Point) -> bool {
        self.probe(area, p).0
    }

    /// Map a scene-space point into the local space of `area`.
    pub fn local_point(&self, area: Option<AreaId>, p: Point) -> Point {
        match area {
            None => p,
            Some(id) => self.areas[id.idx()].transform.inverse() * p,
        }
    }

    /// Collect the tags of every handler whose enclosing areas all contain
    /// `p`, frontmost-declared first, into `hits`.
    ///
    /// Returns the active cursor: the innermost cursor declared on the
    /// topmost hit's chain, or [`Cursor::Default`] when nothing hits.
    pub fn hits_at(&self, p: Point, hits: &mut Vec<T>) -> Cursor {
        hits.clear();
        let mut cursor = Cursor::Default;
        let mut pass = true;
        let mut idx = self.nodes.len().checked_sub(1);
        while let Some(i) = idx {
            let n = &self.nodes[i];
            let (hit, c) = self.probe(n.area, p);
            if !hit {
                idx = i.checked_sub(1);
                continue;
            }
            if cursor == Cursor::Default {
                cursor = c;
            }
            pass = pass && n.pass;
            idx = if pass { i.checked_sub(1) } else { n.next };
            if let Some(tag) = n.tag {
                if !hits.contains(&tag) {
                    hits.push(tag);
                }
            }
        }
        cursor
    }

    /// Chain containment test, also reporting the innermost cursor seen.
    fn probe(&self, mut area: Option<AreaId>, p: Point) -> (bool, Cursor) {
        let mut cursor = Cursor::Default;
        while let Some(id) = area {
            let a = &self.areas[id.idx()];
            if cursor == Cursor::Default {
                if let Some(c) = a.cursor {
                    cursor = c;
                }
            }
            if !a.shape_contains(a.transform.inverse() * p) {
                return (false, cursor);
            }
            area = a.parent;
        }
        (true, cursor)
    }
}

/// Error raised while building a frame's [`HitMap`].
///
/// These are producer bugs in the op stream. The frame build is aborted and
/// no partially built map is handed out.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BuildError {
    /// A scope was popped that was never pushed.
    UnbalancedPop,
    /// The stream ended with scopes still open.
    UnclosedScope {
        /// How many scopes were left open.
        open: usize,
    },
    /// A cursor was declared with no enclosing area to attach it to.
    CursorOutsideArea,
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnbalancedPop => write!(f, "scope popped without a matching push"),
            Self::UnclosedScope { open } => {
                write!(f, "op stream ended with {open} unclosed scope(s)")
            }
            Self::CursorOutsideArea => write!(f, "cursor declared outside any area"),
        }
    }
}

impl core::error::Error for BuildError {}

/// Collector state: everything a scope push must save and a pop restore.
#[derive(Copy, Clone, Debug)]
struct BuildState {
    transform: Affine,
    node: Option<usize>,
    area: Option<AreaId>,
    pass: bool,
}

impl Default for BuildState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            node: None,
            area: None,
            // Handlers and areas are opaque unless pass-through is requested.
            pass: false,
        }
    }
}

/// Builds a [`HitMap`] from one frame's declarations.
///
/// The builder only yields a map from [`HitMapBuilder::finish`] once the
/// whole stream has been consumed without error, so callers can keep routing
/// against last frame's map when a build fails midway.
pub struct HitMapBuilder<T> {
    map: HitMap<T>,
    state: BuildState,
    stack: Vec<BuildState>,
}

impl<T> fmt::Debug for HitMapBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HitMapBuilder")
            .field("map", &self.map)
            .field("depth", &self.stack.len())
            .finish_non_exhaustive()
    }
}

impl<T: Copy + Eq> Default for HitMapBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Eq> HitMapBuilder<T> {
    /// Create a builder with fresh storage.
    pub fn new() -> Self {
        Self {
            map: HitMap::new(),
            state: BuildState::default(),
            stack: Vec::new(),
        }
    }

    /// Create a builder that truncates and reuses a retired map's storage.
    pub fn reusing(mut prior: HitMap<T>) -> Self {
        prior.clear();
        Self {
            map: prior,
            state: BuildState::default(),
            stack: Vec::new(),
        }
    }

    /// Compose `t` onto the current scope's transform.
    pub fn transform(&mut self, t: Affine) {
        self.state.transform = self.state.transform * t;
    }

    /// Enter a nested scope, saving transform, chain position, and pass flag.
    pub fn push_scope(&mut self) {
        self.stack.push(self.state);
    }

    /// Leave the current scope, restoring the saved state.
    pub fn pop_scope(&mut self) -> Result<(), BuildError> {
        self.state = self.stack.pop().ok_or(BuildError::UnbalancedPop)?;
        Ok(())
    }

    /// Set the pass flag applied to nodes declared from here on.
    pub fn pass_through(&mut self, pass: bool) {
        self.state.pass = pass;
    }

    /// Push a shape onto the current chain and make it the current area.
    pub fn area(&mut self, kind: AreaKind, bounds: Rect) {
        let id = AreaId::new(self.map.areas.len());
        self.map.areas.push(AreaNode {
            transform: self.state.transform,
            kind,
            bounds,
            cursor: None,
            parent: self.state.area,
        });
        self.add_node(HitNode {
            next: None,
            area: Some(id),
            tag: None,
            pass: self.state.pass,
        });
        self.state.area = Some(id);
    }

    /// Attach a cursor to the current area.
    pub fn cursor(&mut self, cursor: Cursor) -> Result<(), BuildError> {
        let id = self.state.area.ok_or(BuildError::CursorOutsideArea)?;
        self.map.areas[id.idx()].cursor = Some(cursor);
        Ok(())
    }

    /// Append a handler leaf at the current chain position.
    ///
    /// Returns the area the handler is bound to, for the caller's per-handler
    /// bookkeeping (`None` when declared outside any area, in which case the
    /// handler covers the whole scene).
    pub fn handler(&mut self, tag: T) -> Option<AreaId> {
        let area = self.state.area;
        self.add_node(HitNode {
            next: None,
            area,
            tag: Some(tag),
            pass: self.state.pass,
        });
        area
    }

    /// Finish the frame, failing if any scope is still open.
    pub fn finish(self) -> Result<HitMap<T>, BuildError> {
        if !self.stack.is_empty() {
            return Err(BuildError::UnclosedScope {
                open: self.stack.len(),
            });
        }
        Ok(self.map)
    }

    fn add_node(&mut self, mut node: HitNode<T>) {
        node.next = self.state.node;
        self.map.nodes.push(node);
        self.state.node = Some(self.map.nodes.len() - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    fn hits(map: &HitMap<u32>, x: f64, y: f64) -> Vec<u32> {
        let mut out = Vec::new();
        map.hits_at(Point::new(x, y), &mut out);
        out
    }

    #[test]
    fn empty_map_hits_nothing() {
        let map: HitMap<u32> = HitMap::new();
        assert!(map.is_empty());
        assert!(hits(&map, 0.0, 0.0).is_empty());
    }

    #[test]
    fn innermost_handler_first() {
        let mut b: HitMapBuilder<u32> = HitMapBuilder::new();
        b.push_scope();
        b.area(AreaKind::Rect, Rect::new(0.0, 0.0, 100.0, 100.0));
        b.handler(1);
        b.push_scope();
        b.area(AreaKind::Rect, Rect::new(25.0, 25.0, 75.0, 75.0));
        b.handler(2);
        b.pop_scope().unwrap();
        b.pop_scope().unwrap();
        let map = b.finish().unwrap();

        // Inside both: the nested handler is reported first.
        assert_eq!(hits(&map, 50.0, 50.0), vec![2, 1]);
        // Inside only the outer area.
        assert_eq!(hits(&map, 10.0, 10.0), vec![1]);
    }

    #[test]
    fn opaque_sibling_blocks_earlier_declarations() {
        let mut b: HitMapBuilder<u32> = HitMapBuilder::new();
        b.push_scope();
        b.area(AreaKind::Rect, Rect::new(0.0, 0.0, 100.0, 100.0));
        b.handler(1);
        b.pop_scope().unwrap();
        b.push_scope();
        b.area(AreaKind::Rect, Rect::new(50.0, 50.0, 200.0, 200.0));
        b.handler(2);
        b.pop_scope().unwrap();
        let map = b.finish().unwrap();

        // The later (frontmost) opaque handler shadows the earlier one.
        assert_eq!(hits(&map, 60.0, 60.0), vec![2]);
        // Outside the front area the earlier handler is reachable again.
        assert_eq!(hits(&map, 10.0, 10.0), vec![1]);
    }

    #[test]
    fn pass_through_continues_past_frontmost_hit() {
        let mut b: HitMapBuilder<u32> = HitMapBuilder::new();
        b.push_scope();
        b.area(AreaKind::Rect, Rect::new(0.0, 0.0, 100.0, 100.0));
        b.handler(1);
        b.pop_scope().unwrap();
        b.push_scope();
        b.pass_through(true);
        b.area(AreaKind::Rect, Rect::new(0.0, 0.0, 100.0, 100.0));
        b.handler(2);
        b.pop_scope().unwrap();
        let map = b.finish().unwrap();

        assert_eq!(hits(&map, 50.0, 50.0), vec![2, 1]);
    }

    #[test]
    fn handlers_in_one_scope_share_the_chain() {
        let mut b: HitMapBuilder<u32> = HitMapBuilder::new();
        b.push_scope();
        b.area(AreaKind::Rect, Rect::new(0.0, 0.0, 100.0, 100.0));
        b.handler(1);
        b.handler(2);
        b.handler(3);
        b.pop_scope().unwrap();
        let map = b.finish().unwrap();

        // All three are collected even though none is pass-through, because
        // they sit on the same chain.
        assert_eq!(hits(&map, 50.0, 50.0), vec![3, 2, 1]);
    }

    #[test]
    fn chained_areas_intersect() {
        let mut b: HitMapBuilder<u32> = HitMapBuilder::new();
        b.push_scope();
        b.area(AreaKind::Rect, Rect::new(0.0, 0.0, 100.0, 100.0));
        b.area(AreaKind::Rect, Rect::new(50.0, 0.0, 150.0, 100.0));
        b.handler(1);
        b.pop_scope().unwrap();
        let map = b.finish().unwrap();

        // Only the overlap of both rects hits.
        assert_eq!(hits(&map, 75.0, 50.0), vec![1]);
        assert!(hits(&map, 25.0, 50.0).is_empty());
        assert!(hits(&map, 125.0, 50.0).is_empty());
    }

    #[test]
    fn rect_edges_are_half_open() {
        let mut b: HitMapBuilder<u32> = HitMapBuilder::new();
        b.area(AreaKind::Rect, Rect::new(0.0, 0.0, 10.0, 10.0));
        b.handler(1);
        let map = b.finish().unwrap();

        assert_eq!(hits(&map, 0.0, 0.0), vec![1]);
        assert!(hits(&map, 10.0, 0.0).is_empty());
        assert!(hits(&map, 0.0, 10.0).is_empty());
    }

    #[test]
    fn ellipse_containment() {
        let mut b: HitMapBuilder<u32> = HitMapBuilder::new();
        b.area(AreaKind::Ellipse, Rect::new(0.0, 0.0, 100.0, 50.0));
        b.handler(1);
        let map = b.finish().unwrap();

        // Center and on-axis extremes hit; corners do not.
        assert_eq!(hits(&map, 50.0, 25.0), vec![1]);
        assert_eq!(hits(&map, 1.0, 25.0), vec![1]);
        assert!(hits(&map, 2.0, 2.0).is_empty());
        assert!(hits(&map, 98.0, 48.0).is_empty());
    }

    #[test]
    fn degenerate_ellipse_never_hits() {
        let mut b: HitMapBuilder<u32> = HitMapBuilder::new();
        b.area(AreaKind::Ellipse, Rect::new(10.0, 10.0, 10.0, 10.0));
        b.handler(1);
        let map = b.finish().unwrap();

        assert!(hits(&map, 10.0, 10.0).is_empty());
    }

    #[test]
    fn transforms_compose_and_invert() {
        let mut b: HitMapBuilder<u32> = HitMapBuilder::new();
        b.push_scope();
        b.transform(Affine::translate((100.0, 0.0)));
        b.area(AreaKind::Rect, Rect::new(0.0, 0.0, 50.0, 50.0));
        b.push_scope();
        b.transform(Affine::translate((0.0, 100.0)));
        b.area(AreaKind::Rect, Rect::new(0.0, 0.0, 50.0, 50.0));
        b.handler(1);
        b.pop_scope().unwrap();
        b.pop_scope().unwrap();
        let map = b.finish().unwrap();

        // The nested area sits at (100, 100)..(150, 150) in scene space, but
        // must also fall inside its parent at (100, 0)..(150, 50).
        assert!(hits(&map, 125.0, 125.0).is_empty());

        // Without the parent constraint the same chain hits.
        let mut b: HitMapBuilder<u32> = HitMapBuilder::new();
        b.transform(Affine::translate((100.0, 100.0)));
        b.area(AreaKind::Rect, Rect::new(0.0, 0.0, 50.0, 50.0));
        b.handler(1);
        let map = b.finish().unwrap();
        assert_eq!(hits(&map, 125.0, 125.0), vec![1]);
        assert!(hits(&map, 25.0, 25.0).is_empty());
    }

    #[test]
    fn local_point_maps_into_area_space() {
        let mut b: HitMapBuilder<u32> = HitMapBuilder::new();
        b.transform(Affine::translate((100.0, 50.0)));
        b.area(AreaKind::Rect, Rect::new(0.0, 0.0, 50.0, 50.0));
        let site = b.handler(1);
        let map = b.finish().unwrap();

        let local = map.local_point(site, Point::new(110.0, 60.0));
        assert_eq!(local, Point::new(10.0, 10.0));
        // No area means scene space is local space.
        assert_eq!(map.local_point(None, Point::new(3.0, 4.0)), Point::new(3.0, 4.0));
    }

    #[test]
    fn cursor_comes_from_topmost_hit_chain() {
        let mut b: HitMapBuilder<u32> = HitMapBuilder::new();
        b.push_scope();
        b.area(AreaKind::Rect, Rect::new(0.0, 0.0, 100.0, 100.0));
        b.cursor(Cursor::Text).unwrap();
        b.handler(1);
        b.push_scope();
        b.area(AreaKind::Rect, Rect::new(25.0, 25.0, 75.0, 75.0));
        b.cursor(Cursor::Pointer).unwrap();
        b.handler(2);
        b.pop_scope().unwrap();
        b.pop_scope().unwrap();
        let map = b.finish().unwrap();

        let mut out = Vec::new();
        // Inside the nested area: its cursor wins.
        assert_eq!(map.hits_at(Point::new(50.0, 50.0), &mut out), Cursor::Pointer);
        // Inside only the outer area.
        assert_eq!(map.hits_at(Point::new(10.0, 10.0), &mut out), Cursor::Text);
        // Off both areas.
        assert_eq!(map.hits_at(Point::new(200.0, 200.0), &mut out), Cursor::Default);
    }

    #[test]
    fn duplicate_tags_are_collected_once() {
        let mut b: HitMapBuilder<u32> = HitMapBuilder::new();
        b.area(AreaKind::Rect, Rect::new(0.0, 0.0, 100.0, 100.0));
        b.handler(7);
        b.handler(7);
        let map = b.finish().unwrap();

        assert_eq!(hits(&map, 50.0, 50.0), vec![7]);
    }

    #[test]
    fn handler_without_area_hits_everywhere() {
        let mut b: HitMapBuilder<u32> = HitMapBuilder::new();
        b.handler(1);
        let map = b.finish().unwrap();

        assert_eq!(hits(&map, -1e6, 1e6), vec![1]);
    }

    #[test]
    fn unbalanced_pop_is_an_error() {
        let mut b: HitMapBuilder<u32> = HitMapBuilder::new();
        assert_eq!(b.pop_scope(), Err(BuildError::UnbalancedPop));
    }

    #[test]
    fn unclosed_scope_is_an_error() {
        let mut b: HitMapBuilder<u32> = HitMapBuilder::new();
        b.push_scope();
        b.push_scope();
        assert_eq!(
            b.finish().err(),
            Some(BuildError::UnclosedScope { open: 2 })
        );
    }

    #[test]
    fn cursor_outside_area_is_an_error() {
        let mut b: HitMapBuilder<u32> = HitMapBuilder::new();
        assert_eq!(b.cursor(Cursor::Pointer), Err(BuildError::CursorOutsideArea));
    }

    #[test]
    fn reusing_truncates_previous_frame() {
        let mut b: HitMapBuilder<u32> = HitMapBuilder::new();
        b.area(AreaKind::Rect, Rect::new(0.0, 0.0, 10.0, 10.0));
        b.handler(1);
        let map = b.finish().unwrap();
        assert_eq!(hits(&map, 5.0, 5.0), vec![1]);

        let mut b = HitMapBuilder::reusing(map);
        b.area(AreaKind::Rect, Rect::new(20.0, 20.0, 30.0, 30.0));
        b.handler(2);
        let map = b.finish().unwrap();
        assert!(hits(&map, 5.0, 5.0).is_empty());
        assert_eq!(hits(&map, 25.0, 25.0), vec![2]);
    }
}
