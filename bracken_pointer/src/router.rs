// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer router implementation.
//!
//! ## Per-device state machine
//!
//! idle → press → dragging → release → idle, with `Cancel` resetting to idle
//! from any state. A device record exists only while its pointer is pressed
//! or entered somewhere.
//!
//! ## Event ordering
//!
//! - `Press`: synthesize enter/leave (fixing the participant set), mark
//!   pressed, deliver.
//! - `Move` while pressed is retyped `Drag`: synthesize enter/leave
//!   restricted to the fixed participants, deliver.
//! - `Release`: deliver, clear pressed, synthesize enter/leave against the
//!   unrestricted tree.
//! - `Scroll`: synthesize enter/leave, then distribute across participants.
//!
//! At each frame, handlers absent from the new declarations are cancelled,
//! grabs are resolved, and enter/leave is re-synthesized for every tracked
//! device against its last event, so stationary pointers notice the scene
//! moving under them.

use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;

use bracken_hit_tree::{AreaId, Cursor, HitMap};
use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use kurbo::Vec2;
use smallvec::SmallVec;

use crate::types::{
    HandlerDecl, PointerDelivery, PointerEvent, PointerFrame, PointerId, PointerKind, PointerMask,
    PointerPriority, PointerSource, ScrollRange,
};

/// Persistent per-handler record, keyed by tag across frames.
#[derive(Clone, Debug)]
struct HandlerState {
    area: Option<AreaId>,
    active: bool,
    wants_grab: bool,
    mask: PointerMask,
    scroll_range: ScrollRange,
}

/// Interaction state of one pointing device.
#[derive(Clone, Debug)]
struct Device<T> {
    id: PointerId,
    pressed: bool,
    /// Handlers participating in the current interaction, frontmost first.
    /// Fixed for the duration of a press; tracks the hover set otherwise.
    participants: SmallVec<[T; 4]>,
    /// Handlers the pointer is currently inside.
    entered: SmallVec<[T; 4]>,
    /// Most recent event, replayed when the scene changes under a
    /// stationary pointer.
    last: PointerEvent,
}

/// Routes raw pointer input to handlers via the current frame's hit tree.
///
/// See the [crate docs](crate) for the interaction model. All methods run to
/// completion on the caller's thread; the router performs no internal
/// synchronization and callers must serialize access.
pub struct PointerRouter<T> {
    map: HitMap<T>,
    handlers: HashMap<T, HandlerState>,
    devices: Vec<Device<T>>,
    cursor: Cursor,
    scratch: Vec<T>,
}

impl<T> fmt::Debug for PointerRouter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerRouter")
            .field("handlers", &self.handlers.len())
            .field("devices", &self.devices.len())
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl<T> Default for PointerRouter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PointerRouter<T> {
    /// Create a router with no handlers and an empty hit map.
    pub fn new() -> Self {
        Self {
            map: HitMap::new(),
            handlers: HashMap::new(),
            devices: Vec::new(),
            cursor: Cursor::Default,
            scratch: Vec::new(),
        }
    }

    /// The cursor for the most recent pointer position.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }
}

impl<T: Copy + Eq + Hash> PointerRouter<T> {
    /// Commit a new frame.
    ///
    /// Swaps in the staged hit map and declarations, cancels handlers that
    /// vanished, queues a quiet reset `Cancel` for handlers seen for the
    /// first time, resolves grab requests, and re-synthesizes enter/leave
    /// for every tracked device against its last event.
    ///
    /// Returns the retired map so its storage can be recycled via
    /// [`bracken_hit_tree::HitMapBuilder::reusing`].
    pub fn frame(
        &mut self,
        staged: PointerFrame<T>,
        out: &mut Vec<PointerDelivery<T>>,
    ) -> HitMap<T> {
        let PointerFrame { map, decls } = staged;
        let retired = core::mem::replace(&mut self.map, map);

        for h in self.handlers.values_mut() {
            h.active = false;
        }
        for d in &decls {
            match self.handlers.entry(d.tag) {
                Entry::Occupied(mut e) => {
                    let h = e.get_mut();
                    h.area = d.area;
                    h.active = true;
                    h.wants_grab = d.wants_grab;
                    h.mask = d.mask;
                    h.scroll_range = d.scroll_range;
                }
                Entry::Vacant(v) => {
                    v.insert(HandlerState {
                        area: d.area,
                        active: true,
                        wants_grab: d.wants_grab,
                        mask: d.mask,
                        scroll_range: d.scroll_range,
                    });
                    // Reset the handler on first sighting, without forcing
                    // a redraw.
                    out.push(PointerDelivery::quiet(d.tag, PointerEvent::cancel()));
                }
            }
        }

        let vanished: Vec<T> = self
            .handlers
            .iter()
            .filter(|(_, h)| !h.active)
            .map(|(tag, _)| *tag)
            .collect();
        for tag in vanished {
            self.handlers.remove(&tag);
            self.cancel_handler(tag, out);
        }

        self.resolve_grabs(&decls, out);

        for di in 0..self.devices.len() {
            let last = self.devices[di].last;
            self.deliver_enter_leave(di, last, out);
        }

        retired
    }

    /// Route one raw pointer event.
    ///
    /// Synthesized kinds (`Drag`, `Enter`, `Leave`) are not valid raw input
    /// and are absorbed as no-ops.
    pub fn push(&mut self, event: PointerEvent, out: &mut Vec<PointerDelivery<T>>) {
        match event.kind {
            PointerKind::Cancel => {
                let tags: Vec<T> = self.handlers.keys().copied().collect();
                for tag in tags {
                    out.push(PointerDelivery::new(tag, PointerEvent::cancel()));
                }
                self.devices.clear();
            }
            PointerKind::Drag | PointerKind::Enter | PointerKind::Leave => {}
            PointerKind::Press => {
                let di = self.device_index(event);
                self.deliver_enter_leave(di, event, out);
                self.devices[di].pressed = true;
                self.deliver_event(di, event, out);
                self.finish_push(di, event);
            }
            PointerKind::Move => {
                let di = self.device_index(event);
                let mut e = event;
                if self.devices[di].pressed {
                    e.kind = PointerKind::Drag;
                }
                self.deliver_enter_leave(di, e, out);
                self.deliver_event(di, e, out);
                self.finish_push(di, e);
            }
            PointerKind::Release => {
                let di = self.device_index(event);
                self.deliver_event(di, event, out);
                self.devices[di].pressed = false;
                self.deliver_enter_leave(di, event, out);
                self.finish_push(di, event);
            }
            PointerKind::Scroll => {
                let di = self.device_index(event);
                self.deliver_enter_leave(di, event, out);
                self.deliver_event(di, event, out);
                self.finish_push(di, event);
            }
        }
    }

    /// For each handler whose latest declaration requested grab, make it the
    /// sole participant of every pressed device holding it, cancelling the
    /// evicted participants.
    fn resolve_grabs(&mut self, decls: &[HandlerDecl<T>], out: &mut Vec<PointerDelivery<T>>) {
        for d in decls {
            let Some(h) = self.handlers.get(&d.tag) else {
                continue;
            };
            if !h.wants_grab {
                continue;
            }
            let grabber = d.tag;
            for di in 0..self.devices.len() {
                let dev = &self.devices[di];
                if !dev.pressed || !dev.participants.contains(&grabber) {
                    continue;
                }
                let losers: SmallVec<[T; 4]> = dev
                    .participants
                    .iter()
                    .copied()
                    .filter(|t| *t != grabber)
                    .collect();
                let dev = &mut self.devices[di];
                dev.participants.retain(|t| *t == grabber);
                dev.entered.retain(|t| !losers.contains(t));
                for loser in losers {
                    out.push(PointerDelivery::new(loser, PointerEvent::cancel()));
                }
            }
        }
    }

    /// Deliver `Cancel` to a handler and purge it from every device list.
    fn cancel_handler(&mut self, tag: T, out: &mut Vec<PointerDelivery<T>>) {
        out.push(PointerDelivery::new(tag, PointerEvent::cancel()));
        for d in &mut self.devices {
            d.participants.retain(|t| *t != tag);
            d.entered.retain(|t| *t != tag);
        }
    }

    /// Deliver an event to a device's participants in priority order.
    fn deliver_event(&mut self, di: usize, e: PointerEvent, out: &mut Vec<PointerDelivery<T>>) {
        let pressed = self.devices[di].pressed;
        let participants = self.devices[di].participants.clone();
        let mut e = e;
        let mut foremost = true;
        if pressed && participants.len() == 1 {
            e.priority = PointerPriority::Grabbed;
            foremost = false;
        }
        let mut sx = e.scroll.x;
        let mut sy = e.scroll.y;
        for tag in participants {
            let Some(h) = self.handlers.get(&tag) else {
                continue;
            };
            let mut ev = e;
            if e.kind == PointerKind::Scroll {
                if sx == 0.0 && sy == 0.0 {
                    return;
                }
                let (left_x, take_x) = clamp_scroll(sx, h.scroll_range.min.x, h.scroll_range.max.x);
                let (left_y, take_y) = clamp_scroll(sy, h.scroll_range.min.y, h.scroll_range.max.y);
                sx = left_x;
                sy = left_y;
                ev.scroll = Vec2::new(take_x, take_y);
            }
            if !h.mask.contains(ev.kind.mask()) {
                continue;
            }
            if foremost {
                foremost = false;
                ev.priority = PointerPriority::Foremost;
            }
            ev.position = self.map.local_point(h.area, e.position);
            out.push(PointerDelivery::new(tag, ev));
        }
    }

    /// Synthesize enter/leave for a device at an event's position.
    ///
    /// While pressed, hits are restricted to the fixed participant set;
    /// while unpressed they become the new participant set. Non-mouse
    /// sources that are neither pressed nor being pressed count as hitting
    /// nothing, so lifted touches leave everything they were in.
    fn deliver_enter_leave(
        &mut self,
        di: usize,
        e: PointerEvent,
        out: &mut Vec<PointerDelivery<T>>,
    ) {
        let mut hits = core::mem::take(&mut self.scratch);
        hits.clear();
        let pressed = self.devices[di].pressed;
        let probing =
            e.source == PointerSource::Mouse || pressed || e.kind == PointerKind::Press;
        if probing {
            let cursor = self.map.hits_at(e.position, &mut hits);
            hits.retain(|t| self.handlers.contains_key(t));
            self.cursor = cursor;
            if pressed {
                let participants = self.devices[di].participants.clone();
                hits.retain(|t| participants.contains(t));
            } else {
                self.devices[di].participants = hits.iter().copied().collect();
            }
        }

        let entered: SmallVec<[T; 4]> = self.devices[di].entered.clone();
        for &tag in &entered {
            if hits.contains(&tag) {
                continue;
            }
            if let Some(h) = self.handlers.get(&tag) {
                if h.mask.contains(PointerMask::LEAVE) {
                    let mut ev = e;
                    ev.kind = PointerKind::Leave;
                    ev.position = self.map.local_point(h.area, e.position);
                    out.push(PointerDelivery::new(tag, ev));
                }
            }
        }
        for &tag in &hits {
            if entered.contains(&tag) {
                continue;
            }
            if let Some(h) = self.handlers.get(&tag) {
                if h.mask.contains(PointerMask::ENTER) {
                    let mut ev = e;
                    ev.kind = PointerKind::Enter;
                    ev.position = self.map.local_point(h.area, e.position);
                    out.push(PointerDelivery::new(tag, ev));
                }
            }
        }
        self.devices[di].entered = hits.iter().copied().collect();
        self.scratch = hits;
    }

    /// Record the event as the device's last and prune it once idle.
    fn finish_push(&mut self, di: usize, e: PointerEvent) {
        let d = &mut self.devices[di];
        d.last = e;
        if !d.pressed && d.entered.is_empty() {
            self.devices.remove(di);
        }
    }

    /// Index of the device record for an event, creating one if needed.
    fn device_index(&mut self, e: PointerEvent) -> usize {
        if let Some(i) = self.devices.iter().position(|d| d.id == e.device) {
            return i;
        }
        self.devices.push(Device {
            id: e.device,
            pressed: false,
            participants: SmallVec::new(),
            entered: SmallVec::new(),
            last: e,
        });
        self.devices.len() - 1
    }
}

/// Clamp a remaining scroll delta to `min..=max`, returning what is left
/// over and what was consumed.
fn clamp_scroll(remaining: f64, min: f64, max: f64) -> (f64, f64) {
    if remaining > max {
        (remaining - max, max)
    } else if remaining < min {
        (remaining - min, min)
    } else {
        (0.0, remaining)
    }
}
