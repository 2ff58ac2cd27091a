// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drive the input router through a frame of declarations and some input.
//!
//! Two overlapping panels share the scene; the upper one requests a pointer
//! cursor, and two text fields take part in tab navigation.
//!
//! Run:
//! - `cargo run -p bracken_demos --example router_walkthrough`

use bracken_router::{
    AreaKind, Event, InputHint, Key, KeyEvent, Modifiers, NamedKey, PointerEvent, PointerId,
    PointerKind, PointerMask, Router, SceneOp,
};
use bracken_router::{Cursor, ScrollRange};
use kurbo::{Point, Rect};

/// Handler identities are opaque to the router; a small enum-ish constant
/// set is plenty for a demo.
const BACK_PANEL: u32 = 1;
const FRONT_PANEL: u32 = 2;
const NAME_FIELD: u32 = 10;
const EMAIL_FIELD: u32 = 11;

fn scene() -> Vec<SceneOp<u32>> {
    vec![
        // A large panel at the back.
        SceneOp::PushScope,
        SceneOp::Area {
            kind: AreaKind::Rect,
            bounds: Rect::new(0.0, 0.0, 400.0, 300.0),
        },
        SceneOp::PointerHandler {
            tag: BACK_PANEL,
            wants_grab: false,
            mask: PointerMask::all(),
            scroll_range: ScrollRange::vertical(-100.0, 100.0),
        },
        SceneOp::PopScope,
        // A smaller panel in front of its lower-right quarter.
        SceneOp::PushScope,
        SceneOp::Area {
            kind: AreaKind::Rect,
            bounds: Rect::new(200.0, 150.0, 400.0, 300.0),
        },
        SceneOp::Cursor(Cursor::Pointer),
        SceneOp::PointerHandler {
            tag: FRONT_PANEL,
            wants_grab: false,
            mask: PointerMask::all(),
            scroll_range: ScrollRange::ZERO,
        },
        SceneOp::PopScope,
        // Two text fields for the keyboard side.
        SceneOp::KeyHandler {
            tag: NAME_FIELD,
            hint: InputHint::Text,
        },
        SceneOp::KeyHandler {
            tag: EMAIL_FIELD,
            hint: InputHint::Email,
        },
    ]
}

fn drain(router: &mut Router<u32>, name: &str, tag: u32) {
    let events = router.events(tag);
    if events.is_empty() {
        return;
    }
    println!("{name}:");
    for event in events {
        match event {
            Event::Pointer(p) => println!("  pointer {:?} at {:?}", p.kind, p.position),
            Event::Key(k) => println!("  key {k:?}"),
        }
    }
}

fn drain_all(router: &mut Router<u32>) {
    drain(router, "back panel", BACK_PANEL);
    drain(router, "front panel", FRONT_PANEL);
    drain(router, "name field", NAME_FIELD);
    drain(router, "email field", EMAIL_FIELD);
}

fn main() {
    let mut router: Router<u32> = Router::new();
    router.frame(&scene()).expect("scene stream is well formed");

    println!("== frame committed, moving over the back panel");
    router.push(Event::Pointer(PointerEvent::new(
        PointerKind::Move,
        PointerId(1),
        Point::new(100.0, 100.0),
    )));
    println!("cursor: {:?}", router.cursor());
    drain_all(&mut router);

    println!("== moving onto the front panel");
    router.push(Event::Pointer(PointerEvent::new(
        PointerKind::Move,
        PointerId(1),
        Point::new(300.0, 200.0),
    )));
    println!("cursor: {:?}", router.cursor());
    drain_all(&mut router);

    println!("== pressing and dragging");
    router.push(Event::Pointer(PointerEvent::new(
        PointerKind::Press,
        PointerId(1),
        Point::new(300.0, 200.0),
    )));
    router.push(Event::Pointer(PointerEvent::new(
        PointerKind::Move,
        PointerId(1),
        Point::new(310.0, 210.0),
    )));
    router.push(Event::Pointer(PointerEvent::new(
        PointerKind::Release,
        PointerId(1),
        Point::new(310.0, 210.0),
    )));
    drain_all(&mut router);

    println!("== tabbing through the form");
    router.push(Event::Key(KeyEvent::Press {
        key: Key::Named(NamedKey::Tab),
        modifiers: Modifiers::empty(),
    }));
    println!("focus: {:?}", router.focus());
    router.push(Event::Key(KeyEvent::Press {
        key: Key::Named(NamedKey::Tab),
        modifiers: Modifiers::empty(),
    }));
    println!("focus: {:?}", router.focus());
    let (hint, changed) = router.input_hint();
    println!("input hint: {hint:?} (changed: {changed})");
    drain_all(&mut router);

    println!("== typing into the focused field");
    router.push(Event::Key(KeyEvent::Edit("hi".into())));
    drain_all(&mut router);

    println!("redraw needed: {}", router.redraw_needed());
}
