// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bracken Key: keyboard focus routing for an op-stream-driven scene.
//!
//! ## Overview
//!
//! The [`KeyRouter`] owns the keyboard-focus model: which handler holds
//! focus, how Tab moves it, what the platform should do with its soft
//! keyboard, and which handler raw key input is forwarded to.
//!
//! Focus persists across frames and always points at a live handler or at
//! nothing. Each frame the host hands the router the frame's key-handler
//! declarations (whose order doubles as the tab order), an optional focus
//! request, and an optional soft-keyboard request; the router reconciles
//! them into at most one `Focus(false)`/`Focus(true)` bracket and a
//! transient [`KeyboardVisibility`] decision.
//!
//! ## Tab navigation
//!
//! A [`NamedKey::Tab`] press is intercepted before reaching handlers and
//! moves focus one step through the declaration order, wrapping at the ends;
//! Shift reverses. The raw key is consumed, never forwarded. Every other key
//! event forwards verbatim to the focused handler, or is dropped when
//! nothing is focused.
//!
//! ## Minimal example
//!
//! ```rust
//! use bracken_key::{InputHint, KeyDecl, KeyFrame, KeyRouter};
//!
//! let mut router: KeyRouter<u32> = KeyRouter::new();
//! let mut out = Vec::new();
//! router.frame(
//!     KeyFrame {
//!         decls: vec![
//!             KeyDecl { tag: 1, hint: InputHint::Text },
//!             KeyDecl { tag: 2, hint: InputHint::Any },
//!         ],
//!         focus_request: Some(Some(1)),
//!         keyboard: None,
//!     },
//!     &mut out,
//! );
//! assert_eq!(router.focus(), Some(1));
//! ```
//!
//! Handler tags are opaque, externally supplied identities compared by
//! identity only; use a small `Copy` handle.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod router;
mod types;

pub use router::KeyRouter;
pub use types::{
    EditorState, InputHint, Key, KeyDecl, KeyDelivery, KeyEvent, KeyFrame, KeyboardVisibility,
    Modifiers, NamedKey, Selection,
};
