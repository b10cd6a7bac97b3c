// SPDX-License-Identifier: MIT OR Apache-2.0

//! DOM-free viewport logic.
//!
//! Everything the video viewport decides (box geometry, pointer and wheel
//! normalization, key-code fixes, held-key tracking, playback and autoplay
//! state) lives here as plain functions and values, so it can be tested
//! without a browser. `components::video_viewport` only reads the DOM,
//! calls into this module and writes the results back.

pub mod geometry;
pub mod input;
pub mod keys;
pub mod playback;

pub use geometry::{AspectBox, AspectRatio};
pub use input::{normalize_pointer, normalize_wheel, InputGate, OverlayRect};
pub use keys::{normalize_key_code, HeldKeys};
pub use playback::{autoplay_decision, clipboard_update, Autoplay, PlaybackState};
