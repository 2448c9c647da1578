//! Layer-manipulation engine for the meme studio.
//!
//! This crate is compiled to WebAssembly and runs in the browser, but the
//! engine itself has no browser dependencies. It owns the composition (image
//! layers, captions, and the single selection), turns raw pointer input into
//! drag, resize, and rotate gestures, tracks which content source is active,
//! and prepares exports. The host page draws what [`engine::RenderState`]
//! describes, measures images when asked, and applies the returned
//! [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level [`engine::StudioCore`] and the action stream |
//! | [`layers`] | Image and text layers, composition, selection |
//! | [`controller`] | Per-layer gesture controller and live rect |
//! | [`gesture`] | Gesture sessions with start snapshots |
//! | [`geometry`] | Rects, resize handles, move/resize/rotate math |
//! | [`viewport`] | Client pixel to canvas unit conversions |
//! | [`hit`] | Hit testing for layer bodies and handles |
//! | [`context`] | Content sources and per-source saved state |
//! | [`probe`] | Natural-size probe tickets |
//! | [`adjust`] | Studio transform and filter adjustments |
//! | [`catalogue`] | Reactions, fonts, and the paged meme gallery |
//! | [`export`] | Export requests and the host adapter trait |
//! | [`config`] | Studio configuration |
//! | [`consts`] | Shared numeric constants (minimum sizes, handle radii, etc.) |

pub mod adjust;
pub mod catalogue;
pub mod config;
pub mod consts;
pub mod context;
pub mod controller;
pub mod engine;
pub mod export;
pub mod geometry;
pub mod gesture;
pub mod hit;
pub mod layers;
pub mod probe;
pub mod viewport;
#[cfg(feature = "web")]
pub mod web;

pub use engine::{Action, StudioCore};
