//! Shared numeric constants for the studio crate.

// ── Geometry ────────────────────────────────────────────────────

/// Smallest width or height a layer rect may have, in canvas units.
pub const MIN_DIM: f64 = 20.0;

/// Offset added to `atan2` so the rotate handle (above the box) reads as 0°.
pub const ROTATE_HANDLE_OFFSET_DEG: f64 = 90.0;

// ── Canvas ──────────────────────────────────────────────────────

/// Canvas width of a fresh studio session.
pub const DEFAULT_CANVAS_WIDTH: f64 = 500.0;

/// Canvas height of a fresh studio session.
pub const DEFAULT_CANVAS_HEIGHT: f64 = 500.0;

/// Largest canvas side produced when sizing the canvas to an image.
pub const MAX_CANVAS_DIM: f64 = 800.0;

// ── Image layers ────────────────────────────────────────────────

/// Side of the square used when an image's natural size cannot be probed.
pub const FALLBACK_LAYER_SIZE: f64 = 200.0;

/// Largest side of a non-first image layer placed without an explicit rect.
pub const DEFAULT_LAYER_BOX: f64 = 200.0;

/// Top-left offset of a non-first image layer placed without an explicit rect.
pub const DEFAULT_LAYER_OFFSET: f64 = 50.0;

// ── Text layers ─────────────────────────────────────────────────

/// Font size of a text layer created with "add text".
pub const NEW_TEXT_FONT_SIZE: f64 = 32.0;

/// Font size of the default top/bottom caption pair.
pub const CAPTION_FONT_SIZE: f64 = 40.0;

/// Vertical distance of the default captions from the canvas center.
pub const CAPTION_OFFSET_Y: f64 = 140.0;

/// Base z-index for text layers; a layer paints at `TEXT_Z_BASE + id`.
pub const TEXT_Z_BASE: u32 = 10;

// ── Hit-testing ─────────────────────────────────────────────────

/// Hit slop in canvas units around resize and rotate handles.
pub const HANDLE_RADIUS: f64 = 8.0;

/// Distance from the top edge of the box to the rotate handle.
pub const ROTATE_HANDLE_DISTANCE: f64 = 25.0;

/// Distance outside the top-right corner to the center of the remove badge.
pub const REMOVE_BADGE_OFFSET: f64 = 5.0;

/// Hit radius of the remove badge, in canvas units.
pub const REMOVE_BADGE_RADIUS: f64 = 10.0;

/// Estimated glyph advance as a fraction of font size, for caption bounds.
pub const TEXT_ADVANCE_RATIO: f64 = 0.6;

/// Caption line height as a multiple of font size.
pub const TEXT_LINE_HEIGHT: f64 = 1.2;

// ── Gallery ─────────────────────────────────────────────────────

/// Number of gallery items revealed per batch.
pub const GALLERY_BATCH_SIZE: usize = 20;

/// Distance from the bottom of the gallery list that triggers the next batch.
pub const GALLERY_SCROLL_THRESHOLD: f64 = 50.0;
