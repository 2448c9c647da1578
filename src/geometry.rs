//! Pure rectangle math for direct manipulation.
//!
//! Every function here is stateless: it takes the rect captured when a
//! gesture started plus the cumulative pointer delta, and returns the rect
//! the layer should show now. Nothing is ever derived from a previous frame.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{MIN_DIM, ROTATE_HANDLE_OFFSET_DEG};

/// A point in either screen or canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height of a canvas or image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Scale down, never up, so neither side exceeds `max`. Aspect ratio is kept.
    #[must_use]
    pub fn fit_within(self, max: f64) -> Self {
        let longest = self.width.max(self.height);
        if longest <= max || longest <= 0.0 {
            return self;
        }
        Self { width: self.width * max / longest, height: self.height * max / longest }
    }

    /// Raise both sides to at least [`MIN_DIM`].
    #[must_use]
    pub fn clamped(self) -> Self {
        Self { width: clamp_dim(self.width), height: clamp_dim(self.height) }
    }
}

/// Position, size, and rotation of an image layer.
///
/// `x` / `y` locate the top-left of the unrotated box relative to the canvas
/// origin. `rotation` is clockwise degrees about the box's own center and is
/// never folded into `x` / `y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64, rotation: f64) -> Self {
        Self { x, y, width, height, rotation }
    }

    /// An unrotated rect at `origin` with the given size.
    #[must_use]
    pub fn from_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height, 0.0)
    }

    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Clamp width and height to [`MIN_DIM`]. Position and rotation are kept.
    ///
    /// Non-finite components are replaced so a degenerate rect never reaches
    /// the layer model.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            x: finite_or(self.x, 0.0),
            y: finite_or(self.y, 0.0),
            width: clamp_dim(self.width),
            height: clamp_dim(self.height),
            rotation: finite_or(self.rotation, 0.0),
        }
    }

    /// Map a canvas-space point into the box's unrotated local frame, where
    /// `(0, 0)` is the top-left corner.
    #[must_use]
    pub fn to_local(&self, pt: Point) -> Point {
        let c = self.center();
        let (sin, cos) = (-self.rotation).to_radians().sin_cos();
        let dx = pt.x - c.x;
        let dy = pt.y - c.y;
        Point::new(dx * cos - dy * sin + self.width / 2.0, dx * sin + dy * cos + self.height / 2.0)
    }

    /// Map a point in the box's local frame back into canvas space.
    #[must_use]
    pub fn to_canvas(&self, local: Point) -> Point {
        let c = self.center();
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let dx = local.x - self.width / 2.0;
        let dy = local.y - self.height / 2.0;
        Point::new(c.x + dx * cos - dy * sin, c.y + dx * sin + dy * cos)
    }
}

fn clamp_dim(v: f64) -> f64 {
    if v.is_finite() { v.max(MIN_DIM) } else { MIN_DIM }
}

fn finite_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() { v } else { fallback }
}

/// One of the eight resize handles, named by the edges it drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeHandle {
    /// All handles, clockwise from north.
    pub const ALL: [Self; 8] = [Self::N, Self::Ne, Self::E, Self::Se, Self::S, Self::Sw, Self::W, Self::Nw];

    /// The corner handles drawn on a selected image layer.
    pub const CORNERS: [Self; 4] = [Self::Nw, Self::Ne, Self::Sw, Self::Se];

    #[must_use]
    pub fn moves_north(self) -> bool {
        matches!(self, Self::N | Self::Ne | Self::Nw)
    }

    #[must_use]
    pub fn moves_south(self) -> bool {
        matches!(self, Self::S | Self::Se | Self::Sw)
    }

    #[must_use]
    pub fn moves_east(self) -> bool {
        matches!(self, Self::E | Self::Ne | Self::Se)
    }

    #[must_use]
    pub fn moves_west(self) -> bool {
        matches!(self, Self::W | Self::Nw | Self::Sw)
    }

    /// Handle position in the box's local frame.
    #[must_use]
    pub fn local_anchor(self, width: f64, height: f64) -> Point {
        let x = if self.moves_west() {
            0.0
        } else if self.moves_east() {
            width
        } else {
            width / 2.0
        };
        let y = if self.moves_north() {
            0.0
        } else if self.moves_south() {
            height
        } else {
            height / 2.0
        };
        Point::new(x, y)
    }

    /// CSS cursor name for this handle (`"ne-resize"` etc).
    #[must_use]
    pub fn cursor(self) -> String {
        format!("{self}-resize")
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::N => "n",
            Self::Ne => "ne",
            Self::E => "e",
            Self::Se => "se",
            Self::S => "s",
            Self::Sw => "sw",
            Self::W => "w",
            Self::Nw => "nw",
        }
    }
}

impl fmt::Display for ResizeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a handle name is not one of the eight compass points.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resize handle: {0}")]
pub struct UnknownHandle(pub String);

impl FromStr for ResizeHandle {
    type Err = UnknownHandle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|h| h.as_str() == s)
            .ok_or_else(|| UnknownHandle(s.to_owned()))
    }
}

/// Translate `start` by `(dx, dy)`. Size and rotation are unchanged.
#[must_use]
pub fn move_rect(start: Rect, dx: f64, dy: f64) -> Rect {
    Rect { x: start.x + dx, y: start.y + dy, ..start }
}

/// Drag the edges named by `handle` by `(dx, dy)`.
///
/// West and north edges shift the origin by the delta so the opposite edge
/// stays put. Width and height are clamped to [`MIN_DIM`] afterwards; the
/// origin keeps following the unclamped delta (clamp-in-place).
#[must_use]
pub fn resize_rect(start: Rect, handle: ResizeHandle, dx: f64, dy: f64) -> Rect {
    let mut out = start;
    if handle.moves_east() {
        out.width = start.width + dx;
    }
    if handle.moves_west() {
        out.width = start.width - dx;
        out.x = start.x + dx;
    }
    if handle.moves_south() {
        out.height = start.height + dy;
    }
    if handle.moves_north() {
        out.height = start.height - dy;
        out.y = start.y + dy;
    }
    out.width = clamp_dim(out.width);
    out.height = clamp_dim(out.height);
    out
}

/// Absolute rotation that points the rotate handle at `pointer`, pivoting
/// about `center`. The result is normalized into `[0, 360)`.
#[must_use]
pub fn rotate_rect(start: Rect, center: Point, pointer: Point) -> Rect {
    let angle = (pointer.y - center.y).atan2(pointer.x - center.x).to_degrees();
    Rect { rotation: normalize_degrees(angle + ROTATE_HANDLE_OFFSET_DEG), ..start }
}

/// Wrap an angle into `[0, 360)`.
#[must_use]
pub fn normalize_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}
