//! Mapping between client (screen) pixels and canvas units.
//!
//! The host reports pointer positions in client coordinates. The canvas
//! element sits at `origin` on screen and may be displayed scaled (for
//! example when the preview stage shrinks a large canvas to fit).

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::geometry::Point;

/// On-screen placement of the canvas element.
///
/// `origin_x` / `origin_y` are the client coordinates of the canvas' top-left.
/// `scale` is displayed pixels per canvas unit (1.0 = unscaled).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub origin_x: f64,
    pub origin_y: f64,
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { origin_x: 0.0, origin_y: 0.0, scale: 1.0 }
    }
}

impl Viewport {
    #[must_use]
    pub fn new(origin_x: f64, origin_y: f64, scale: f64) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        Self { origin_x, origin_y, scale }
    }

    /// Convert a client-space point to canvas coordinates.
    #[must_use]
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.origin_x) / self.scale,
            y: (screen.y - self.origin_y) / self.scale,
        }
    }

    /// Convert a canvas point to client coordinates.
    #[must_use]
    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        Point {
            x: canvas.x * self.scale + self.origin_x,
            y: canvas.y * self.scale + self.origin_y,
        }
    }
}
