//! Gesture sessions: immutable start snapshots plus cumulative-delta sampling.
//!
//! A session is created on pointer-down and owns everything the gesture
//! needs: the rect at pointer-down, the pointer position at pointer-down,
//! and (for rotation) the pivot. Each pointer-move recomputes the candidate
//! from those snapshots and the *current* pointer only, so many small moves
//! can never drift or compound.

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use crate::geometry::{Point, Rect, ResizeHandle, move_rect, resize_rect, rotate_rect};

/// What a gesture does to its layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Drag,
    Resize(ResizeHandle),
    Rotate,
}

/// A live move/resize/rotate gesture on one image layer.
#[derive(Debug, Clone)]
pub struct GestureSession {
    kind: GestureKind,
    start_rect: Rect,
    /// Client-space pointer at pointer-down.
    start_pointer: Point,
    /// Client-space rotation pivot, fixed for the whole gesture.
    pivot: Point,
    /// Client pixels per canvas unit, frozen at pointer-down.
    scale: f64,
    candidate: Rect,
    moved: bool,
}

impl GestureSession {
    fn new(kind: GestureKind, start_rect: Rect, start_pointer: Point, pivot: Point, scale: f64) -> Self {
        Self { kind, start_rect, start_pointer, pivot, scale, candidate: start_rect, moved: false }
    }

    #[must_use]
    pub fn drag(start_rect: Rect, start_pointer: Point, scale: f64) -> Self {
        Self::new(GestureKind::Drag, start_rect, start_pointer, start_pointer, scale)
    }

    #[must_use]
    pub fn resize(start_rect: Rect, handle: ResizeHandle, start_pointer: Point, scale: f64) -> Self {
        Self::new(GestureKind::Resize(handle), start_rect, start_pointer, start_pointer, scale)
    }

    /// Rotation about `pivot`, the layer's on-screen center at pointer-down.
    #[must_use]
    pub fn rotate(start_rect: Rect, start_pointer: Point, pivot: Point, scale: f64) -> Self {
        Self::new(GestureKind::Rotate, start_rect, start_pointer, pivot, scale)
    }

    #[must_use]
    pub fn kind(&self) -> GestureKind {
        self.kind
    }

    #[must_use]
    pub fn start_rect(&self) -> Rect {
        self.start_rect
    }

    #[must_use]
    pub fn pivot(&self) -> Point {
        self.pivot
    }

    /// The rect computed from the most recent sample (the start rect before any move).
    #[must_use]
    pub fn candidate(&self) -> Rect {
        self.candidate
    }

    /// Whether at least one pointer-move was sampled.
    #[must_use]
    pub fn has_moved(&self) -> bool {
        self.moved
    }

    /// Recompute the candidate for the pointer at `pointer` (client space).
    pub fn sample(&mut self, pointer: Point) -> Rect {
        let dx = (pointer.x - self.start_pointer.x) / self.scale;
        let dy = (pointer.y - self.start_pointer.y) / self.scale;
        self.candidate = match self.kind {
            GestureKind::Drag => move_rect(self.start_rect, dx, dy),
            GestureKind::Resize(handle) => resize_rect(self.start_rect, handle, dx, dy),
            GestureKind::Rotate => rotate_rect(self.start_rect, self.pivot, pointer),
        };
        self.moved = true;
        self.candidate
    }

    /// Take size and rotation from `rect` while a drag is live; the drag only
    /// owns position. Returns false for resize and rotate sessions, which own
    /// the extent themselves.
    pub fn rebase_extent(&mut self, rect: Rect) -> bool {
        if self.kind != GestureKind::Drag {
            return false;
        }
        self.start_rect = Rect { x: self.start_rect.x, y: self.start_rect.y, ..rect };
        self.candidate = Rect { x: self.candidate.x, y: self.candidate.y, ..rect };
        true
    }

    /// End the gesture, yielding the rect to commit.
    #[must_use]
    pub fn finish(self) -> Rect {
        self.candidate.normalized()
    }
}

/// A live drag of a text layer's center offset. Text layers move only.
#[derive(Debug, Clone)]
pub struct OffsetDrag {
    start_offset: Point,
    start_pointer: Point,
    scale: f64,
    candidate: Point,
    moved: bool,
}

impl OffsetDrag {
    #[must_use]
    pub fn new(start_offset: Point, start_pointer: Point, scale: f64) -> Self {
        Self { start_offset, start_pointer, scale, candidate: start_offset, moved: false }
    }

    pub fn sample(&mut self, pointer: Point) -> Point {
        self.candidate = Point::new(
            self.start_offset.x + (pointer.x - self.start_pointer.x) / self.scale,
            self.start_offset.y + (pointer.y - self.start_pointer.y) / self.scale,
        );
        self.moved = true;
        self.candidate
    }

    #[must_use]
    pub fn candidate(&self) -> Point {
        self.candidate
    }

    #[must_use]
    pub fn has_moved(&self) -> bool {
        self.moved
    }
}
