//! Hit testing: which layer, and which part of it, lies under a canvas point.
//!
//! Hosts that route DOM events know the target element already; hosts that
//! only report coordinates use [`hit_test`]. Handles exist only on the
//! selected image layer and are tested before any body, matching their
//! stacking above the layers.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::{
    HANDLE_RADIUS, REMOVE_BADGE_OFFSET, REMOVE_BADGE_RADIUS, ROTATE_HANDLE_DISTANCE, TEXT_ADVANCE_RATIO,
    TEXT_LINE_HEIGHT,
};
use crate::geometry::{Point, Rect, ResizeHandle};
use crate::layers::{Composition, ImageLayer, LayerRef, TextLayer};

/// Which part of a layer was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeHandle),
    RotateHandle,
    RemoveHandle,
}

impl HitPart {
    /// CSS cursor shown while hovering this part.
    #[must_use]
    pub fn cursor(self) -> String {
        match self {
            Self::Body => "move".into(),
            Self::ResizeHandle(h) => h.cursor(),
            Self::RotateHandle => "grab".into(),
            Self::RemoveHandle => "pointer".into(),
        }
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub layer: LayerRef,
    pub part: HitPart,
}

/// Test which layer (if any) is under `canvas_pt`.
///
/// Order: handles of the selected image layer, then text layers top-down,
/// then image bodies top-down. Rotated boxes are tested in their own frame.
#[must_use]
pub fn hit_test(canvas_pt: Point, comp: &Composition) -> Option<Hit> {
    if let Some(LayerRef::Image(id)) = comp.selected() {
        if let Some(layer) = comp.image(&id) {
            if let Some(part) = handle_at(layer, canvas_pt) {
                return Some(Hit { layer: LayerRef::Image(id), part });
            }
        }
    }

    for text in comp.texts().iter().rev() {
        if contains(&text_bounds(text, comp), canvas_pt) {
            return Some(Hit { layer: LayerRef::Text(text.id), part: HitPart::Body });
        }
    }

    comp.images()
        .iter()
        .rev()
        .find(|l| contains(&l.rect, canvas_pt))
        .map(|l| Hit { layer: LayerRef::Image(l.id), part: HitPart::Body })
}

/// Handle of `layer` under `canvas_pt`, if any. The remove badge stacks
/// above the resize handles, which stack above the rotate handle.
#[must_use]
pub fn handle_at(layer: &ImageLayer, canvas_pt: Point) -> Option<HitPart> {
    let rect = &layer.rect;
    let local = rect.to_local(canvas_pt);

    if !layer.base {
        let badge = Point::new(rect.width + REMOVE_BADGE_OFFSET, -REMOVE_BADGE_OFFSET);
        if dist(local, badge) <= REMOVE_BADGE_RADIUS {
            return Some(HitPart::RemoveHandle);
        }
    }

    for handle in ResizeHandle::CORNERS {
        if dist(local, handle.local_anchor(rect.width, rect.height)) <= HANDLE_RADIUS {
            return Some(HitPart::ResizeHandle(handle));
        }
    }

    let rotate = Point::new(rect.width / 2.0, -ROTATE_HANDLE_DISTANCE);
    if dist(local, rotate) <= HANDLE_RADIUS {
        return Some(HitPart::RotateHandle);
    }
    None
}

/// Estimated on-canvas box of a caption, centered on its offset from the
/// canvas center.
#[must_use]
pub fn text_bounds(text: &TextLayer, comp: &Composition) -> Rect {
    let glyphs = text.content.chars().count().max(1);
    #[allow(clippy::cast_precision_loss)]
    let width = glyphs as f64 * text.font_size * TEXT_ADVANCE_RATIO;
    let height = text.font_size * TEXT_LINE_HEIGHT;
    let cx = comp.canvas.width / 2.0 + text.x;
    let cy = comp.canvas.height / 2.0 + text.y;
    Rect::new(cx - width / 2.0, cy - height / 2.0, width, height, 0.0)
}

fn contains(rect: &Rect, canvas_pt: Point) -> bool {
    let local = rect.to_local(canvas_pt);
    (0.0..=rect.width).contains(&local.x) && (0.0..=rect.height).contains(&local.y)
}

fn dist(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}
