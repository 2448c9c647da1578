//! Per-layer interaction controller for image layers.
//!
//! A `LayerController` owns the rect the host displays for one image layer
//! and the gesture (if any) currently acting on it. The displayed rect is
//! provisional while a gesture runs; the layer model only learns about the
//! result at commit time, through [`LayerCallbacks::on_change`].

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use serde::Serialize;

use crate::geometry::{Point, Rect, ResizeHandle};
use crate::gesture::{GestureKind, GestureSession};
use crate::hit::HitPart;
use crate::layers::LayerId;
use crate::viewport::Viewport;

/// Gesture state of one layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging,
    Resizing(ResizeHandle),
    Rotating,
}

/// Receives the controller's outward notifications.
pub trait LayerCallbacks {
    /// The layer asks to become the selection.
    fn on_select(&mut self, id: LayerId);
    /// A gesture committed `rect` for the layer.
    fn on_change(&mut self, id: LayerId, rect: Rect);
    /// The layer's remove badge was clicked.
    fn on_remove(&mut self, id: LayerId);
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GestureError {
    #[error("layer {0} must be selected before it can be resized or rotated")]
    NotSelected(LayerId),
    #[error("a gesture is already active on layer {0}")]
    AlreadyActive(LayerId),
}

#[derive(Debug, Clone)]
pub struct LayerController {
    id: LayerId,
    displayed: Rect,
    selected: bool,
    session: Option<GestureSession>,
    /// External rect received mid-gesture, applied when the gesture ends
    /// without committing.
    deferred: Option<Rect>,
}

impl LayerController {
    #[must_use]
    pub fn new(id: LayerId, initial_rect: Rect, selected: bool) -> Self {
        Self { id, displayed: initial_rect.normalized(), selected, session: None, deferred: None }
    }

    #[must_use]
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// The rect the host should draw right now.
    #[must_use]
    pub fn displayed(&self) -> Rect {
        self.displayed
    }

    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn state(&self) -> InteractionState {
        match self.session.as_ref().map(GestureSession::kind) {
            None => InteractionState::Idle,
            Some(GestureKind::Drag) => InteractionState::Dragging,
            Some(GestureKind::Resize(h)) => InteractionState::Resizing(h),
            Some(GestureKind::Rotate) => InteractionState::Rotating,
        }
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Resynchronize from the layer model. Applied at once when idle.
    /// Mid-gesture the rect is held until the gesture ends, except that a
    /// drag adopts its size and rotation immediately.
    pub fn sync_rect(&mut self, rect: Rect) {
        let rect = rect.normalized();
        match self.session.as_mut() {
            Some(session) => {
                if session.rebase_extent(rect) {
                    self.displayed = session.candidate();
                }
                self.deferred = Some(rect);
            }
            None => self.displayed = rect,
        }
    }

    /// Begin a gesture on `part` with the pointer at `pointer` (client space).
    ///
    /// Body presses select the layer and start a drag. Handle presses need
    /// the layer to be selected already. The remove badge reports removal
    /// and starts nothing.
    pub fn pointer_down(
        &mut self,
        part: HitPart,
        pointer: Point,
        viewport: &Viewport,
        callbacks: &mut dyn LayerCallbacks,
    ) -> Result<(), GestureError> {
        if self.session.is_some() {
            return Err(GestureError::AlreadyActive(self.id));
        }
        let start = self.displayed;
        let session = match part {
            HitPart::Body => {
                callbacks.on_select(self.id);
                self.selected = true;
                GestureSession::drag(start, pointer, viewport.scale)
            }
            HitPart::ResizeHandle(handle) => {
                self.require_selected()?;
                GestureSession::resize(start, handle, pointer, viewport.scale)
            }
            HitPart::RotateHandle => {
                self.require_selected()?;
                let pivot = viewport.canvas_to_screen(start.center());
                GestureSession::rotate(start, pointer, pivot, viewport.scale)
            }
            HitPart::RemoveHandle => {
                callbacks.on_remove(self.id);
                return Ok(());
            }
        };
        tracing::debug!(layer_id = %self.id, kind = ?session.kind(), "gesture begin");
        self.session = Some(session);
        Ok(())
    }

    /// Sample the active gesture. Returns the new displayed rect, or `None`
    /// when idle.
    pub fn pointer_move(&mut self, pointer: Point) -> Option<Rect> {
        let session = self.session.as_mut()?;
        self.displayed = session.sample(pointer);
        Some(self.displayed)
    }

    /// End the gesture and commit its result.
    ///
    /// Returns the committed rect, or `None` when idle. A press released
    /// without moving commits its start snapshot, or the rect synced in
    /// while it was held.
    pub fn pointer_up(&mut self, callbacks: &mut dyn LayerCallbacks) -> Option<Rect> {
        let session = self.session.take()?;
        let deferred = self.deferred.take();
        let rect = if session.has_moved() {
            session.finish()
        } else {
            tracing::debug!(layer_id = %self.id, "gesture ended without movement");
            deferred.unwrap_or_else(|| session.start_rect())
        };
        self.displayed = rect;
        tracing::debug!(layer_id = %self.id, ?rect, "gesture commit");
        callbacks.on_change(self.id, rect);
        Some(rect)
    }

    /// Pointer capture lost (cancel, blur). The gesture is committed as if
    /// the pointer had been released.
    pub fn pointer_cancel(&mut self, callbacks: &mut dyn LayerCallbacks) -> Option<Rect> {
        if self.session.is_some() {
            tracing::debug!(layer_id = %self.id, "gesture interrupted; forcing commit");
        }
        self.pointer_up(callbacks)
    }

    /// Drop the active gesture without committing, restoring the rect the
    /// layer had when it started (or the deferred sync).
    pub fn abandon(&mut self) {
        if let Some(session) = self.session.take() {
            self.displayed = self.deferred.take().unwrap_or_else(|| session.start_rect());
        }
    }

    fn require_selected(&self) -> Result<(), GestureError> {
        if self.selected { Ok(()) } else { Err(GestureError::NotSelected(self.id)) }
    }
}
