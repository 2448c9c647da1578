//! Layer model: image and text layers, the composition that owns them, and
//! the single selection.
//!
//! A `Composition` is what the host renders and what the export adapter
//! consumes. Image layers paint in sequence order; text layers always paint
//! above every image layer. Lookups are by id, and a miss is a silent no-op
//! because a layer may be removed while a gesture on it is finishing.

#[cfg(test)]
#[path = "layers_test.rs"]
mod layers_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::PlacementDefaults;
use crate::consts::{CAPTION_FONT_SIZE, CAPTION_OFFSET_Y, NEW_TEXT_FONT_SIZE, TEXT_Z_BASE};
use crate::geometry::{Point, Rect, Size};

/// Unique, stable identifier of an image layer.
pub type LayerId = Uuid;

/// Identifier of a text layer, unique within its composition.
pub type TextId = u32;

/// Weak reference to a layer by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum LayerRef {
    Image(LayerId),
    Text(TextId),
}

/// A bitmap placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageLayer {
    pub id: LayerId,
    /// Image URL or data URI.
    pub source: String,
    pub rect: Rect,
    /// Full-canvas background of a composition seeded from a single image.
    /// Hosts hide the remove badge for it; the model treats it like any layer.
    #[serde(default)]
    pub base: bool,
}

/// A draggable caption.
///
/// `x` / `y` offset the caption from the canvas center.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLayer {
    pub id: TextId,
    pub content: String,
    pub x: f64,
    pub y: f64,
    pub color: String,
    pub font_size: f64,
    pub bold: bool,
    pub italic: bool,
    pub font_family: String,
    pub stroke: bool,
}

impl TextLayer {
    /// A caption as created by "add text": `TEXT`, centered, 32pt, bold, stroked.
    #[must_use]
    pub fn new(id: TextId) -> Self {
        Self {
            id,
            content: "TEXT".into(),
            x: 0.0,
            y: 0.0,
            color: "#ffffff".into(),
            font_size: NEW_TEXT_FONT_SIZE,
            bold: true,
            italic: false,
            font_family: "Impact".into(),
            stroke: true,
        }
    }

    /// The default `TOP TEXT` / `BOTTOM TEXT` pair installed for a new source.
    #[must_use]
    pub fn default_captions() -> Vec<Self> {
        vec![
            Self { content: "TOP TEXT".into(), y: -CAPTION_OFFSET_Y, font_size: CAPTION_FONT_SIZE, ..Self::new(1) },
            Self { content: "BOTTOM TEXT".into(), y: CAPTION_OFFSET_Y, font_size: CAPTION_FONT_SIZE, ..Self::new(2) },
        ]
    }

    #[must_use]
    pub fn offset(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// CSS `font-weight` value.
    #[must_use]
    pub fn font_weight(&self) -> &'static str {
        if self.bold { "bold" } else { "normal" }
    }

    /// CSS `font-style` value.
    #[must_use]
    pub fn font_style(&self) -> &'static str {
        if self.italic { "italic" } else { "normal" }
    }
}

/// One field-level edit to a text layer, as sent by the property panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum TextField {
    Content(String),
    Color(String),
    FontSize(f64),
    FontFamily(String),
    Bold(bool),
    Italic(bool),
    Stroke(bool),
}

/// A boolean text style flipped by a toolbar button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextToggle {
    Bold,
    Italic,
    Stroke,
}

/// How a new image layer was placed, which decides what its natural-size
/// probe result will do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// The caller supplied a rect; no probe is needed.
    Given,
    /// First layer of a fresh composition: fills the canvas, and the canvas
    /// adopts the image's natural size once known.
    FillCanvas,
    /// Any later layer: default offset, sized from the natural size once known.
    Default,
}

/// An entry in paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaintItem {
    pub layer: LayerRef,
    pub z_index: u32,
}

/// Canvas size plus every layer on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    pub canvas: Size,
    images: Vec<ImageLayer>,
    texts: Vec<TextLayer>,
    selected: Option<LayerRef>,
    /// Set on (re)start; cleared once the first image layer is added.
    #[serde(skip)]
    fresh: bool,
}

impl Composition {
    /// An empty composition on a canvas of `canvas` size.
    #[must_use]
    pub fn new(canvas: Size) -> Self {
        Self { canvas: canvas.clamped(), images: Vec::new(), texts: Vec::new(), selected: None, fresh: true }
    }

    // --- Queries ---

    #[must_use]
    pub fn images(&self) -> &[ImageLayer] {
        &self.images
    }

    #[must_use]
    pub fn texts(&self) -> &[TextLayer] {
        &self.texts
    }

    #[must_use]
    pub fn image(&self, id: &LayerId) -> Option<&ImageLayer> {
        self.images.iter().find(|l| &l.id == id)
    }

    #[must_use]
    pub fn text(&self, id: TextId) -> Option<&TextLayer> {
        self.texts.iter().find(|t| t.id == id)
    }

    #[must_use]
    pub fn selected(&self) -> Option<LayerRef> {
        self.selected
    }

    #[must_use]
    pub fn is_selected(&self, layer: LayerRef) -> bool {
        self.selected == Some(layer)
    }

    /// All layers bottom to top: images in order, then texts in order.
    ///
    /// Text z-indices start at [`TEXT_Z_BASE`] (or above the last image when
    /// there are more images than that) and add the text id.
    #[must_use]
    pub fn paint_order(&self) -> Vec<PaintItem> {
        let text_base = u32::try_from(self.images.len()).unwrap_or(u32::MAX).max(TEXT_Z_BASE);
        let images = (0u32..).zip(&self.images).map(|(z, l)| PaintItem { layer: LayerRef::Image(l.id), z_index: z });
        let texts = self
            .texts
            .iter()
            .map(|t| PaintItem { layer: LayerRef::Text(t.id), z_index: text_base.saturating_add(t.id) });
        images.chain(texts).collect()
    }

    // --- Selection ---

    /// Select a layer (or nothing). Selecting one layer deselects any other.
    /// References to missing layers select nothing.
    pub fn select(&mut self, layer: Option<LayerRef>) {
        self.selected = layer.filter(|r| self.contains(*r));
    }

    fn contains(&self, layer: LayerRef) -> bool {
        match layer {
            LayerRef::Image(id) => self.image(&id).is_some(),
            LayerRef::Text(id) => self.text(id).is_some(),
        }
    }

    // --- Canvas ---

    /// Resize the canvas. Each side is raised to at least the layer floor.
    pub fn set_canvas_size(&mut self, size: Size) {
        self.canvas = size.clamped();
    }

    // --- Image layers ---

    /// Append an image layer and select it.
    ///
    /// Without `rect`, the first layer of a fresh composition fills the
    /// canvas at `(0, 0)`; later layers go to the default offset with the
    /// fallback size. The returned [`Placement`] tells the caller whether a
    /// natural-size probe should refine that.
    pub fn add_image_layer(
        &mut self,
        source: impl Into<String>,
        rect: Option<Rect>,
        defaults: &PlacementDefaults,
    ) -> (LayerId, Placement) {
        let (rect, placement) = match rect {
            Some(r) => (r.normalized(), Placement::Given),
            None if self.fresh && self.images.is_empty() => {
                (Rect::from_size(Point::default(), self.canvas), Placement::FillCanvas)
            }
            None => (
                Rect::from_size(Point::new(defaults.offset, defaults.offset), defaults.fallback_size),
                Placement::Default,
            ),
        };
        let id = Uuid::new_v4();
        self.images.push(ImageLayer { id, source: source.into(), rect, base: false });
        self.fresh = false;
        self.selected = Some(LayerRef::Image(id));
        (id, placement)
    }

    /// Replace every image layer with one full-canvas base layer.
    ///
    /// The canvas adopts the image's natural size once it is probed, so the
    /// result is always [`Placement::FillCanvas`].
    pub fn set_base_image(&mut self, source: impl Into<String>) -> LayerId {
        let id = Uuid::new_v4();
        self.images.clear();
        self.images.push(ImageLayer {
            id,
            source: source.into(),
            rect: Rect::from_size(Point::default(), self.canvas),
            base: true,
        });
        self.fresh = false;
        self.selected = None;
        id
    }

    /// Apply a probed natural size (or the fallback when probing failed).
    ///
    /// The layer keeps its position and rotation. For [`Placement::FillCanvas`]
    /// the canvas is resized to the natural size capped at `max_canvas_dim`
    /// and the layer takes the canvas size. Returns false when the layer is gone.
    pub fn apply_natural_size(
        &mut self,
        id: &LayerId,
        placement: Placement,
        natural: Option<Size>,
        defaults: &PlacementDefaults,
    ) -> bool {
        let Some(idx) = self.images.iter().position(|l| &l.id == id) else {
            return false;
        };
        let size = match (placement, natural) {
            (Placement::Given, _) => return true,
            (_, None) => defaults.fallback_size.clamped(),
            (Placement::FillCanvas, Some(natural)) => {
                let canvas = natural.fit_within(defaults.max_canvas_dim).clamped();
                self.canvas = canvas;
                canvas
            }
            (Placement::Default, Some(natural)) => natural.fit_within(defaults.layer_box).clamped(),
        };
        let layer = &mut self.images[idx];
        layer.rect.width = size.width;
        layer.rect.height = size.height;
        true
    }

    /// Replace a layer's rect. Unknown ids are a no-op (returns false).
    pub fn update_layer_rect(&mut self, id: &LayerId, rect: Rect) -> bool {
        match self.images.iter_mut().find(|l| &l.id == id) {
            Some(layer) => {
                layer.rect = rect.normalized();
                true
            }
            None => {
                tracing::debug!(layer_id = %id, "rect update for missing layer ignored");
                false
            }
        }
    }

    /// Remove an image layer, clearing the selection if it pointed at it.
    pub fn remove_layer(&mut self, id: &LayerId) -> Option<ImageLayer> {
        let idx = self.images.iter().position(|l| &l.id == id)?;
        if self.selected == Some(LayerRef::Image(*id)) {
            self.selected = None;
        }
        Some(self.images.remove(idx))
    }

    /// Drop every image layer and mark the composition fresh again.
    pub fn clear_images(&mut self) {
        if matches!(self.selected, Some(LayerRef::Image(_))) {
            self.selected = None;
        }
        self.images.clear();
        self.fresh = true;
    }

    /// Restore a saved image-layer set.
    pub fn restore_images(&mut self, images: Vec<ImageLayer>) {
        if matches!(self.selected, Some(LayerRef::Image(_))) {
            self.selected = None;
        }
        self.fresh = images.is_empty();
        self.images = images;
    }

    // --- Text layers ---

    /// Append a default caption; its id is one above the current maximum.
    pub fn add_text_layer(&mut self) -> TextId {
        let id = self.texts.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        self.texts.push(TextLayer::new(id));
        id
    }

    /// Apply a field-level edit. Unknown ids are a no-op (returns false).
    pub fn update_text_layer(&mut self, id: TextId, field: TextField) -> bool {
        let Some(text) = self.texts.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        match field {
            TextField::Content(v) => text.content = v,
            TextField::Color(v) => text.color = v,
            TextField::FontSize(v) if v.is_finite() && v > 0.0 => text.font_size = v,
            TextField::FontSize(_) => return false,
            TextField::FontFamily(v) => text.font_family = v,
            TextField::Bold(v) => text.bold = v,
            TextField::Italic(v) => text.italic = v,
            TextField::Stroke(v) => text.stroke = v,
        }
        true
    }

    /// Flip one boolean style of a caption.
    pub fn toggle_text_style(&mut self, id: TextId, toggle: TextToggle) -> bool {
        let Some(text) = self.texts.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        match toggle {
            TextToggle::Bold => text.bold = !text.bold,
            TextToggle::Italic => text.italic = !text.italic,
            TextToggle::Stroke => text.stroke = !text.stroke,
        }
        true
    }

    /// Set a caption's offset from the canvas center.
    pub fn move_text_layer(&mut self, id: TextId, offset: Point) -> bool {
        let Some(text) = self.texts.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        text.x = offset.x;
        text.y = offset.y;
        true
    }

    pub fn remove_text_layer(&mut self, id: TextId) -> Option<TextLayer> {
        let idx = self.texts.iter().position(|t| t.id == id)?;
        if self.selected == Some(LayerRef::Text(id)) {
            self.selected = None;
        }
        Some(self.texts.remove(idx))
    }

    /// Swap in a different caption set, returning the old one.
    pub fn replace_texts(&mut self, texts: Vec<TextLayer>) -> Vec<TextLayer> {
        if matches!(self.selected, Some(LayerRef::Text(_))) {
            self.selected = None;
        }
        std::mem::replace(&mut self.texts, texts)
    }
}
