//! Studio engine: routes host input to layers and reports what changed.
//!
//! `StudioCore` owns the composition context, one interaction controller
//! per image layer, and the single gesture slot. Every entry point returns
//! the [`Action`]s the host should apply (re-render, cursor changes, probe
//! requests, notices). The core has no browser dependencies; the `web`
//! feature wraps it for JavaScript.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use uuid::Uuid;

use crate::adjust::{Adjustments, FilterKind, TransformField};
use crate::catalogue::{self, CatalogueItem, Gallery};
use crate::config::StudioConfig;
use crate::context::{Capabilities, CompositionContext, ProbeOutcome, SourceContent, SourceKey};
use crate::controller::{InteractionState, LayerCallbacks, LayerController};
use crate::export::{ExportAdapter, ExportError, ExportKind, ExportPurpose, ExportRequest};
use crate::geometry::{Point, Rect, Size};
use crate::gesture::OffsetDrag;
use crate::hit::{HitPart, hit_test};
use crate::layers::{Composition, LayerId, LayerRef, TextField, TextId, TextLayer, TextToggle};
use crate::probe::{ProbeError, ProbeTicket};
use crate::viewport::Viewport;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button.
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// Actions returned from engine entry points for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    RenderNeeded,
    SelectionChanged { selected: Option<LayerRef> },
    LayerAdded { id: LayerId },
    /// Live, uncommitted rect during a gesture.
    LayerPreview { id: LayerId, rect: Rect },
    /// Rect committed to the layer model.
    LayerChanged { id: LayerId, rect: Rect },
    LayerRemoved { id: LayerId },
    TextAdded { id: TextId },
    /// Live, uncommitted caption offset during a drag.
    TextPreview { id: TextId, offset: Point },
    TextChanged { id: TextId },
    TextRemoved { id: TextId },
    CanvasResized { size: Size },
    AdjustmentsChanged,
    SourceSwitched { key: SourceKey },
    GalleryChanged,
    /// Measure `source` and report back through [`StudioCore::complete_probe`].
    ProbeRequested { ticket: ProbeTicket, source: String },
    SetCursor { cursor: String },
    /// Render once more if required, then call [`StudioCore::run_export`].
    ExportPrepared { request: ExportRequest, render_pass_required: bool },
    Exported { request: ExportRequest, bytes: Vec<u8> },
    /// Non-fatal message for the user.
    Notice { message: String },
}

/// The one gesture allowed at a time, across every layer.
#[derive(Debug, Clone)]
enum ActiveGesture {
    Image(LayerId),
    Text { id: TextId, drag: OffsetDrag },
}

/// Applies controller callbacks to the layer model and records the results.
struct ModelSink<'a> {
    comp: &'a mut Composition,
    actions: &'a mut Vec<Action>,
    removals: Vec<LayerId>,
}

impl<'a> ModelSink<'a> {
    fn new(comp: &'a mut Composition, actions: &'a mut Vec<Action>) -> Self {
        Self { comp, actions, removals: Vec::new() }
    }
}

impl LayerCallbacks for ModelSink<'_> {
    fn on_select(&mut self, id: LayerId) {
        let layer = LayerRef::Image(id);
        if !self.comp.is_selected(layer) {
            self.comp.select(Some(layer));
            self.actions.push(Action::SelectionChanged { selected: self.comp.selected() });
        }
    }

    fn on_change(&mut self, id: LayerId, rect: Rect) {
        if self.comp.update_layer_rect(&id, rect) {
            self.actions.push(Action::LayerChanged { id, rect: rect.normalized() });
        }
    }

    fn on_remove(&mut self, id: LayerId) {
        self.removals.push(id);
    }
}

/// An image layer as the host should draw it now.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderImage {
    pub id: LayerId,
    pub source: String,
    pub rect: Rect,
    pub z_index: u32,
    pub selected: bool,
    pub base: bool,
    pub state: InteractionState,
}

/// A caption as the host should draw it now.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderText {
    #[serde(flatten)]
    pub layer: TextLayer,
    pub z_index: u32,
    pub selected: bool,
}

/// Everything needed to paint one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderState {
    pub canvas: Size,
    pub images: Vec<RenderImage>,
    pub texts: Vec<RenderText>,
    pub selected: Option<LayerRef>,
    /// CSS transform / filter of the studio stage; absent outside the studio.
    pub transform_css: Option<String>,
    pub filter_css: Option<String>,
}

pub struct StudioCore {
    context: CompositionContext,
    controllers: HashMap<LayerId, LayerController>,
    active: Option<ActiveGesture>,
    viewport: Viewport,
    gallery: Gallery,
    rng: StdRng,
    cursor: String,
    pending_export: Option<ExportRequest>,
}

impl Default for StudioCore {
    fn default() -> Self {
        Self::new(StudioConfig::default(), Capabilities::default())
    }
}

impl StudioCore {
    #[must_use]
    pub fn new(config: StudioConfig, capabilities: Capabilities) -> Self {
        let (hi, lo) = Uuid::new_v4().as_u64_pair();
        Self::with_seed(config, capabilities, hi ^ lo)
    }

    /// Like [`StudioCore::new`] with a fixed seed for gallery randomization.
    #[must_use]
    pub fn with_seed(config: StudioConfig, capabilities: Capabilities, seed: u64) -> Self {
        let gallery = Gallery::new(config.batch_size);
        Self {
            context: CompositionContext::new(config, capabilities),
            controllers: HashMap::new(),
            active: None,
            viewport: Viewport::default(),
            gallery,
            rng: StdRng::seed_from_u64(seed),
            cursor: "default".into(),
            pending_export: None,
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn composition(&self) -> &Composition {
        self.context.composition()
    }

    #[must_use]
    pub fn context(&self) -> &CompositionContext {
        &self.context
    }

    #[must_use]
    pub fn adjustments(&self) -> &Adjustments {
        self.context.adjustments()
    }

    #[must_use]
    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The rect currently shown for an image layer (live during a gesture).
    #[must_use]
    pub fn displayed_rect(&self, id: &LayerId) -> Option<Rect> {
        self.controllers.get(id).map(LayerController::displayed)
    }

    #[must_use]
    pub fn interaction_state(&self, id: &LayerId) -> InteractionState {
        self.controllers.get(id).map_or(InteractionState::Idle, LayerController::state)
    }

    /// The layer owning the gesture slot, if any.
    #[must_use]
    pub fn active_layer(&self) -> Option<LayerRef> {
        match &self.active {
            None => None,
            Some(ActiveGesture::Image(id)) => Some(LayerRef::Image(*id)),
            Some(ActiveGesture::Text { id, .. }) => Some(LayerRef::Text(*id)),
        }
    }

    #[must_use]
    pub fn render_state(&self) -> RenderState {
        let comp = self.context.composition();
        let selected = comp.selected();
        let mut images = Vec::with_capacity(comp.images().len());
        let mut texts = Vec::with_capacity(comp.texts().len());
        for item in comp.paint_order() {
            match item.layer {
                LayerRef::Image(id) => {
                    let Some(layer) = comp.image(&id) else { continue };
                    images.push(RenderImage {
                        id,
                        source: layer.source.clone(),
                        rect: self.displayed_rect(&id).unwrap_or(layer.rect),
                        z_index: item.z_index,
                        selected: selected == Some(item.layer),
                        base: layer.base,
                        state: self.interaction_state(&id),
                    });
                }
                LayerRef::Text(id) => {
                    let Some(text) = comp.text(id) else { continue };
                    let mut layer = text.clone();
                    if let Some(ActiveGesture::Text { id: active, drag }) = &self.active {
                        if *active == id {
                            let offset = drag.candidate();
                            layer.x = offset.x;
                            layer.y = offset.y;
                        }
                    }
                    texts.push(RenderText { layer, z_index: item.z_index, selected: selected == Some(item.layer) });
                }
            }
        }
        let studio = self.context.in_studio();
        let adjustments = self.context.adjustments();
        RenderState {
            canvas: comp.canvas,
            images,
            texts,
            selected,
            transform_css: studio.then(|| adjustments.transform.to_css()),
            filter_css: studio.then(|| adjustments.filters.to_css()),
        }
    }

    // --- Viewport ---

    /// Where the canvas sits on screen and how much it is scaled.
    pub fn set_viewport(&mut self, origin_x: f64, origin_y: f64, scale: f64) {
        self.viewport = Viewport::new(origin_x, origin_y, scale);
    }

    // --- Pointer input ---

    /// Pointer pressed at `screen_pt` (client coordinates). The target is
    /// found by hit testing; empty canvas clears the selection.
    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let canvas_pt = self.viewport.screen_to_canvas(screen_pt);
        match hit_test(canvas_pt, self.context.composition()) {
            Some(hit) => self.on_pointer_down_on(hit.layer, hit.part, screen_pt),
            None => {
                let mut actions = self.release_gesture();
                actions.extend(self.select(None));
                actions
            }
        }
    }

    /// Pointer pressed on a known layer part, for hosts that route DOM targets.
    pub fn on_pointer_down_on(&mut self, layer: LayerRef, part: HitPart, screen_pt: Point) -> Vec<Action> {
        let mut actions = self.release_gesture();
        match layer {
            LayerRef::Image(id) => self.begin_image_gesture(id, part, screen_pt, &mut actions),
            LayerRef::Text(id) => self.begin_text_drag(id, screen_pt, &mut actions),
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    fn begin_image_gesture(&mut self, id: LayerId, part: HitPart, screen_pt: Point, actions: &mut Vec<Action>) {
        let Some(controller) = self.controllers.get_mut(&id) else {
            tracing::debug!(layer_id = %id, "pointer-down on unknown layer ignored");
            return;
        };
        let mut sink = ModelSink::new(self.context.composition_mut(), actions);
        let began = match controller.pointer_down(part, screen_pt, &self.viewport, &mut sink) {
            Ok(()) => controller.is_active(),
            Err(err) => {
                tracing::debug!(layer_id = %id, error = %err, "pointer-down ignored");
                false
            }
        };
        let removals = std::mem::take(&mut sink.removals);
        if began {
            self.active = Some(ActiveGesture::Image(id));
            self.set_cursor(part.cursor(), actions);
        }
        self.sync_controllers();
        for id in removals {
            actions.extend(self.remove_layer(&id));
        }
    }

    fn begin_text_drag(&mut self, id: TextId, screen_pt: Point, actions: &mut Vec<Action>) {
        let Some(offset) = self.context.composition().text(id).map(TextLayer::offset) else {
            tracing::debug!(text_id = id, "pointer-down on unknown text ignored");
            return;
        };
        actions.extend(self.select(Some(LayerRef::Text(id))));
        self.active = Some(ActiveGesture::Text { id, drag: OffsetDrag::new(offset, screen_pt, self.viewport.scale) });
        self.set_cursor("move".into(), actions);
    }

    /// Pointer moved. Samples the active gesture, or updates the hover cursor.
    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        let mut actions = Vec::new();
        match &mut self.active {
            Some(ActiveGesture::Image(id)) => {
                let id = *id;
                if let Some(rect) = self.controllers.get_mut(&id).and_then(|c| c.pointer_move(screen_pt)) {
                    actions.push(Action::LayerPreview { id, rect });
                    actions.push(Action::RenderNeeded);
                }
            }
            Some(ActiveGesture::Text { id, drag }) => {
                let offset = drag.sample(screen_pt);
                actions.push(Action::TextPreview { id: *id, offset });
                actions.push(Action::RenderNeeded);
            }
            None => {
                let cursor = self.hover_cursor(screen_pt);
                self.set_cursor(cursor, &mut actions);
            }
        }
        actions
    }

    fn hover_cursor(&self, screen_pt: Point) -> String {
        let comp = self.context.composition();
        match hit_test(self.viewport.screen_to_canvas(screen_pt), comp) {
            None => "default".into(),
            Some(hit) if hit.part == HitPart::Body && !comp.is_selected(hit.layer) => "pointer".into(),
            Some(hit) => hit.part.cursor(),
        }
    }

    /// Pointer released: commit the active gesture.
    pub fn on_pointer_up(&mut self, _screen_pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let mut actions = Vec::new();
        self.finish_gesture(false, &mut actions);
        actions
    }

    /// Pointer capture lost (pointer cancel, window blur): force-commit.
    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        self.release_gesture()
    }

    fn release_gesture(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        self.finish_gesture(true, &mut actions);
        actions
    }

    /// Empty the gesture slot, committing whatever the gesture produced.
    fn finish_gesture(&mut self, forced: bool, actions: &mut Vec<Action>) {
        let Some(active) = self.active.take() else {
            return;
        };
        match active {
            ActiveGesture::Image(id) => {
                if let Some(controller) = self.controllers.get_mut(&id) {
                    let mut sink = ModelSink::new(self.context.composition_mut(), actions);
                    if forced {
                        controller.pointer_cancel(&mut sink);
                    } else {
                        controller.pointer_up(&mut sink);
                    }
                }
            }
            ActiveGesture::Text { id, drag } => {
                if drag.has_moved() && self.context.composition_mut().move_text_layer(id, drag.candidate()) {
                    tracing::debug!(text_id = id, "text drag commit");
                    actions.push(Action::TextChanged { id });
                }
            }
        }
        self.sync_controllers();
        self.set_cursor("default".into(), actions);
        actions.push(Action::RenderNeeded);
    }

    fn set_cursor(&mut self, cursor: String, actions: &mut Vec<Action>) {
        if self.cursor != cursor {
            self.cursor.clone_from(&cursor);
            actions.push(Action::SetCursor { cursor });
        }
    }

    /// Bring controllers in line with the layer model: create, drop, and
    /// resync. Mid-gesture resyncs are deferred by the controller itself.
    fn sync_controllers(&mut self) {
        let comp = self.context.composition();
        let selected = comp.selected();
        self.controllers.retain(|id, _| comp.image(id).is_some());
        for layer in comp.images() {
            let is_selected = selected == Some(LayerRef::Image(layer.id));
            match self.controllers.entry(layer.id) {
                Entry::Occupied(e) => {
                    let controller = e.into_mut();
                    controller.sync_rect(layer.rect);
                    controller.set_selected(is_selected);
                }
                Entry::Vacant(e) => {
                    e.insert(LayerController::new(layer.id, layer.rect, is_selected));
                }
            }
        }
        if let Some(ActiveGesture::Image(id)) = &self.active {
            if !self.controllers.contains_key(id) {
                self.active = None;
            }
        }
    }

    // --- Selection ---

    pub fn select(&mut self, layer: Option<LayerRef>) -> Vec<Action> {
        let before = self.context.composition().selected();
        self.context.composition_mut().select(layer);
        let after = self.context.composition().selected();
        self.sync_controllers();
        if before == after {
            return Vec::new();
        }
        vec![Action::SelectionChanged { selected: after }, Action::RenderNeeded]
    }

    // --- Image layers ---

    /// Insert a picture (asset, upload, generated image, or catalogue pick).
    pub fn add_image(&mut self, source: impl Into<String>, rect: Option<Rect>) -> Vec<Action> {
        let mut actions = self.release_gesture();
        let source = source.into();
        let had_images: Vec<LayerId> = self.context.composition().images().iter().map(|l| l.id).collect();
        let (id, ticket) = self.context.add_image(source.clone(), rect);
        for gone in had_images.into_iter().filter(|old| self.context.composition().image(old).is_none()) {
            actions.push(Action::LayerRemoved { id: gone });
        }
        self.sync_controllers();
        actions.push(Action::LayerAdded { id });
        actions.push(Action::SelectionChanged { selected: self.context.composition().selected() });
        if let Some(ticket) = ticket {
            actions.push(Action::ProbeRequested { ticket, source });
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// The host measured (or failed to measure) an image.
    pub fn complete_probe(&mut self, ticket: ProbeTicket, result: Result<Size, ProbeError>) -> Vec<Action> {
        let canvas_before = self.context.composition().canvas;
        let outcome = match self.context.complete_probe(&ticket, result) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::debug!(layer_id = %ticket.layer, error = %err, "probe result discarded");
                return Vec::new();
            }
        };
        let layer = match outcome {
            ProbeOutcome::Applied { layer, .. } | ProbeOutcome::FellBack { layer } => layer,
            ProbeOutcome::LayerGone { .. } => return Vec::new(),
        };
        self.sync_controllers();
        let mut actions = Vec::new();
        if let Some(rect) = self.context.composition().image(&layer).map(|l| l.rect) {
            actions.push(Action::LayerChanged { id: layer, rect });
        }
        let canvas = self.context.composition().canvas;
        if canvas != canvas_before {
            actions.push(Action::CanvasResized { size: canvas });
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Property-panel edit of a layer rect. Deferred while that layer is mid-gesture.
    pub fn update_layer_rect(&mut self, id: &LayerId, rect: Rect) -> Vec<Action> {
        if !self.context.composition_mut().update_layer_rect(id, rect) {
            return Vec::new();
        }
        self.sync_controllers();
        vec![Action::LayerChanged { id: *id, rect: rect.normalized() }, Action::RenderNeeded]
    }

    pub fn remove_layer(&mut self, id: &LayerId) -> Vec<Action> {
        if let Some(ActiveGesture::Image(active)) = &self.active {
            if active == id {
                if let Some(controller) = self.controllers.get_mut(id) {
                    controller.abandon();
                }
                self.active = None;
            }
        }
        let was_selected = self.context.composition().is_selected(LayerRef::Image(*id));
        if self.context.remove_image(id).is_none() {
            return Vec::new();
        }
        tracing::debug!(layer_id = %id, "layer removed");
        self.sync_controllers();
        let mut actions = vec![Action::LayerRemoved { id: *id }];
        if was_selected {
            actions.push(Action::SelectionChanged { selected: None });
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn set_canvas_size(&mut self, size: Size) -> Vec<Action> {
        self.context.composition_mut().set_canvas_size(size);
        vec![Action::CanvasResized { size: self.context.composition().canvas }, Action::RenderNeeded]
    }

    // --- Text layers ---

    pub fn add_text(&mut self) -> Vec<Action> {
        let id = self.context.composition_mut().add_text_layer();
        vec![Action::TextAdded { id }, Action::RenderNeeded]
    }

    pub fn update_text(&mut self, id: TextId, field: TextField) -> Vec<Action> {
        if self.context.composition_mut().update_text_layer(id, field) {
            vec![Action::TextChanged { id }, Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    pub fn toggle_text(&mut self, id: TextId, toggle: TextToggle) -> Vec<Action> {
        if self.context.composition_mut().toggle_text_style(id, toggle) {
            vec![Action::TextChanged { id }, Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    pub fn remove_text(&mut self, id: TextId) -> Vec<Action> {
        if matches!(&self.active, Some(ActiveGesture::Text { id: active, .. }) if *active == id) {
            self.active = None;
        }
        let was_selected = self.context.composition().is_selected(LayerRef::Text(id));
        if self.context.composition_mut().remove_text_layer(id).is_none() {
            return Vec::new();
        }
        let mut actions = vec![Action::TextRemoved { id }];
        if was_selected {
            actions.push(Action::SelectionChanged { selected: None });
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Adjustments ---

    pub fn set_transform(&mut self, field: TransformField) -> Vec<Action> {
        self.context.adjustments_mut().transform.set(field);
        vec![Action::AdjustmentsChanged, Action::RenderNeeded]
    }

    pub fn toggle_flip_h(&mut self) -> Vec<Action> {
        self.context.adjustments_mut().transform.toggle_flip_h();
        vec![Action::AdjustmentsChanged, Action::RenderNeeded]
    }

    pub fn toggle_flip_v(&mut self) -> Vec<Action> {
        self.context.adjustments_mut().transform.toggle_flip_v();
        vec![Action::AdjustmentsChanged, Action::RenderNeeded]
    }

    pub fn set_filter(&mut self, kind: FilterKind, value: f64) -> Vec<Action> {
        self.context.adjustments_mut().filters.set(kind, value);
        vec![Action::AdjustmentsChanged, Action::RenderNeeded]
    }

    pub fn reset_filters(&mut self) -> Vec<Action> {
        self.context.adjustments_mut().reset_filters();
        vec![Action::AdjustmentsChanged, Action::RenderNeeded]
    }

    /// Canvas back to the default size and adjustments back to neutral.
    pub fn reset_editor(&mut self) -> Vec<Action> {
        self.context.reset_editor();
        vec![
            Action::CanvasResized { size: self.context.composition().canvas },
            Action::AdjustmentsChanged,
            Action::RenderNeeded,
        ]
    }

    // --- Sources ---

    /// Activate a content source, restoring its captions.
    pub fn switch_to(&mut self, key: SourceKey, content: SourceContent) -> Vec<Action> {
        let mut actions = self.release_gesture();
        let old: Vec<LayerId> = self.controllers.keys().copied().collect();
        let tickets = self.context.switch_to(key.clone(), content);
        self.sync_controllers();
        for id in old.into_iter().filter(|id| !self.controllers.contains_key(id)) {
            actions.push(Action::LayerRemoved { id });
        }
        actions.push(Action::SourceSwitched { key });
        actions.push(Action::SelectionChanged { selected: None });
        actions.push(Action::CanvasResized { size: self.context.composition().canvas });
        for ticket in tickets {
            if let Some(layer) = self.context.composition().image(&ticket.layer) {
                actions.push(Action::ProbeRequested { ticket, source: layer.source.clone() });
            }
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Show a built-in reaction face.
    pub fn pick_reaction(&mut self, id: &str) -> Vec<Action> {
        let item = catalogue::reaction(id);
        self.switch_to(SourceKey::reaction(item.id), SourceContent::Image(item.image))
    }

    /// Show a gallery meme by id. Unknown ids are ignored.
    pub fn pick_gallery(&mut self, id: &str) -> Vec<Action> {
        let Some(item) = self.gallery.find(id).cloned() else {
            tracing::debug!(item_id = id, "unknown gallery item");
            return Vec::new();
        };
        self.show_gallery_item(item)
    }

    /// Show the gallery's selected meme, the first one right after loading.
    pub fn show_gallery(&mut self) -> Vec<Action> {
        match self.gallery.selected().cloned() {
            Some(item) => self.show_gallery_item(item),
            None => vec![Action::Notice { message: "The meme gallery is still loading.".into() }],
        }
    }

    fn show_gallery_item(&mut self, item: CatalogueItem) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.gallery.selected() != Some(&item) && self.gallery.select(&item.id) {
            actions.push(Action::GalleryChanged);
        }
        actions.extend(self.switch_to(SourceKey::gallery(item.id), SourceContent::Image(item.image)));
        actions
    }

    /// Show a saved template.
    pub fn pick_template(&mut self, item: CatalogueItem) -> Vec<Action> {
        self.switch_to(SourceKey::template(item.id), SourceContent::Image(item.image))
    }

    /// Start a new studio session seeded with `images`.
    pub fn open_studio(&mut self, images: Vec<String>) -> Vec<Action> {
        let key = SourceKey::studio(Uuid::new_v4().to_string());
        self.switch_to(key, SourceContent::Studio(images))
    }

    /// Show a random gallery meme.
    pub fn randomize(&mut self) -> Vec<Action> {
        let Some(item) = self.gallery.random(&mut self.rng).cloned() else {
            return vec![Action::Notice { message: "The meme gallery is still loading.".into() }];
        };
        self.show_gallery_item(item)
    }

    // --- Gallery ---

    /// Replace the gallery catalogue. The first item becomes the gallery's
    /// selection; [`StudioCore::show_gallery`] displays it.
    pub fn load_gallery(&mut self, items: Vec<CatalogueItem>) -> Vec<Action> {
        if let Some(first) = self.gallery.load(items) {
            tracing::debug!(item_id = %first.id, "gallery loaded");
        }
        vec![Action::GalleryChanged]
    }

    pub fn search_gallery(&mut self, query: &str) -> Vec<Action> {
        self.gallery.set_query(query);
        vec![Action::GalleryChanged]
    }

    /// The gallery list scrolled; reveals another batch near the bottom.
    pub fn gallery_scrolled(&mut self, scroll_top: f64, scroll_height: f64, client_height: f64) -> Vec<Action> {
        if Gallery::near_bottom(scroll_top, scroll_height, client_height) && self.gallery.load_more() > 0 {
            vec![Action::GalleryChanged]
        } else {
            Vec::new()
        }
    }

    // --- Export ---

    /// Get the composition ready for export.
    ///
    /// Any gesture is force-committed. For template saves the selection is
    /// cleared, and the host must render once before calling
    /// [`StudioCore::run_export`] so no selection decoration is captured.
    pub fn prepare_export(&mut self, kind: ExportKind, purpose: ExportPurpose) -> Vec<Action> {
        let mut actions = self.release_gesture();
        let render_pass_required = self.clear_selection_for(purpose, &mut actions);
        let comp = self.context.composition();
        let studio_canvas = self.context.in_studio().then_some(comp.canvas);
        let request = ExportRequest::new(kind, purpose, studio_canvas, &self.context.config().export_name);
        tracing::debug!(kind = %kind, ?purpose, render_pass_required, "export prepared");
        self.pending_export = Some(request.clone());
        actions.push(Action::ExportPrepared { request, render_pass_required });
        actions
    }

    fn clear_selection_for(&mut self, purpose: ExportPurpose, actions: &mut Vec<Action>) -> bool {
        if purpose != ExportPurpose::Template || self.context.composition().selected().is_none() {
            return false;
        }
        actions.extend(self.select(None));
        true
    }

    /// Run the prepared export through `adapter`.
    ///
    /// Failure is reported as a notice; the composition is left as it was.
    pub fn run_export(&mut self, adapter: &mut dyn ExportAdapter) -> Vec<Action> {
        let Some(request) = self.pending_export.take() else {
            let err = ExportError::NotReady("no export was prepared");
            return vec![Action::Notice { message: format!("Export failed: {err}") }];
        };
        let mut actions = self.release_gesture();
        if self.clear_selection_for(request.purpose, &mut actions) {
            // Something was selected after preparing; another render pass is needed.
            self.pending_export = Some(request.clone());
            actions.push(Action::ExportPrepared { request, render_pass_required: true });
            return actions;
        }
        match adapter.export(&request) {
            Ok(bytes) => {
                tracing::debug!(file_name = %request.file_name, bytes = bytes.len(), "export finished");
                actions.push(Action::Exported { request, bytes });
            }
            Err(err) => {
                tracing::warn!(kind = %request.kind, error = %err, "export failed");
                actions.push(Action::Notice { message: format!("Export failed: {err}") });
            }
        }
        actions
    }
}
