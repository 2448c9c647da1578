//! JavaScript bindings for [`StudioCore`].
//!
//! Structured arguments and every returned action list cross the boundary
//! as JSON strings. Pointer coordinates are client pixels.

use std::str::FromStr;

use uuid::Uuid;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::adjust::{FilterKind, TransformField};
use crate::catalogue::{self, CatalogueItem};
use crate::config::StudioConfig;
use crate::context::{Capabilities, SourceContent, SourceKey};
use crate::engine::{Action, Button, StudioCore};
use crate::export::{ExportAdapter, ExportError, ExportKind, ExportPurpose, ExportRequest};
use crate::geometry::{Point, Rect, ResizeHandle, Size};
use crate::hit::HitPart;
use crate::layers::{LayerRef, TextField, TextToggle};
use crate::probe::{ProbeError, ProbeTicket};

#[derive(Debug, thiserror::Error)]
pub enum BindingError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid layer id: {0}")]
    LayerId(#[from] uuid::Error),
    #[error("unknown layer part: {0}")]
    UnknownPart(String),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}

impl From<BindingError> for JsValue {
    fn from(err: BindingError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// Built-in reaction faces as JSON, in picker order.
#[wasm_bindgen]
pub fn reactions() -> Result<String, JsValue> {
    Ok(serde_json::to_string(&catalogue::reactions()).map_err(BindingError::from)?)
}

/// Caption font choices as JSON.
#[wasm_bindgen]
pub fn fonts() -> Result<String, JsValue> {
    Ok(serde_json::to_string(&catalogue::FONTS).map_err(BindingError::from)?)
}

/// Map a DOM `PointerEvent.button` value.
#[must_use]
pub fn map_button(button: i16) -> Button {
    match button {
        1 => Button::Middle,
        2 => Button::Secondary,
        _ => Button::Primary,
    }
}

/// `body`, `rotate`, `remove`, or a corner name such as `se`.
fn parse_part(part: &str) -> Result<HitPart, BindingError> {
    match part {
        "body" => Ok(HitPart::Body),
        "rotate" => Ok(HitPart::RotateHandle),
        "remove" => Ok(HitPart::RemoveHandle),
        other => ResizeHandle::from_str(other)
            .map(HitPart::ResizeHandle)
            .map_err(|_| BindingError::UnknownPart(other.to_string())),
    }
}

fn to_json(actions: &[Action]) -> Result<String, BindingError> {
    Ok(serde_json::to_string(actions)?)
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// Rasterizes through a JS callback: `(requestJson) => Uint8Array`.
struct JsExportAdapter<'a> {
    render: &'a js_sys::Function,
}

impl ExportAdapter for JsExportAdapter<'_> {
    fn export(&mut self, request: &ExportRequest) -> Result<Vec<u8>, ExportError> {
        let json = serde_json::to_string(request).map_err(|e| ExportError::Render(e.to_string()))?;
        let value = self
            .render
            .call1(&JsValue::NULL, &JsValue::from_str(&json))
            .map_err(|e| ExportError::Render(describe(&e)))?;
        if !value.is_instance_of::<js_sys::Uint8Array>() {
            return Err(ExportError::Render("renderer did not return a Uint8Array".into()));
        }
        Ok(js_sys::Uint8Array::new(&value).to_vec())
    }
}

#[wasm_bindgen]
pub struct Studio {
    core: StudioCore,
}

#[wasm_bindgen]
impl Studio {
    /// `config_json` is an optional partial [`StudioConfig`].
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>, multi_layer: bool) -> Result<Studio, JsValue> {
        let config = match config_json {
            Some(json) => StudioConfig::from_json(&json).map_err(BindingError::from)?,
            None => StudioConfig::default(),
        };
        Ok(Self { core: StudioCore::new(config, Capabilities { multi_layer }) })
    }

    /// Current frame as JSON.
    pub fn render_state(&self) -> Result<String, JsValue> {
        Ok(serde_json::to_string(&self.core.render_state()).map_err(BindingError::from)?)
    }

    pub fn set_viewport(&mut self, origin_x: f64, origin_y: f64, scale: f64) {
        self.core.set_viewport(origin_x, origin_y, scale);
    }

    /// Derive the viewport from the on-screen canvas element.
    pub fn set_viewport_from_element(&mut self, element: &web_sys::Element) {
        let rect = element.get_bounding_client_rect();
        let canvas = self.core.composition().canvas;
        let scale = if canvas.width > 0.0 { rect.width() / canvas.width } else { 1.0 };
        self.core.set_viewport(rect.left(), rect.top(), scale);
    }

    // --- Pointer ---

    pub fn on_pointer_down(&mut self, x: f64, y: f64, button: i16) -> Result<String, JsValue> {
        Ok(to_json(&self.core.on_pointer_down(Point::new(x, y), map_button(button)))?)
    }

    /// Pointer-down on a known element: `layer_json` is a [`LayerRef`].
    pub fn on_pointer_down_on(&mut self, layer_json: &str, part: &str, x: f64, y: f64) -> Result<String, JsValue> {
        let layer: LayerRef = serde_json::from_str(layer_json).map_err(BindingError::from)?;
        let part = parse_part(part)?;
        Ok(to_json(&self.core.on_pointer_down_on(layer, part, Point::new(x, y)))?)
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) -> Result<String, JsValue> {
        Ok(to_json(&self.core.on_pointer_move(Point::new(x, y)))?)
    }

    pub fn on_pointer_up(&mut self, x: f64, y: f64, button: i16) -> Result<String, JsValue> {
        Ok(to_json(&self.core.on_pointer_up(Point::new(x, y), map_button(button)))?)
    }

    /// Pointer cancel or window blur.
    pub fn on_pointer_cancel(&mut self) -> Result<String, JsValue> {
        Ok(to_json(&self.core.on_pointer_cancel())?)
    }

    // --- Layers ---

    pub fn select(&mut self, layer_json: Option<String>) -> Result<String, JsValue> {
        let layer = match layer_json {
            Some(json) => Some(serde_json::from_str::<LayerRef>(&json).map_err(BindingError::from)?),
            None => None,
        };
        Ok(to_json(&self.core.select(layer))?)
    }

    /// `rect_json` is an optional explicit [`Rect`].
    pub fn add_image(&mut self, source: String, rect_json: Option<String>) -> Result<String, JsValue> {
        let rect = match rect_json {
            Some(json) => Some(serde_json::from_str::<Rect>(&json).map_err(BindingError::from)?),
            None => None,
        };
        Ok(to_json(&self.core.add_image(source, rect))?)
    }

    pub fn complete_probe(&mut self, ticket_json: &str, width: f64, height: f64) -> Result<String, JsValue> {
        let ticket: ProbeTicket = serde_json::from_str(ticket_json).map_err(BindingError::from)?;
        let result = crate::probe::natural_size(width, height);
        Ok(to_json(&self.core.complete_probe(ticket, result))?)
    }

    /// The image failed to load.
    pub fn fail_probe(&mut self, ticket_json: &str, reason: String) -> Result<String, JsValue> {
        let ticket: ProbeTicket = serde_json::from_str(ticket_json).map_err(BindingError::from)?;
        Ok(to_json(&self.core.complete_probe(ticket, Err(ProbeError::Failed(reason))))?)
    }

    pub fn update_layer_rect(&mut self, id: &str, rect_json: &str) -> Result<String, JsValue> {
        let id = Uuid::parse_str(id).map_err(BindingError::from)?;
        let rect: Rect = serde_json::from_str(rect_json).map_err(BindingError::from)?;
        Ok(to_json(&self.core.update_layer_rect(&id, rect))?)
    }

    pub fn remove_layer(&mut self, id: &str) -> Result<String, JsValue> {
        let id = Uuid::parse_str(id).map_err(BindingError::from)?;
        Ok(to_json(&self.core.remove_layer(&id))?)
    }

    pub fn set_canvas_size(&mut self, width: f64, height: f64) -> Result<String, JsValue> {
        Ok(to_json(&self.core.set_canvas_size(Size::new(width, height)))?)
    }

    // --- Texts ---

    pub fn add_text(&mut self) -> Result<String, JsValue> {
        Ok(to_json(&self.core.add_text())?)
    }

    /// `field_json` is a [`TextField`], e.g. `{"field":"color","value":"#000"}`.
    pub fn update_text(&mut self, id: u32, field_json: &str) -> Result<String, JsValue> {
        let field: TextField = serde_json::from_str(field_json).map_err(BindingError::from)?;
        Ok(to_json(&self.core.update_text(id, field))?)
    }

    pub fn toggle_text(&mut self, id: u32, toggle: &str) -> Result<String, JsValue> {
        let toggle: TextToggle = serde_json::from_value(toggle.into()).map_err(BindingError::from)?;
        Ok(to_json(&self.core.toggle_text(id, toggle))?)
    }

    pub fn remove_text(&mut self, id: u32) -> Result<String, JsValue> {
        Ok(to_json(&self.core.remove_text(id))?)
    }

    // --- Adjustments ---

    /// `field_json` is a [`TransformField`], e.g. `{"field":"scale","value":150}`.
    pub fn set_transform(&mut self, field_json: &str) -> Result<String, JsValue> {
        let field: TransformField = serde_json::from_str(field_json).map_err(BindingError::from)?;
        Ok(to_json(&self.core.set_transform(field))?)
    }

    pub fn set_filter(&mut self, kind: &str, value: f64) -> Result<String, JsValue> {
        let kind: FilterKind = serde_json::from_value(kind.into()).map_err(BindingError::from)?;
        Ok(to_json(&self.core.set_filter(kind, value))?)
    }

    pub fn toggle_flip_h(&mut self) -> Result<String, JsValue> {
        Ok(to_json(&self.core.toggle_flip_h())?)
    }

    pub fn toggle_flip_v(&mut self) -> Result<String, JsValue> {
        Ok(to_json(&self.core.toggle_flip_v())?)
    }

    pub fn reset_filters(&mut self) -> Result<String, JsValue> {
        Ok(to_json(&self.core.reset_filters())?)
    }

    pub fn reset_editor(&mut self) -> Result<String, JsValue> {
        Ok(to_json(&self.core.reset_editor())?)
    }

    // --- Sources ---

    /// `key_json` is a [`SourceKey`]; `content_json` a [`SourceContent`].
    pub fn switch_to(&mut self, key_json: &str, content_json: &str) -> Result<String, JsValue> {
        let key: SourceKey = serde_json::from_str(key_json).map_err(BindingError::from)?;
        let content: SourceContent = serde_json::from_str(content_json).map_err(BindingError::from)?;
        Ok(to_json(&self.core.switch_to(key, content))?)
    }

    pub fn pick_reaction(&mut self, id: &str) -> Result<String, JsValue> {
        Ok(to_json(&self.core.pick_reaction(id))?)
    }

    pub fn pick_gallery(&mut self, id: &str) -> Result<String, JsValue> {
        Ok(to_json(&self.core.pick_gallery(id))?)
    }

    pub fn pick_template(&mut self, item_json: &str) -> Result<String, JsValue> {
        let item: CatalogueItem = serde_json::from_str(item_json).map_err(BindingError::from)?;
        Ok(to_json(&self.core.pick_template(item))?)
    }

    /// `images_json` is an array of image sources.
    pub fn open_studio(&mut self, images_json: &str) -> Result<String, JsValue> {
        let images: Vec<String> = serde_json::from_str(images_json).map_err(BindingError::from)?;
        Ok(to_json(&self.core.open_studio(images))?)
    }

    pub fn randomize(&mut self) -> Result<String, JsValue> {
        Ok(to_json(&self.core.randomize())?)
    }

    /// Switch to the gallery's selected meme.
    pub fn show_gallery(&mut self) -> Result<String, JsValue> {
        Ok(to_json(&self.core.show_gallery())?)
    }

    // --- Gallery ---

    pub fn load_gallery(&mut self, items_json: &str) -> Result<String, JsValue> {
        let items: Vec<CatalogueItem> = serde_json::from_str(items_json).map_err(BindingError::from)?;
        Ok(to_json(&self.core.load_gallery(items))?)
    }

    pub fn search_gallery(&mut self, query: &str) -> Result<String, JsValue> {
        Ok(to_json(&self.core.search_gallery(query))?)
    }

    pub fn gallery_scrolled(
        &mut self,
        scroll_top: f64,
        scroll_height: f64,
        client_height: f64,
    ) -> Result<String, JsValue> {
        Ok(to_json(&self.core.gallery_scrolled(scroll_top, scroll_height, client_height))?)
    }

    /// Visible gallery items as JSON.
    pub fn gallery_items(&self) -> Result<String, JsValue> {
        let items: Vec<&CatalogueItem> = self.core.gallery().visible().collect();
        Ok(serde_json::to_string(&items).map_err(BindingError::from)?)
    }

    /// The gallery's selected meme as JSON, `null` when none.
    pub fn gallery_selected(&self) -> Result<String, JsValue> {
        Ok(serde_json::to_string(&self.core.gallery().selected()).map_err(BindingError::from)?)
    }

    // --- Export ---

    pub fn prepare_export(&mut self, kind: &str, purpose: &str) -> Result<String, JsValue> {
        let kind = ExportKind::from_str(kind).map_err(BindingError::from)?;
        let purpose: ExportPurpose = serde_json::from_value(purpose.into()).map_err(BindingError::from)?;
        Ok(to_json(&self.core.prepare_export(kind, purpose))?)
    }

    /// Run the prepared export; `render` is called with the request JSON
    /// and must return the encoded bytes.
    pub fn run_export(&mut self, render: &js_sys::Function) -> Result<String, JsValue> {
        let mut adapter = JsExportAdapter { render };
        Ok(to_json(&self.core.run_export(&mut adapter))?)
    }
}
