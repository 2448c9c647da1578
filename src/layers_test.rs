#![allow(clippy::float_cmp)]

use super::*;
use crate::consts::MIN_DIM;

fn defaults() -> PlacementDefaults {
    PlacementDefaults::default()
}

fn studio() -> Composition {
    Composition::new(Size::new(500.0, 500.0))
}

// =============================================================
// Image layers: add
// =============================================================

#[test]
fn first_layer_fills_canvas_and_is_selected() {
    let mut comp = studio();
    let (id, placement) = comp.add_image_layer("a.png", None, &defaults());
    assert_eq!(placement, Placement::FillCanvas);
    let layer = comp.image(&id).unwrap();
    assert_eq!(layer.rect, Rect::new(0.0, 0.0, 500.0, 500.0, 0.0));
    assert_eq!(comp.selected(), Some(LayerRef::Image(id)));
}

#[test]
fn later_layers_use_default_offset_and_fallback_size() {
    let mut comp = studio();
    comp.add_image_layer("a.png", None, &defaults());
    let (id, placement) = comp.add_image_layer("b.png", None, &defaults());
    assert_eq!(placement, Placement::Default);
    assert_eq!(comp.image(&id).unwrap().rect, Rect::new(50.0, 50.0, 200.0, 200.0, 0.0));
}

#[test]
fn given_rect_is_normalized() {
    let mut comp = studio();
    let (id, placement) = comp.add_image_layer("a.png", Some(Rect::new(1.0, 2.0, 5.0, 300.0, 15.0)), &defaults());
    assert_eq!(placement, Placement::Given);
    assert_eq!(comp.image(&id).unwrap().rect, Rect::new(1.0, 2.0, MIN_DIM, 300.0, 15.0));
}

#[test]
fn adding_layers_appends_in_paint_order() {
    let mut comp = studio();
    let (a, _) = comp.add_image_layer("a.png", None, &defaults());
    let (b, _) = comp.add_image_layer("b.png", None, &defaults());
    let ids: Vec<_> = comp.images().iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![a, b]);
    assert_eq!(comp.selected(), Some(LayerRef::Image(b)));
}

#[test]
fn layer_ids_are_unique() {
    let mut comp = studio();
    let (a, _) = comp.add_image_layer("same.png", None, &defaults());
    let (b, _) = comp.add_image_layer("same.png", None, &defaults());
    assert_ne!(a, b);
}

// =============================================================
// Image layers: natural size
// =============================================================

#[test]
fn fill_canvas_probe_resizes_canvas_with_cap() {
    let mut comp = studio();
    let (id, placement) = comp.add_image_layer("wide.png", None, &defaults());
    assert!(comp.apply_natural_size(&id, placement, Some(Size::new(1600.0, 900.0)), &defaults()));
    assert_eq!(comp.canvas, Size::new(800.0, 450.0));
    assert_eq!(comp.image(&id).unwrap().rect, Rect::new(0.0, 0.0, 800.0, 450.0, 0.0));
}

#[test]
fn fill_canvas_probe_keeps_small_images_at_natural_size() {
    let mut comp = studio();
    let (id, placement) = comp.add_image_layer("small.png", None, &defaults());
    comp.apply_natural_size(&id, placement, Some(Size::new(320.0, 240.0)), &defaults());
    assert_eq!(comp.canvas, Size::new(320.0, 240.0));
}

#[test]
fn failed_probe_falls_back_without_touching_canvas() {
    let mut comp = studio();
    let (id, placement) = comp.add_image_layer("broken.png", None, &defaults());
    comp.apply_natural_size(&id, placement, None, &defaults());
    assert_eq!(comp.canvas, Size::new(500.0, 500.0));
    let rect = comp.image(&id).unwrap().rect;
    assert_eq!((rect.width, rect.height), (200.0, 200.0));
}

#[test]
fn default_probe_fits_into_layer_box_and_keeps_position() {
    let mut comp = studio();
    comp.add_image_layer("a.png", None, &defaults());
    let (id, placement) = comp.add_image_layer("b.png", None, &defaults());
    comp.update_layer_rect(&id, Rect::new(90.0, 10.0, 200.0, 200.0, 45.0));
    comp.apply_natural_size(&id, placement, Some(Size::new(400.0, 100.0)), &defaults());
    assert_eq!(comp.image(&id).unwrap().rect, Rect::new(90.0, 10.0, 200.0, 50.0, 45.0));
    assert_eq!(comp.canvas, Size::new(500.0, 500.0));
}

#[test]
fn probe_for_removed_layer_reports_missing() {
    let mut comp = studio();
    let (id, placement) = comp.add_image_layer("a.png", None, &defaults());
    comp.remove_layer(&id);
    assert!(!comp.apply_natural_size(&id, placement, Some(Size::new(10.0, 10.0)), &defaults()));
    assert_eq!(comp.canvas, Size::new(500.0, 500.0));
}

// =============================================================
// Image layers: update / remove
// =============================================================

#[test]
fn update_rect_replaces_and_clamps() {
    let mut comp = studio();
    let (id, _) = comp.add_image_layer("a.png", None, &defaults());
    assert!(comp.update_layer_rect(&id, Rect::new(5.0, 5.0, 0.0, -4.0, 0.0)));
    assert_eq!(comp.image(&id).unwrap().rect, Rect::new(5.0, 5.0, MIN_DIM, MIN_DIM, 0.0));
}

#[test]
fn update_rect_unknown_id_is_noop() {
    let mut comp = studio();
    comp.add_image_layer("a.png", None, &defaults());
    let before = comp.clone();
    assert!(!comp.update_layer_rect(&Uuid::new_v4(), Rect::new(1.0, 1.0, 50.0, 50.0, 0.0)));
    assert_eq!(comp, before);
}

#[test]
fn remove_selected_layer_clears_selection() {
    let mut comp = studio();
    let (id, _) = comp.add_image_layer("a.png", None, &defaults());
    assert!(comp.remove_layer(&id).is_some());
    assert!(comp.images().is_empty());
    assert_eq!(comp.selected(), None);
}

#[test]
fn remove_other_layer_keeps_selection() {
    let mut comp = studio();
    let (a, _) = comp.add_image_layer("a.png", None, &defaults());
    let (b, _) = comp.add_image_layer("b.png", None, &defaults());
    comp.remove_layer(&a);
    assert_eq!(comp.selected(), Some(LayerRef::Image(b)));
}

#[test]
fn remove_unknown_layer_is_noop() {
    let mut comp = studio();
    assert!(comp.remove_layer(&Uuid::new_v4()).is_none());
}

#[test]
fn adding_after_removing_everything_uses_default_placement() {
    let mut comp = studio();
    let (a, _) = comp.add_image_layer("a.png", None, &defaults());
    comp.remove_layer(&a);
    let (_, placement) = comp.add_image_layer("b.png", None, &defaults());
    assert_eq!(placement, Placement::Default);
}

#[test]
fn clear_images_restarts_composition() {
    let mut comp = studio();
    comp.add_image_layer("a.png", None, &defaults());
    comp.clear_images();
    assert!(comp.images().is_empty());
    assert_eq!(comp.selected(), None);
    let (_, placement) = comp.add_image_layer("b.png", None, &defaults());
    assert_eq!(placement, Placement::FillCanvas);
}

#[test]
fn base_image_replaces_layers() {
    let mut comp = studio();
    comp.add_image_layer("a.png", None, &defaults());
    comp.add_image_layer("b.png", None, &defaults());
    let base = comp.set_base_image("reaction.png");
    assert_eq!(comp.images().len(), 1);
    let layer = comp.image(&base).unwrap();
    assert!(layer.base);
    assert_eq!(layer.rect, Rect::new(0.0, 0.0, 500.0, 500.0, 0.0));
    assert_eq!(comp.selected(), None);
}

// =============================================================
// Selection
// =============================================================

#[test]
fn selecting_b_deselects_a() {
    let mut comp = studio();
    let (a, _) = comp.add_image_layer("a.png", None, &defaults());
    let (b, _) = comp.add_image_layer("b.png", None, &defaults());
    comp.select(Some(LayerRef::Image(a)));
    comp.select(Some(LayerRef::Image(b)));
    assert!(!comp.is_selected(LayerRef::Image(a)));
    assert!(comp.is_selected(LayerRef::Image(b)));
    let selected = comp.images().iter().filter(|l| comp.is_selected(LayerRef::Image(l.id))).count();
    assert_eq!(selected, 1);
}

#[test]
fn select_is_idempotent() {
    let mut comp = studio();
    let (a, _) = comp.add_image_layer("a.png", None, &defaults());
    comp.select(Some(LayerRef::Image(a)));
    comp.select(Some(LayerRef::Image(a)));
    assert_eq!(comp.selected(), Some(LayerRef::Image(a)));
    comp.select(None);
    comp.select(None);
    assert_eq!(comp.selected(), None);
}

#[test]
fn select_missing_layer_selects_nothing() {
    let mut comp = studio();
    comp.select(Some(LayerRef::Text(99)));
    assert_eq!(comp.selected(), None);
}

#[test]
fn text_selection_deselects_image() {
    let mut comp = studio();
    let (a, _) = comp.add_image_layer("a.png", None, &defaults());
    let t = comp.add_text_layer();
    comp.select(Some(LayerRef::Text(t)));
    assert!(!comp.is_selected(LayerRef::Image(a)));
    assert!(comp.is_selected(LayerRef::Text(t)));
}

// =============================================================
// Text layers
// =============================================================

#[test]
fn add_text_layer_uses_defaults() {
    let mut comp = studio();
    let id = comp.add_text_layer();
    assert_eq!(id, 1);
    let t = comp.text(id).unwrap();
    assert_eq!(t.content, "TEXT");
    assert_eq!((t.x, t.y), (0.0, 0.0));
    assert_eq!(t.font_size, 32.0);
    assert!(t.bold);
    assert!(t.stroke);
    assert!(!t.italic);
    assert_eq!(t.font_family, "Impact");
}

#[test]
fn text_ids_are_max_plus_one() {
    let mut comp = studio();
    comp.replace_texts(TextLayer::default_captions());
    comp.remove_text_layer(1);
    assert_eq!(comp.add_text_layer(), 3);
    comp.remove_text_layer(3);
    comp.remove_text_layer(2);
    assert_eq!(comp.add_text_layer(), 1);
}

#[test]
fn update_text_fields() {
    let mut comp = studio();
    let id = comp.add_text_layer();
    assert!(comp.update_text_layer(id, TextField::Content("WHEN THE CODE COMPILES".into())));
    assert!(comp.update_text_layer(id, TextField::Color("#ff0000".into())));
    assert!(comp.update_text_layer(id, TextField::FontSize(48.0)));
    assert!(comp.update_text_layer(id, TextField::FontFamily("Arial".into())));
    assert!(comp.update_text_layer(id, TextField::Italic(true)));
    let t = comp.text(id).unwrap();
    assert_eq!(t.content, "WHEN THE CODE COMPILES");
    assert_eq!(t.color, "#ff0000");
    assert_eq!(t.font_size, 48.0);
    assert_eq!(t.font_family, "Arial");
    assert_eq!(t.font_style(), "italic");
}

#[test]
fn update_text_rejects_invalid_font_size() {
    let mut comp = studio();
    let id = comp.add_text_layer();
    assert!(!comp.update_text_layer(id, TextField::FontSize(0.0)));
    assert_eq!(comp.text(id).unwrap().font_size, 32.0);
}

#[test]
fn update_unknown_text_is_noop() {
    let mut comp = studio();
    assert!(!comp.update_text_layer(7, TextField::Bold(false)));
    assert!(!comp.toggle_text_style(7, TextToggle::Bold));
    assert!(!comp.move_text_layer(7, Point::new(1.0, 1.0)));
    assert!(comp.remove_text_layer(7).is_none());
}

#[test]
fn toggle_text_styles() {
    let mut comp = studio();
    let id = comp.add_text_layer();
    comp.toggle_text_style(id, TextToggle::Bold);
    comp.toggle_text_style(id, TextToggle::Stroke);
    comp.toggle_text_style(id, TextToggle::Italic);
    let t = comp.text(id).unwrap();
    assert_eq!(t.font_weight(), "normal");
    assert!(!t.stroke);
    assert!(t.italic);
}

#[test]
fn default_captions_pair() {
    let caps = TextLayer::default_captions();
    assert_eq!(caps.len(), 2);
    assert_eq!(caps[0].content, "TOP TEXT");
    assert_eq!(caps[0].y, -140.0);
    assert_eq!(caps[1].content, "BOTTOM TEXT");
    assert_eq!(caps[1].y, 140.0);
    assert!(caps.iter().all(|c| c.font_size == 40.0));
}

#[test]
fn texts_paint_above_images() {
    let mut comp = studio();
    let (a, _) = comp.add_image_layer("a.png", None, &defaults());
    let t = comp.add_text_layer();
    let (b, _) = comp.add_image_layer("b.png", None, &defaults());
    let order = comp.paint_order();
    let layers: Vec<_> = order.iter().map(|p| p.layer).collect();
    assert_eq!(layers, vec![LayerRef::Image(a), LayerRef::Image(b), LayerRef::Text(t)]);
    assert!(order.windows(2).all(|w| w[0].z_index < w[1].z_index));
    assert_eq!(order[2].z_index, 11);
}

#[test]
fn replace_texts_returns_previous_and_clears_text_selection() {
    let mut comp = studio();
    let id = comp.add_text_layer();
    comp.select(Some(LayerRef::Text(id)));
    let old = comp.replace_texts(TextLayer::default_captions());
    assert_eq!(old.len(), 1);
    assert_eq!(comp.texts().len(), 2);
    assert_eq!(comp.selected(), None);
}

#[test]
fn composition_serializes_layers() {
    let mut comp = studio();
    comp.add_image_layer("a.png", None, &defaults());
    comp.add_text_layer();
    let json = serde_json::to_value(&comp).unwrap();
    assert_eq!(json["canvas"]["width"], 500.0);
    assert_eq!(json["images"][0]["source"], "a.png");
    assert_eq!(json["texts"][0]["content"], "TEXT");
    assert_eq!(json["selected"]["kind"], "image");
}
