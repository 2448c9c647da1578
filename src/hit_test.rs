use super::*;
use crate::config::PlacementDefaults;
use crate::geometry::Size;

fn comp_with(rect: Rect) -> (Composition, crate::layers::LayerId) {
    let mut comp = Composition::new(Size::new(500.0, 500.0));
    let (id, _) = comp.add_image_layer("a.png", Some(rect), &PlacementDefaults::default());
    (comp, id)
}

fn square() -> Rect {
    Rect::new(100.0, 100.0, 100.0, 100.0, 0.0)
}

// =============================================================
// Bodies
// =============================================================

#[test]
fn body_hit_inside_rect() {
    let (comp, id) = comp_with(square());
    let hit = hit_test(Point::new(150.0, 150.0), &comp).unwrap();
    assert_eq!(hit, Hit { layer: LayerRef::Image(id), part: HitPart::Body });
}

#[test]
fn miss_outside_every_layer() {
    let (comp, _) = comp_with(square());
    assert!(hit_test(Point::new(10.0, 10.0), &comp).is_none());
}

#[test]
fn topmost_image_wins() {
    let (mut comp, _) = comp_with(square());
    let (top, _) = comp.add_image_layer("b.png", Some(Rect::new(120.0, 120.0, 100.0, 100.0, 0.0)), &PlacementDefaults::default());
    comp.select(None);
    let hit = hit_test(Point::new(150.0, 150.0), &comp).unwrap();
    assert_eq!(hit.layer, LayerRef::Image(top));
}

#[test]
fn rotated_body_is_tested_in_local_frame() {
    let (mut comp, id) = comp_with(Rect::new(0.0, 0.0, 200.0, 20.0, 90.0));
    comp.select(None);
    // Unrotated the box spans y 0..20; rotated a quarter turn it spans y -90..110 at x 90..110.
    let hit = hit_test(Point::new(100.0, 80.0), &comp).unwrap();
    assert_eq!(hit, Hit { layer: LayerRef::Image(id), part: HitPart::Body });
    assert!(hit_test(Point::new(180.0, 10.0), &comp).is_none());
}

// =============================================================
// Handles
// =============================================================

#[test]
fn corner_handles_of_selected_layer() {
    let (comp, id) = comp_with(square());
    let cases = [
        (Point::new(100.0, 100.0), ResizeHandle::Nw),
        (Point::new(200.0, 106.0), ResizeHandle::Ne),
        (Point::new(98.0, 202.0), ResizeHandle::Sw),
        (Point::new(200.0, 200.0), ResizeHandle::Se),
    ];
    for (pt, handle) in cases {
        let hit = hit_test(pt, &comp).unwrap();
        assert_eq!(hit, Hit { layer: LayerRef::Image(id), part: HitPart::ResizeHandle(handle) }, "{pt:?}");
    }
}

#[test]
fn rotate_handle_above_top_edge() {
    let (comp, _) = comp_with(square());
    let hit = hit_test(Point::new(150.0, 75.0), &comp).unwrap();
    assert_eq!(hit.part, HitPart::RotateHandle);
}

#[test]
fn remove_badge_outside_top_right_corner() {
    let (comp, _) = comp_with(square());
    let hit = hit_test(Point::new(208.0, 92.0), &comp).unwrap();
    assert_eq!(hit.part, HitPart::RemoveHandle);
}

#[test]
fn unselected_layer_has_no_handles() {
    let (mut comp, id) = comp_with(square());
    comp.select(None);
    assert!(hit_test(Point::new(150.0, 75.0), &comp).is_none());
    let hit = hit_test(Point::new(200.0, 200.0), &comp).unwrap();
    assert_eq!(hit, Hit { layer: LayerRef::Image(id), part: HitPart::Body });
}

#[test]
fn rotated_handles_follow_rotation() {
    let (comp, _) = comp_with(Rect::new(100.0, 100.0, 100.0, 100.0, 90.0));
    // A quarter turn clockwise carries the south-east corner to the bottom-left.
    let hit = hit_test(Point::new(100.0, 200.0), &comp).unwrap();
    assert_eq!(hit.part, HitPart::ResizeHandle(ResizeHandle::Se));
}

#[test]
fn base_layer_has_no_remove_badge() {
    let mut comp = Composition::new(Size::new(500.0, 500.0));
    let base = comp.set_base_image("reaction.png");
    comp.select(Some(LayerRef::Image(base)));
    assert!(hit_test(Point::new(508.0, -8.0), &comp).is_none());
    assert_eq!(handle_at(comp.image(&base).unwrap(), Point::new(500.0, 500.0)), Some(HitPart::ResizeHandle(ResizeHandle::Se)));
}

// =============================================================
// Texts
// =============================================================

#[test]
fn text_paints_and_hits_above_images() {
    let mut comp = Composition::new(Size::new(500.0, 500.0));
    comp.add_image_layer("a.png", None, &PlacementDefaults::default());
    let t = comp.add_text_layer();
    let hit = hit_test(Point::new(250.0, 250.0), &comp).unwrap();
    assert_eq!(hit, Hit { layer: LayerRef::Text(t), part: HitPart::Body });
}

#[test]
fn text_bounds_center_on_offset() {
    let mut comp = Composition::new(Size::new(500.0, 500.0));
    let t = comp.add_text_layer();
    comp.move_text_layer(t, Point::new(0.0, -140.0));
    let b = text_bounds(comp.text(t).unwrap(), &comp);
    let c = b.center();
    assert!((c.x - 250.0).abs() < 1e-9);
    assert!((c.y - 110.0).abs() < 1e-9);
    assert!(b.width > b.height);
}

// =============================================================
// Cursors
// =============================================================

#[test]
fn part_cursors() {
    assert_eq!(HitPart::Body.cursor(), "move");
    assert_eq!(HitPart::ResizeHandle(ResizeHandle::Nw).cursor(), "nw-resize");
    assert_eq!(HitPart::RotateHandle.cursor(), "grab");
    assert_eq!(HitPart::RemoveHandle.cursor(), "pointer");
}
