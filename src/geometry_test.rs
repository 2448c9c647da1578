#![allow(clippy::float_cmp)]

use super::*;

fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
    Rect::new(x, y, w, h, 0.0)
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// =============================================================
// move_rect
// =============================================================

#[test]
fn move_translates_origin_only() {
    let r = move_rect(Rect::new(10.0, 20.0, 100.0, 80.0, 30.0), 5.0, -7.0);
    assert_eq!(r, Rect::new(15.0, 13.0, 100.0, 80.0, 30.0));
}

#[test]
fn move_zero_delta_is_identity() {
    let start = rect(3.0, 4.0, 50.0, 60.0);
    assert_eq!(move_rect(start, 0.0, 0.0), start);
}

#[test]
fn move_steps_sum_to_single_move() {
    let start = rect(10.0, 10.0, 40.0, 40.0);
    let steps = [(3.0, -1.0), (12.5, 4.0), (-6.0, 9.5)];
    let stepped = steps.iter().fold(start, |r, (dx, dy)| move_rect(r, *dx, *dy));
    let (sx, sy) = steps.iter().fold((0.0, 0.0), |(ax, ay), (dx, dy)| (ax + dx, ay + dy));
    let once = move_rect(start, sx, sy);
    assert!(approx(stepped.x, once.x));
    assert!(approx(stepped.y, once.y));
    assert_eq!(stepped.width, once.width);
    assert_eq!(stepped.height, once.height);
}

// =============================================================
// resize_rect
// =============================================================

#[test]
fn resize_se_grows_both_axes() {
    let r = resize_rect(rect(10.0, 20.0, 100.0, 80.0), ResizeHandle::Se, 20.0, 20.0);
    assert_eq!(r, rect(10.0, 20.0, 120.0, 100.0));
}

#[test]
fn resize_nw_moves_origin_and_shrinks() {
    let r = resize_rect(rect(10.0, 20.0, 100.0, 80.0), ResizeHandle::Nw, 20.0, 20.0);
    assert_eq!(r, rect(30.0, 40.0, 80.0, 60.0));
}

#[test]
fn resize_n_only_changes_y_and_height() {
    let r = resize_rect(rect(10.0, 20.0, 100.0, 80.0), ResizeHandle::N, 33.0, 10.0);
    assert_eq!(r, rect(10.0, 30.0, 100.0, 70.0));
}

#[test]
fn resize_s_only_changes_height() {
    let r = resize_rect(rect(0.0, 0.0, 50.0, 50.0), ResizeHandle::S, 99.0, 20.0);
    assert_eq!(r, rect(0.0, 0.0, 50.0, 70.0));
}

#[test]
fn resize_ne_changes_y_height_and_width() {
    let r = resize_rect(rect(0.0, 10.0, 50.0, 50.0), ResizeHandle::Ne, 10.0, -5.0);
    assert_eq!(r, rect(0.0, 5.0, 60.0, 55.0));
}

#[test]
fn resize_sw_changes_x_width_and_height() {
    let r = resize_rect(rect(10.0, 0.0, 50.0, 50.0), ResizeHandle::Sw, -5.0, 10.0);
    assert_eq!(r, rect(5.0, 0.0, 55.0, 60.0));
}

#[test]
fn resize_e_never_changes_x() {
    for dx in [-500.0, -30.0, 0.0, 17.0, 400.0] {
        let r = resize_rect(rect(12.0, 0.0, 100.0, 50.0), ResizeHandle::E, dx, 8.0);
        assert_eq!(r.x, 12.0);
        assert_eq!(r.y, 0.0);
    }
}

#[test]
fn resize_w_shifts_x_by_negative_width_delta() {
    let start = rect(10.0, 0.0, 100.0, 50.0);
    for dx in [-40.0, -1.5, 0.0, 25.0, 60.0] {
        let r = resize_rect(start, ResizeHandle::W, dx, 0.0);
        assert!(approx(r.x - start.x, -(r.width - start.width)));
    }
}

#[test]
fn resize_floor_holds_for_every_handle() {
    let start = rect(0.0, 0.0, 50.0, 50.0);
    for handle in ResizeHandle::ALL {
        for (dx, dy) in [(1e6, 1e6), (-1e6, -1e6), (1e6, -1e6), (-1e6, 1e6)] {
            let r = resize_rect(start, handle, dx, dy);
            assert!(r.width >= MIN_DIM, "{handle} width {}", r.width);
            assert!(r.height >= MIN_DIM, "{handle} height {}", r.height);
        }
    }
}

#[test]
fn resize_clamp_keeps_origin_on_delta_path() {
    // West edge dragged 90 right of a 100-wide box: width clamps to 20
    // but x still follows the pointer.
    let r = resize_rect(rect(10.0, 0.0, 100.0, 50.0), ResizeHandle::W, 90.0, 0.0);
    assert_eq!(r.width, MIN_DIM);
    assert_eq!(r.x, 100.0);
}

#[test]
fn resize_zero_delta_is_identity_for_all_handles() {
    let start = Rect::new(5.0, 6.0, 70.0, 80.0, 12.0);
    for handle in ResizeHandle::ALL {
        assert_eq!(resize_rect(start, handle, 0.0, 0.0), start);
    }
}

// =============================================================
// rotate_rect
// =============================================================

#[test]
fn rotate_pointer_above_center_is_zero() {
    let r = rotate_rect(rect(0.0, 0.0, 100.0, 80.0), Point::new(50.0, 40.0), Point::new(50.0, -60.0));
    assert!(r.rotation.abs() < 1e-9);
}

#[test]
fn rotate_compass_points() {
    let start = rect(0.0, 0.0, 100.0, 80.0);
    let c = Point::new(50.0, 40.0);
    assert!(approx(rotate_rect(start, c, Point::new(150.0, 40.0)).rotation, 90.0));
    assert!(approx(rotate_rect(start, c, Point::new(50.0, 140.0)).rotation, 180.0));
    assert!(approx(rotate_rect(start, c, Point::new(-50.0, 40.0)).rotation, 270.0));
}

#[test]
fn rotate_upper_left_wraps_into_range() {
    let r = rotate_rect(rect(0.0, 0.0, 10.0, 10.0), Point::new(0.0, 0.0), Point::new(-1.0, -1.0));
    assert!(approx(r.rotation, 315.0));
}

#[test]
fn rotate_keeps_position_and_size() {
    let start = rect(7.0, 8.0, 30.0, 40.0);
    let r = rotate_rect(start, Point::new(22.0, 28.0), Point::new(100.0, 100.0));
    assert_eq!((r.x, r.y, r.width, r.height), (7.0, 8.0, 30.0, 40.0));
}

#[test]
fn rotate_pointer_at_center_is_finite() {
    let r = rotate_rect(rect(0.0, 0.0, 10.0, 10.0), Point::new(5.0, 5.0), Point::new(5.0, 5.0));
    assert!(r.rotation.is_finite());
}

#[test]
fn normalize_degrees_wraps_negative_and_large() {
    assert!(approx(normalize_degrees(-90.0), 270.0));
    assert!(approx(normalize_degrees(450.0), 90.0));
    assert_eq!(normalize_degrees(360.0), 0.0);
}

// =============================================================
// Size / Rect helpers
// =============================================================

#[test]
fn fit_within_caps_longest_side() {
    assert_eq!(Size::new(1600.0, 900.0).fit_within(800.0), Size::new(800.0, 450.0));
    assert_eq!(Size::new(600.0, 1200.0).fit_within(800.0), Size::new(400.0, 800.0));
}

#[test]
fn fit_within_never_upscales() {
    assert_eq!(Size::new(300.0, 200.0).fit_within(800.0), Size::new(300.0, 200.0));
}

#[test]
fn normalized_clamps_degenerate_rects() {
    let r = Rect::new(f64::NAN, 4.0, 0.0, -10.0, f64::INFINITY).normalized();
    assert_eq!(r, Rect::new(0.0, 4.0, MIN_DIM, MIN_DIM, 0.0));
}

#[test]
fn local_frame_of_rotated_box() {
    let r = Rect::new(0.0, 0.0, 100.0, 50.0, 90.0);
    // After a quarter turn clockwise the local top-left sits at canvas (75, -25).
    let tl = r.to_canvas(Point::new(0.0, 0.0));
    assert!(approx(tl.x, 75.0));
    assert!(approx(tl.y, -25.0));
    let back = r.to_local(tl);
    assert!(back.x.abs() < 1e-9 && back.y.abs() < 1e-9);
}

#[test]
fn handle_parse_and_display() {
    assert_eq!("se".parse::<ResizeHandle>(), Ok(ResizeHandle::Se));
    assert_eq!(ResizeHandle::Nw.to_string(), "nw");
    assert_eq!(ResizeHandle::Ne.cursor(), "ne-resize");
    assert!("north".parse::<ResizeHandle>().is_err());
}

#[test]
fn handle_serde_uses_lowercase_names() {
    let json = serde_json::to_string(&ResizeHandle::Sw).unwrap();
    assert_eq!(json, "\"sw\"");
}
