#![allow(clippy::float_cmp)]

use std::cell::RefCell;
use std::rc::Rc;

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn recorder(viewport: &mut Viewport) -> (SubscriptionId, Rc<RefCell<Vec<ViewTransform>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let id = viewport.subscribe(move |t| sink.borrow_mut().push(t));
    (id, seen)
}

// --- ViewTransform ---

#[test]
fn screen_to_room_with_pan_and_scale() {
    let t = ViewTransform { pan_x: 100.0, pan_y: 50.0, scale: 2.0 };
    let room = t.screen_to_room(Point::new(300.0, 250.0));
    assert!(point_approx_eq(room, Point::new(100.0, 100.0)));
}

#[test]
fn room_to_screen_inverts_screen_to_room() {
    let t = ViewTransform { pan_x: -37.5, pan_y: 12.0, scale: 1.5 };
    let p = Point::new(123.0, -45.0);
    assert!(point_approx_eq(t.screen_to_room(t.room_to_screen(p)), p));
}

#[test]
fn screen_dist_to_room_divides_by_scale() {
    let t = ViewTransform { pan_x: 10.0, pan_y: 10.0, scale: 4.0 };
    assert_eq!(t.screen_dist_to_room(8.0), 2.0);
}

// --- ScaleLimits ---

#[test]
fn limits_order_bounds() {
    let limits = ScaleLimits::new(8.0, 0.2);
    assert_eq!(limits.min(), 0.2);
    assert_eq!(limits.max(), 8.0);
}

#[test]
fn limits_clamp() {
    let limits = ScaleLimits::new(0.2, 8.0);
    assert_eq!(limits.clamp(0.01), 0.2);
    assert_eq!(limits.clamp(100.0), 8.0);
    assert_eq!(limits.clamp(3.0), 3.0);
    assert_eq!(limits.clamp(f64::NAN), 0.2);
}

#[test]
fn limits_keep_lower_bound_positive() {
    let limits = ScaleLimits::new(-1.0, 2.0);
    assert!(limits.min() > 0.0);
    assert_eq!(limits.max(), 2.0);
}

// --- Viewport defaults ---

#[test]
fn viewport_starts_at_initial_scale() {
    let vp = Viewport::default();
    assert_eq!(vp.scale(), 1.5);
    assert_eq!(vp.transform().pan_x, 0.0);
    assert_eq!(vp.transform().pan_y, 0.0);
}

// --- set_scale ---

#[test]
fn set_scale_clamps_to_limits() {
    let mut vp = Viewport::default();
    vp.set_scale(50.0);
    assert_eq!(vp.scale(), 8.0);
    vp.set_scale(0.0);
    assert_eq!(vp.scale(), 0.2);
}

#[test]
fn set_scale_notifies_subscribers() {
    let mut vp = Viewport::default();
    let (_, seen) = recorder(&mut vp);
    vp.set_scale(2.0);
    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].scale, 2.0);
}

#[test]
fn set_scale_without_change_is_silent() {
    let mut vp = Viewport::default();
    let (_, seen) = recorder(&mut vp);
    vp.set_scale(1.5);
    vp.set_scale(9.0);
    vp.set_scale(12.0);
    // Only the first clamp to 8 changes anything.
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn unsubscribe_stops_notifications() {
    let mut vp = Viewport::default();
    let (id, seen) = recorder(&mut vp);
    assert!(vp.unsubscribe(id));
    assert!(!vp.unsubscribe(id));
    vp.set_scale(3.0);
    assert!(seen.borrow().is_empty());
}

// --- screen_delta_to_room_delta ---

#[test]
fn screen_delta_divides_by_scale() {
    let mut vp = Viewport::default();
    vp.set_scale(2.0);
    assert_eq!(vp.screen_delta_to_room_delta(60.0, -20.0), (30.0, -10.0));
}

#[test]
fn screen_delta_ignores_pan() {
    let mut vp = Viewport::default();
    vp.set_scale(2.0);
    vp.pan_by(500.0, -300.0);
    assert_eq!(vp.screen_delta_to_room_delta(60.0, 0.0), (30.0, 0.0));
}

#[test]
fn halving_scale_doubles_room_delta() {
    let mut vp = Viewport::default();
    vp.set_scale(4.0);
    let (at_four, _) = vp.screen_delta_to_room_delta(40.0, 0.0);
    vp.set_scale(2.0);
    let (at_two, _) = vp.screen_delta_to_room_delta(40.0, 0.0);
    assert_eq!(at_two, at_four * 2.0);
}

// --- Pan and zoom ---

#[test]
fn pan_by_accumulates() {
    let mut vp = Viewport::default();
    vp.pan_by(10.0, 5.0);
    vp.pan_by(-4.0, 5.0);
    assert_eq!(vp.transform().pan_x, 6.0);
    assert_eq!(vp.transform().pan_y, 10.0);
}

#[test]
fn zoom_at_keeps_anchor_fixed() {
    let mut vp = Viewport::default();
    vp.pan_by(30.0, 40.0);
    let anchor = Point::new(200.0, 150.0);
    let before = vp.screen_to_room(anchor);
    vp.zoom_at(anchor, 4.0);
    assert_eq!(vp.scale(), 4.0);
    assert!(point_approx_eq(vp.room_to_screen(before), anchor));
}

#[test]
fn zoom_at_clamps_scale() {
    let mut vp = Viewport::default();
    vp.zoom_at(Point::new(0.0, 0.0), 1000.0);
    assert_eq!(vp.scale(), 8.0);
}

#[test]
fn wheel_up_zooms_in_by_step() {
    let mut vp = Viewport::default();
    vp.wheel(Point::new(0.0, 0.0), -120.0);
    assert!(approx_eq(vp.scale(), 1.6));
    vp.wheel(Point::new(0.0, 0.0), 120.0);
    assert!(approx_eq(vp.scale(), 1.5));
}

#[test]
fn wheel_zero_delta_is_noop() {
    let mut vp = Viewport::default();
    let (_, seen) = recorder(&mut vp);
    vp.wheel(Point::new(10.0, 10.0), 0.0);
    assert!(seen.borrow().is_empty());
}

#[test]
fn zoom_in_out_step_around_center() {
    let mut vp = Viewport::default();
    vp.set_viewport_size(800.0, 600.0);
    let center_room = vp.screen_to_room(Point::new(400.0, 300.0));
    vp.zoom_in();
    assert!(approx_eq(vp.scale(), 1.6));
    assert!(point_approx_eq(vp.room_to_screen(center_room), Point::new(400.0, 300.0)));
    vp.zoom_out();
    vp.zoom_out();
    assert!(approx_eq(vp.scale(), 1.4));
}

#[test]
fn zoom_out_stops_at_minimum() {
    let mut vp = Viewport::default();
    for _ in 0..100 {
        vp.zoom_out();
    }
    assert_eq!(vp.scale(), 0.2);
}

// --- center_on / reset ---

#[test]
fn center_on_places_room_center_at_viewport_center() {
    let mut vp = Viewport::default();
    vp.center_on(400.0, 300.0, 1000.0, 800.0);
    let mid = vp.room_to_screen(Point::new(200.0, 150.0));
    assert!(point_approx_eq(mid, Point::new(500.0, 400.0)));
}

#[test]
fn reset_restores_initial_scale_and_centering() {
    let mut vp = Viewport::default();
    vp.center_on(400.0, 300.0, 1000.0, 800.0);
    let centered = vp.transform();
    vp.zoom_at(Point::new(10.0, 10.0), 5.0);
    vp.pan_by(-200.0, 90.0);
    vp.reset();
    assert_eq!(vp.transform(), centered);
}

#[test]
fn reset_without_room_returns_to_origin() {
    let mut vp = Viewport::default();
    vp.pan_by(10.0, 10.0);
    vp.set_scale(3.0);
    vp.reset();
    assert_eq!(vp.transform(), ViewTransform { pan_x: 0.0, pan_y: 0.0, scale: 1.5 });
}

#[test]
fn viewport_uses_config_limits() {
    let config = EditorConfig { min_scale: 1.0, max_scale: 2.0, initial_scale: 1.0, ..EditorConfig::default() };
    let mut vp = Viewport::new(&config);
    vp.set_scale(5.0);
    assert_eq!(vp.scale(), 2.0);
}
