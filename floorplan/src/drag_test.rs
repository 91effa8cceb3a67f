#![allow(clippy::float_cmp)]

use super::*;
use crate::config::EditorConfig;
use crate::error::InvalidStateReason;

// =============================================================
// Helpers
// =============================================================

fn viewport_at(scale: f64) -> Viewport {
    let mut vp = Viewport::new(&EditorConfig::default());
    vp.set_scale(scale);
    vp
}

/// Demo document; item 0 is the bed at [300, 100].
fn demo() -> FloorplanDocument {
    FloorplanDocument::demo()
}

// =============================================================
// begin_drag
// =============================================================

#[test]
fn begin_drag_captures_anchor() {
    let doc = demo();
    let mut drag = DragController::new();
    drag.begin_drag(&doc, 0, Point::new(40.0, 50.0), false).unwrap();

    let session = drag.session().copied().unwrap();
    assert_eq!(session.item_index, 0);
    assert_eq!(session.origin_start, Point::new(40.0, 50.0));
    assert_eq!(session.origin_position, Point::new(300.0, 100.0));
    assert_eq!(session.latest_screen, Point::new(40.0, 50.0));
    assert!(session.active);
    assert!(drag.is_active());
}

#[test]
fn begin_drag_rejected_when_read_only() {
    let doc = demo();
    let mut drag = DragController::new();
    let err = drag.begin_drag(&doc, 0, Point::default(), true).unwrap_err();
    assert_eq!(err, EditorError::InvalidState(InvalidStateReason::ReadOnly));
    assert!(!drag.is_active());
}

#[test]
fn begin_drag_rejected_for_missing_item() {
    let doc = demo();
    let mut drag = DragController::new();
    let err = drag.begin_drag(&doc, 7, Point::default(), false).unwrap_err();
    assert_eq!(err, EditorError::InvalidState(InvalidStateReason::NoSuchItem { index: 7, len: 3 }));
    assert!(drag.session().is_none());
}

#[test]
fn second_begin_drag_rejected_and_first_session_unaffected() {
    let doc = demo();
    let vp = viewport_at(1.0);
    let mut drag = DragController::new();
    drag.begin_drag(&doc, 0, Point::new(0.0, 0.0), false).unwrap();
    drag.update_pointer(Point::new(10.0, 0.0));
    let before = drag.session().copied();

    let err = drag.begin_drag(&doc, 1, Point::new(500.0, 500.0), false).unwrap_err();
    assert_eq!(err, EditorError::InvalidState(InvalidStateReason::DragActive));
    assert_eq!(drag.session().copied(), before);

    let next = drag.tick(&doc, &vp).unwrap().unwrap();
    assert_eq!(next.items[0].position, Point::new(310.0, 100.0));
    assert_eq!(next.items[1], doc.items[1]);
}

// =============================================================
// update_pointer / tick
// =============================================================

#[test]
fn update_pointer_without_session_is_noop() {
    let mut drag = DragController::new();
    drag.update_pointer(Point::new(5.0, 5.0));
    assert!(drag.session().is_none());
    assert!(!drag.has_pending_move());
}

#[test]
fn tick_without_session_is_noop() {
    let mut drag = DragController::new();
    assert_eq!(drag.tick(&demo(), &viewport_at(1.0)).unwrap(), None);
}

#[test]
fn bed_moves_half_screen_delta_at_scale_two() {
    let doc = demo();
    let vp = viewport_at(2.0);
    let mut drag = DragController::new();
    drag.begin_drag(&doc, 0, Point::new(100.0, 100.0), false).unwrap();
    drag.update_pointer(Point::new(160.0, 100.0));

    let next = drag.tick(&doc, &vp).unwrap().unwrap();
    assert_eq!(next.items[0].position, Point::new(330.0, 100.0));
}

#[test]
fn tick_is_idempotent_without_new_pointer_samples() {
    let doc = demo();
    let vp = viewport_at(1.0);
    let mut drag = DragController::new();
    drag.begin_drag(&doc, 0, Point::new(0.0, 0.0), false).unwrap();
    drag.update_pointer(Point::new(5.0, 5.0));

    assert!(drag.tick(&doc, &vp).unwrap().is_some());
    assert_eq!(drag.tick(&doc, &vp).unwrap(), None);
    assert_eq!(drag.tick(&doc, &vp).unwrap(), None);
}

#[test]
fn update_to_same_position_does_not_schedule_work() {
    let doc = demo();
    let mut drag = DragController::new();
    drag.begin_drag(&doc, 0, Point::new(3.0, 3.0), false).unwrap();
    drag.update_pointer(Point::new(3.0, 3.0));
    assert!(!drag.has_pending_move());
}

#[test]
fn many_updates_coalesce_into_one_tick() {
    let doc = demo();
    let vp = viewport_at(1.0);
    let mut drag = DragController::new();
    drag.begin_drag(&doc, 1, Point::new(0.0, 0.0), false).unwrap();
    for step in 1..=20 {
        drag.update_pointer(Point::new(f64::from(step), f64::from(step) * 2.0));
    }

    let next = drag.tick(&doc, &vp).unwrap().unwrap();
    assert_eq!(next.items[1].position, Point::new(70.0, 90.0));
    assert_eq!(drag.tick(&next, &vp).unwrap(), None);
}

#[test]
fn final_position_independent_of_intermediate_ticks() {
    let vp = viewport_at(1.5);
    let final_screen = Point::new(91.0, -33.0);

    // Path A: one tick at the end.
    let doc_a = demo();
    let mut a = DragController::new();
    a.begin_drag(&doc_a, 2, Point::new(10.0, 10.0), false).unwrap();
    a.update_pointer(Point::new(40.0, 70.0));
    a.update_pointer(final_screen);
    let end_a = a.tick(&doc_a, &vp).unwrap().unwrap();

    // Path B: ticks after every sample plus redundant ticks, feeding each
    // emitted document into the next tick.
    let mut doc_b = demo();
    let mut b = DragController::new();
    b.begin_drag(&doc_b, 2, Point::new(10.0, 10.0), false).unwrap();
    for p in [Point::new(12.0, 9.0), Point::new(40.0, 70.0), Point::new(-5.0, 0.0), final_screen] {
        b.update_pointer(p);
        if let Some(next) = b.tick(&doc_b, &vp).unwrap() {
            doc_b = next;
        }
        assert_eq!(b.tick(&doc_b, &vp).unwrap(), None);
    }

    assert_eq!(end_a.items[2].position, doc_b.items[2].position);
    let expected = Point::new(80.0 + 81.0 / 1.5, 80.0 + -43.0 / 1.5);
    assert_eq!(doc_b.items[2].position, expected);
}

#[test]
fn scale_change_mid_drag_recomputes_from_anchor() {
    let doc = demo();
    let mut vp = viewport_at(2.0);
    let mut drag = DragController::new();
    drag.begin_drag(&doc, 0, Point::new(0.0, 0.0), false).unwrap();
    drag.update_pointer(Point::new(40.0, 0.0));
    let at_two = drag.tick(&doc, &vp).unwrap().unwrap();
    assert_eq!(at_two.items[0].position, Point::new(320.0, 100.0));

    vp.set_scale(1.0);
    drag.update_pointer(Point::new(41.0, 0.0));
    let at_one = drag.tick(&at_two, &vp).unwrap().unwrap();
    assert_eq!(at_one.items[0].position, Point::new(341.0, 100.0));
}

#[test]
fn tick_reports_stale_document() {
    let doc = demo();
    let vp = viewport_at(1.0);
    let mut drag = DragController::new();
    drag.begin_drag(&doc, 2, Point::new(0.0, 0.0), false).unwrap();
    drag.update_pointer(Point::new(1.0, 1.0));

    let err = drag.tick(&FloorplanDocument::placeholder(), &vp).unwrap_err();
    assert_eq!(err, EditorError::IndexOutOfRange { index: 2, len: 0 });
}

// =============================================================
// finish / end_drag
// =============================================================

#[test]
fn finish_flushes_pending_move_then_ends() {
    let doc = demo();
    let vp = viewport_at(1.0);
    let mut drag = DragController::new();
    drag.begin_drag(&doc, 0, Point::new(0.0, 0.0), false).unwrap();
    drag.update_pointer(Point::new(25.0, -10.0));

    let flushed = drag.finish(&doc, &vp).unwrap().unwrap();
    assert_eq!(flushed.items[0].position, Point::new(325.0, 90.0));
    assert!(!drag.is_active());
    assert!(drag.session().is_none());
}

#[test]
fn finish_without_pending_move_emits_nothing() {
    let doc = demo();
    let vp = viewport_at(1.0);
    let mut drag = DragController::new();
    drag.begin_drag(&doc, 0, Point::new(0.0, 0.0), false).unwrap();
    assert_eq!(drag.finish(&doc, &vp).unwrap(), None);
    assert!(!drag.is_active());
}

#[test]
fn end_drag_is_idempotent() {
    let doc = demo();
    let mut drag = DragController::new();
    drag.begin_drag(&doc, 0, Point::new(0.0, 0.0), false).unwrap();
    assert!(drag.end_drag().is_some());
    assert!(drag.end_drag().is_none());
    assert!(!drag.is_active());
}

#[test]
fn end_drag_discards_pending_move() {
    let doc = demo();
    let vp = viewport_at(1.0);
    let mut drag = DragController::new();
    drag.begin_drag(&doc, 0, Point::new(0.0, 0.0), false).unwrap();
    drag.update_pointer(Point::new(9.0, 9.0));
    drag.end_drag();
    assert_eq!(drag.tick(&doc, &vp).unwrap(), None);
}

#[test]
fn new_drag_allowed_after_end() {
    let doc = demo();
    let mut drag = DragController::new();
    drag.begin_drag(&doc, 0, Point::new(0.0, 0.0), false).unwrap();
    drag.end_drag();
    drag.begin_drag(&doc, 1, Point::new(0.0, 0.0), false).unwrap();
    assert_eq!(drag.active_index(), Some(1));
}
