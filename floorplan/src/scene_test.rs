#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::{Item, ItemKind, RoomShape, Wall};

fn identity() -> ViewTransform {
    ViewTransform { pan_x: 0.0, pan_y: 0.0, scale: 1.0 }
}

// =============================================================
// Labels
// =============================================================

#[test]
fn length_label_rounds_to_whole_centimeters() {
    assert_eq!(format_length(400.0), "400 cm");
    assert_eq!(format_length(399.5), "400 cm");
    assert_eq!(format_length(80.49), "80 cm");
    assert_eq!(format_length(-0.2), "0 cm");
}

#[test]
fn dimensions_label_rounds_both_sides() {
    assert_eq!(format_dimensions(120.0, 200.0), "120 × 200");
    assert_eq!(format_dimensions(59.6, 60.4), "60 × 60");
}

// =============================================================
// Walls
// =============================================================

#[test]
fn wall_strokes_by_kind() {
    assert_eq!(wall_stroke(WallKind::Wall), Stroke { color: "#333", width: 5.0 });
    assert_eq!(wall_stroke(WallKind::Window), Stroke { color: "#60a5fa", width: 3.0 });
    assert_eq!(wall_stroke(WallKind::Door), Stroke { color: "#fbbf24", width: 3.0 });
}

#[test]
fn demo_walls_carry_length_and_midpoint() {
    let scene = build_scene(&FloorplanDocument::demo(), identity(), None, false);
    assert_eq!(scene.walls.len(), 6);

    let top = &scene.walls[0];
    assert_eq!(top.length, 400.0);
    assert_eq!(top.length_label, "400 cm");
    assert_eq!(top.label_anchor, Point::new(200.0, 0.0));

    let window = &scene.walls[4];
    assert_eq!(window.kind, WallKind::Window);
    assert_eq!(window.length_label, "80 cm");
    assert_eq!(window.stroke.color, "#60a5fa");
}

#[test]
fn diagonal_wall_length_is_euclidean() {
    let doc = FloorplanDocument::new(
        RoomShape::Polygon,
        Dimensions::new(100.0, 100.0),
        vec![Wall::new(Point::new(0.0, 0.0), Point::new(30.0, 40.0), WallKind::Wall)],
        vec![],
    );
    let scene = build_scene(&doc, identity(), None, false);
    assert_eq!(scene.walls[0].length_label, "50 cm");
}

// =============================================================
// Items
// =============================================================

#[test]
fn items_use_idle_style_without_highlight() {
    let scene = build_scene(&FloorplanDocument::demo(), identity(), None, false);
    for item in &scene.items {
        assert_eq!(item.fill, "#fff");
        assert_eq!(item.stroke, Stroke { color: "#94a3b8", width: 2.0 });
        assert!(!item.highlighted);
        assert!(item.draggable);
        assert_eq!(item.corner_radius, 4.0);
    }
}

#[test]
fn highlighted_item_uses_active_style() {
    let scene = build_scene(&FloorplanDocument::demo(), identity(), Some(1), false);
    assert!(scene.items[1].highlighted);
    assert_eq!(scene.items[1].fill, "#eff6ff");
    assert_eq!(scene.items[1].stroke.color, "#3b82f6");
    assert!(!scene.items[0].highlighted);
    assert_eq!(scene.items[0].fill, "#fff");
}

#[test]
fn read_only_items_are_not_draggable() {
    let scene = build_scene(&FloorplanDocument::demo(), identity(), None, true);
    assert!(scene.items.iter().all(|i| !i.draggable));
}

#[test]
fn item_labels_and_dimensions() {
    let doc = FloorplanDocument::new(
        RoomShape::Rectangle,
        Dimensions::new(300.0, 300.0),
        vec![],
        vec![
            Item::new(ItemKind::Sofa, Point::new(100.0, 100.0)).with_size(180.4, 90.0),
            Item::new(ItemKind::Desk, Point::new(200.0, 200.0)).with_label("Work desk"),
        ],
    );
    let scene = build_scene(&doc, identity(), None, false);
    assert_eq!(scene.items[0].label, "sofa");
    assert_eq!(scene.items[0].dimensions_label, "180 × 90");
    assert_eq!(scene.items[1].label, "Work desk");
    assert_eq!(scene.items[1].dimensions_label, "60 × 60");
}

#[test]
fn item_shape_carries_rotated_corners() {
    let doc = FloorplanDocument::demo();
    let scene = build_scene(&doc, identity(), None, false);
    assert_eq!(scene.items[0].corners, doc.items[0].corners());
    assert_eq!(scene.items[0].rotation, 90.0);
}

// =============================================================
// View box and grid
// =============================================================

#[test]
fn view_box_pads_room_by_fifty() {
    let scene = build_scene(&FloorplanDocument::demo(), identity(), None, false);
    assert_eq!(scene.view_box, ViewBox { x: -50.0, y: -50.0, width: 500.0, height: 400.0 });
    assert_eq!(scene.grid, Grid { cell: 50.0, color: "#f0f0f0" });
}

#[test]
fn scene_carries_transform() {
    let t = ViewTransform { pan_x: 12.0, pan_y: 34.0, scale: 1.5 };
    let scene = build_scene(&FloorplanDocument::placeholder(), t, None, false);
    assert_eq!(scene.transform, t);
    assert!(scene.walls.is_empty());
    assert!(scene.items.is_empty());
}
