//! Scene builder: a backend-neutral description of what to draw.
//!
//! [`build_scene`] is a pure function of the document, the view transform, the
//! highlighted (dragged) item, and the read-only flag. The Canvas2D backend in
//! [`crate::render`] and the SVG exporter in [`crate::svg`] both consume the
//! resulting [`Scene`], so styling decisions live in one place.
//!
//! All geometry in a `Scene` is in room units. Backends apply `transform`.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use crate::consts::{
    DOOR_COLOR, GRID_COLOR, GRID_SIZE_CM, ITEM_CORNER_RADIUS_CM, ITEM_FILL, ITEM_FILL_ACTIVE, ITEM_STROKE,
    ITEM_STROKE_ACTIVE, ITEM_STROKE_WIDTH_CM, OPENING_STROKE_WIDTH, VIEW_PADDING_CM, WALL_COLOR, WALL_STROKE_WIDTH,
    WINDOW_COLOR,
};
use crate::doc::{Dimensions, FloorplanDocument, Point, WallKind};
use crate::viewport::ViewTransform;

/// Item label font size in room units.
pub const LABEL_FONT_SIZE: f64 = 10.0;

/// Stroke color and width in room units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: &'static str,
    pub width: f64,
}

/// A wall, window, or door segment ready to draw (round caps).
#[derive(Debug, Clone, PartialEq)]
pub struct WallShape {
    pub index: usize,
    pub kind: WallKind,
    pub start: Point,
    pub end: Point,
    pub stroke: Stroke,
    pub length: f64,
    /// Rounded length, e.g. `"400 cm"`.
    pub length_label: String,
    pub label_anchor: Point,
}

/// An item box ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemShape {
    pub index: usize,
    pub center: Point,
    pub width: f64,
    pub height: f64,
    /// Clockwise degrees about `center`.
    pub rotation: f64,
    /// Rotated footprint, for backends that draw polygons.
    pub corners: [Point; 4],
    pub corner_radius: f64,
    pub fill: &'static str,
    pub stroke: Stroke,
    pub label: String,
    /// Rounded footprint, e.g. `"120 × 200"`.
    pub dimensions_label: String,
    /// The item is the target of the active drag.
    pub highlighted: bool,
    /// Pointer-down on the item starts a drag.
    pub draggable: bool,
}

/// Visible room-space rectangle: the room padded on every side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Background grid covering the view box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub cell: f64,
    pub color: &'static str,
}

/// Everything a backend needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub transform: ViewTransform,
    pub room: Dimensions,
    pub view_box: ViewBox,
    pub grid: Grid,
    /// Draw order: first to last.
    pub walls: Vec<WallShape>,
    /// Draw order: first to last, drawn above walls.
    pub items: Vec<ItemShape>,
}

/// Build the scene for one frame.
#[must_use]
pub fn build_scene(
    doc: &FloorplanDocument,
    transform: ViewTransform,
    highlight: Option<usize>,
    read_only: bool,
) -> Scene {
    let walls = doc
        .walls
        .iter()
        .enumerate()
        .map(|(index, wall)| {
            let length = wall.length();
            WallShape {
                index,
                kind: wall.kind,
                start: wall.start,
                end: wall.end,
                stroke: wall_stroke(wall.kind),
                length,
                length_label: format_length(length),
                label_anchor: wall.midpoint(),
            }
        })
        .collect();

    let items = doc
        .items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let highlighted = highlight == Some(index);
            ItemShape {
                index,
                center: item.position,
                width: item.width,
                height: item.height,
                rotation: item.rotation,
                corners: item.corners(),
                corner_radius: ITEM_CORNER_RADIUS_CM,
                fill: if highlighted { ITEM_FILL_ACTIVE } else { ITEM_FILL },
                stroke: Stroke {
                    color: if highlighted { ITEM_STROKE_ACTIVE } else { ITEM_STROKE },
                    width: ITEM_STROKE_WIDTH_CM,
                },
                label: item.display_label().to_owned(),
                dimensions_label: format_dimensions(item.width, item.height),
                highlighted,
                draggable: !read_only,
            }
        })
        .collect();

    Scene {
        transform,
        room: doc.dimensions,
        view_box: view_box(doc.dimensions),
        grid: Grid { cell: GRID_SIZE_CM, color: GRID_COLOR },
        walls,
        items,
    }
}

/// Stroke style for a wall kind.
#[must_use]
pub fn wall_stroke(kind: WallKind) -> Stroke {
    match kind {
        WallKind::Wall => Stroke { color: WALL_COLOR, width: WALL_STROKE_WIDTH },
        WallKind::Window => Stroke { color: WINDOW_COLOR, width: OPENING_STROKE_WIDTH },
        WallKind::Door => Stroke { color: DOOR_COLOR, width: OPENING_STROKE_WIDTH },
    }
}

/// The room rectangle padded on every side.
#[must_use]
pub fn view_box(room: Dimensions) -> ViewBox {
    ViewBox {
        x: -VIEW_PADDING_CM,
        y: -VIEW_PADDING_CM,
        width: room.width + VIEW_PADDING_CM * 2.0,
        height: room.height + VIEW_PADDING_CM * 2.0,
    }
}

/// Length rounded to the nearest whole centimeter, e.g. `"400 cm"`.
#[must_use]
pub fn format_length(cm: f64) -> String {
    format!("{} cm", whole(cm))
}

/// Footprint rounded to whole centimeters, e.g. `"120 × 200"`.
#[must_use]
pub fn format_dimensions(width: f64, height: f64) -> String {
    format!("{} × {}", whole(width), whole(height))
}

fn whole(value: f64) -> String {
    // Adding zero turns -0 into +0 so small negatives print as "0".
    let rounded = value.round() + 0.0;
    format!("{rounded:.0}")
}
