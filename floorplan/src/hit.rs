//! Hit-testing in room space.
//!
//! Items are tested topmost first (reverse draw order) against their rotated
//! footprint. Walls are tested afterwards against their stroke, widened by a
//! few screen pixels so thin window and door strokes stay pressable at low
//! zoom.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::WALL_HIT_SLOP_PX;
use crate::doc::{FloorplanDocument, Item, Point, Wall};
use crate::scene::wall_stroke;

/// What the pointer landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// Index into `doc.items`.
    Item(usize),
    /// Index into `doc.walls`.
    Wall(usize),
}

/// Test which item or wall (if any) is under `room_pt`.
///
/// `scale` is the current viewport scale, used to convert the wall hit slop
/// from screen pixels to room units.
#[must_use]
pub fn hit_test(doc: &FloorplanDocument, room_pt: Point, scale: f64) -> Option<Hit> {
    if let Some(index) = doc
        .items
        .iter()
        .rposition(|item| item_contains(item, room_pt))
    {
        return Some(Hit::Item(index));
    }
    let slop = if scale > 0.0 { WALL_HIT_SLOP_PX / scale } else { 0.0 };
    doc.walls
        .iter()
        .rposition(|wall| wall_contains(wall, room_pt, slop))
        .map(Hit::Wall)
}

/// Whether `room_pt` lies inside the item's rotated footprint (edges inclusive).
#[must_use]
pub fn item_contains(item: &Item, room_pt: Point) -> bool {
    let (lx, ly) = item.room_to_local(room_pt);
    lx.abs() <= item.width / 2.0 && ly.abs() <= item.height / 2.0
}

/// Whether `room_pt` lies within the wall's stroke, widened by `slop` room units.
#[must_use]
pub fn wall_contains(wall: &Wall, room_pt: Point, slop: f64) -> bool {
    let half_width = wall_stroke(wall.kind).width / 2.0;
    distance_to_segment(room_pt, wall.start, wall.end) <= half_width + slop
}

/// Shortest distance from `p` to the segment `a`-`b`.
#[must_use]
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len_sq = abx * abx + aby * aby;
    if len_sq <= f64::EPSILON {
        return p.distance_to(a);
    }
    let t = (((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq).clamp(0.0, 1.0);
    p.distance_to(Point::new(a.x + abx * t, a.y + aby * t))
}
