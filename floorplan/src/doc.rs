//! Document model: room geometry, furniture items, and the floorplan document.
//!
//! This module defines the value types that describe a floorplan (`Point`,
//! `Wall`, `Item`, `FloorplanDocument`) and the single edit the interactive
//! core performs on them: [`replace_item_position`].
//!
//! Data flows into this layer from the analysis job (JSON decoding) and from
//! the drag controller (position replacement). Documents are never mutated in
//! place; every edit produces a new document and walls are shared between
//! versions through an `Arc<[Wall]>`.
//!
//! UNITS
//! =====
//! All lengths are centimeters, origin top-left, y increasing downward,
//! rotation clockwise in degrees.
//!
//! DECODING
//! ========
//! Decoding is lenient so partially-populated AI output still renders: missing
//! item sizes become 60 cm, missing rotation becomes 0, degenerate walls are
//! dropped. An explicit `null` is treated as a missing field. Bounds are advisory and never checked.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::consts::{DEFAULT_ITEM_SIZE_CM, FALLBACK_ROOM_SIZE_CM};
use crate::error::EditorError;

/// A point in room space (centimeters) or screen space (pixels).
///
/// Serialized as a two-element array `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// This point shifted by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

// =============================================================
// Walls
// =============================================================

/// What a wall segment represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WallKind {
    /// Solid wall (also used for unrecognized values).
    #[default]
    Wall,
    /// Window opening.
    Window,
    /// Door opening.
    Door,
}

impl WallKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wall => "wall",
            Self::Window => "window",
            Self::Door => "door",
        }
    }
}

impl From<String> for WallKind {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "window" => Self::Window,
            "door" => Self::Door,
            _ => Self::Wall,
        }
    }
}

impl From<WallKind> for String {
    fn from(kind: WallKind) -> Self {
        kind.as_str().to_owned()
    }
}

/// A straight wall, window, or door segment. Immutable once loaded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    #[serde(default, deserialize_with = "null_as_default")]
    pub start: Point,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end: Point,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: WallKind,
}

impl Wall {
    #[must_use]
    pub fn new(start: Point, end: Point, kind: WallKind) -> Self {
        Self { start, end, kind }
    }

    /// Segment length in centimeters.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.start.distance_to(self.end)
    }

    #[must_use]
    pub fn midpoint(&self) -> Point {
        Point::new((self.start.x + self.end.x) * 0.5, (self.start.y + self.end.y) * 0.5)
    }

    /// A wall whose endpoints coincide carries no geometry.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }
}

// =============================================================
// Items
// =============================================================

/// Furniture or fixture category. Open-ended: unknown names are preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemKind {
    Bed,
    Desk,
    Chair,
    Table,
    Sofa,
    Door,
    Window,
    #[default]
    Unknown,
    /// Free-form kind reported by the analysis.
    Other(String),
}

impl ItemKind {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bed => "bed",
            Self::Desk => "desk",
            Self::Chair => "chair",
            Self::Table => "table",
            Self::Sofa => "sofa",
            Self::Door => "door",
            Self::Window => "window",
            Self::Unknown => "unknown",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for ItemKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "bed" => Self::Bed,
            "desk" => Self::Desk,
            "chair" => Self::Chair,
            "table" => Self::Table,
            "sofa" => Self::Sofa,
            "door" => Self::Door,
            "window" => Self::Window,
            "unknown" | "" => Self::Unknown,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for ItemKind {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_owned())
    }
}

impl From<ItemKind> for String {
    fn from(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Other(name) => name,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A piece of furniture placed in the room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: ItemKind,
    /// Geometric center in room space.
    #[serde(default, deserialize_with = "null_as_default")]
    pub position: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default = "default_item_size", deserialize_with = "size_or_default")]
    pub width: f64,
    #[serde(default = "default_item_size", deserialize_with = "size_or_default")]
    pub height: f64,
    /// Clockwise degrees in `[0, 360)`.
    #[serde(default, deserialize_with = "rotation_or_zero")]
    pub rotation: f64,
}

impl Item {
    /// Create an item with the default 60 cm footprint and no rotation.
    #[must_use]
    pub fn new(kind: impl Into<ItemKind>, position: Point) -> Self {
        Self {
            kind: kind.into(),
            position,
            label: None,
            width: DEFAULT_ITEM_SIZE_CM,
            height: DEFAULT_ITEM_SIZE_CM,
            rotation: 0.0,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the footprint; non-positive sizes fall back to the default.
    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = sanitize_size(Some(width), DEFAULT_ITEM_SIZE_CM);
        self.height = sanitize_size(Some(height), DEFAULT_ITEM_SIZE_CM);
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = normalize_rotation(degrees);
        self
    }

    /// Display text: the label if present, otherwise the kind name.
    #[must_use]
    pub fn display_label(&self) -> &str {
        match self.label.as_deref() {
            Some(label) if !label.trim().is_empty() => label,
            _ => self.kind.as_str(),
        }
    }

    /// Unrotated top-left corner of the footprint.
    #[must_use]
    pub fn top_left(&self) -> Point {
        self.position.offset(-self.width / 2.0, -self.height / 2.0)
    }

    /// Footprint corners after rotation about the center, clockwise from the
    /// (unrotated) top-left corner.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)].map(|(lx, ly)| self.local_to_room(lx, ly))
    }

    /// Map an offset in the item's own (rotated) frame to room space.
    #[must_use]
    pub fn local_to_room(&self, lx: f64, ly: f64) -> Point {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        Point::new(
            self.position.x + lx * cos - ly * sin,
            self.position.y + lx * sin + ly * cos,
        )
    }

    /// Map a room-space point into the item's own (rotated) frame.
    #[must_use]
    pub fn room_to_local(&self, room: Point) -> (f64, f64) {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let dx = room.x - self.position.x;
        let dy = room.y - self.position.y;
        (dx * cos + dy * sin, -dx * sin + dy * cos)
    }
}

// =============================================================
// Document
// =============================================================

/// Overall room outline reported by the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RoomShape {
    #[default]
    Rectangle,
    LShape,
    Polygon,
}

impl RoomShape {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::LShape => "L-shape",
            Self::Polygon => "polygon",
        }
    }
}

impl From<String> for RoomShape {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "l-shape" | "l_shape" | "lshape" => Self::LShape,
            "polygon" => Self::Polygon,
            _ => Self::Rectangle,
        }
    }
}

impl From<RoomShape> for String {
    fn from(shape: RoomShape) -> Self {
        shape.as_str().to_owned()
    }
}

/// Room extent in centimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(default = "fallback_room_size", deserialize_with = "room_size_or_fallback")]
    pub width: f64,
    #[serde(default = "fallback_room_size", deserialize_with = "room_size_or_fallback")]
    pub height: f64,
}

impl Dimensions {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: sanitize_size(Some(width), FALLBACK_ROOM_SIZE_CM),
            height: sanitize_size(Some(height), FALLBACK_ROOM_SIZE_CM),
        }
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self { width: FALLBACK_ROOM_SIZE_CM, height: FALLBACK_ROOM_SIZE_CM }
    }
}

/// The floorplan: room outline, walls, and items in draw order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorplanDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    pub room_shape: RoomShape,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dimensions: Dimensions,
    /// Shared between document versions; walls are never edited.
    #[serde(default, deserialize_with = "walls_without_degenerate")]
    pub walls: Arc<[Wall]>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<Item>,
}

impl FloorplanDocument {
    /// Build a document, dropping degenerate walls.
    #[must_use]
    pub fn new(room_shape: RoomShape, dimensions: Dimensions, walls: Vec<Wall>, items: Vec<Item>) -> Self {
        Self { room_shape, dimensions, walls: retain_drawable_walls(walls), items }
    }

    /// The 1 × 1 empty document shown when a job failed without any result.
    #[must_use]
    pub fn placeholder() -> Self {
        Self::new(RoomShape::Rectangle, Dimensions::default(), Vec::new(), Vec::new())
    }

    /// The sample room presented when no analysis result exists.
    #[must_use]
    pub fn demo() -> Self {
        let wall = |sx, sy, ex, ey, kind| Wall::new(Point::new(sx, sy), Point::new(ex, ey), kind);
        Self::new(
            RoomShape::Rectangle,
            Dimensions::new(400.0, 300.0),
            vec![
                wall(0.0, 0.0, 400.0, 0.0, WallKind::Wall),
                wall(400.0, 0.0, 400.0, 300.0, WallKind::Wall),
                wall(400.0, 300.0, 0.0, 300.0, WallKind::Wall),
                wall(0.0, 300.0, 0.0, 0.0, WallKind::Wall),
                wall(100.0, 0.0, 180.0, 0.0, WallKind::Window),
                wall(0.0, 200.0, 0.0, 280.0, WallKind::Door),
            ],
            vec![
                Item::new(ItemKind::Bed, Point::new(300.0, 100.0))
                    .with_label("Bed")
                    .with_size(120.0, 200.0)
                    .with_rotation(90.0),
                Item::new(ItemKind::Desk, Point::new(50.0, 50.0))
                    .with_label("Desk")
                    .with_size(120.0, 60.0),
                Item::new(ItemKind::Chair, Point::new(80.0, 80.0))
                    .with_label("Chair")
                    .with_size(50.0, 50.0)
                    .with_rotation(180.0),
            ],
        )
    }

    /// Decode a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON or not an object of the expected shape.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Decode a document from an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an object of the expected shape.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Encode as compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (non-finite coordinates).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Encode as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (non-finite coordinates).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Look up an item by index.
    #[must_use]
    pub fn item(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    /// New document with only `items[index].position` changed.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::IndexOutOfRange`] if `index` does not name an item.
    pub fn replace_item_position(&self, index: usize, position: Point) -> Result<Self, EditorError> {
        replace_item_position(self, index, position)
    }
}

/// Produce a new document with only `items[index].position` changed.
///
/// Walls are shared with the input, other items are copied unchanged, and the
/// input document is left untouched. Bounds are not checked.
///
/// # Errors
///
/// Returns [`EditorError::IndexOutOfRange`] if `index` does not name an item.
pub fn replace_item_position(
    doc: &FloorplanDocument,
    index: usize,
    position: Point,
) -> Result<FloorplanDocument, EditorError> {
    if index >= doc.items.len() {
        return Err(EditorError::IndexOutOfRange { index, len: doc.items.len() });
    }
    let mut items = doc.items.clone();
    items[index].position = position;
    Ok(FloorplanDocument {
        room_shape: doc.room_shape,
        dimensions: doc.dimensions,
        walls: Arc::clone(&doc.walls),
        items,
    })
}

/// Normalize any angle in degrees into `[0, 360)`.
#[must_use]
pub fn normalize_rotation(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let r = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if r >= 360.0 { 0.0 } else { r }
}

// =============================================================
// Lenient decoding helpers
// =============================================================

fn default_item_size() -> f64 {
    DEFAULT_ITEM_SIZE_CM
}

fn fallback_room_size() -> f64 {
    FALLBACK_ROOM_SIZE_CM
}

fn sanitize_size(raw: Option<f64>, fallback: f64) -> f64 {
    raw.filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(fallback)
}

/// An explicit `null` decodes the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn size_or_default<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(sanitize_size(raw, DEFAULT_ITEM_SIZE_CM))
}

fn room_size_or_fallback<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(sanitize_size(raw, FALLBACK_ROOM_SIZE_CM))
}

fn rotation_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.map_or(0.0, normalize_rotation))
}

fn walls_without_degenerate<'de, D>(deserializer: D) -> Result<Arc<[Wall]>, D::Error>
where
    D: Deserializer<'de>,
{
    let walls = Option::<Vec<Wall>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(retain_drawable_walls(walls))
}

fn retain_drawable_walls(walls: Vec<Wall>) -> Arc<[Wall]> {
    let total = walls.len();
    let kept: Vec<Wall> = walls
        .into_iter()
        .filter(|w| !w.is_degenerate())
        .collect();
    if kept.len() < total {
        warn!(dropped = total - kept.len(), "dropping degenerate wall segments");
    }
    kept.into()
}
