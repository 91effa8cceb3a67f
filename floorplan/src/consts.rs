//! Shared numeric constants and palette for the floorplan crate.

// ── Viewport ────────────────────────────────────────────────────

/// Scale applied when the editor first opens a document.
pub const DEFAULT_INITIAL_SCALE: f64 = 1.5;

/// Lower zoom bound.
pub const DEFAULT_MIN_SCALE: f64 = 0.2;

/// Upper zoom bound.
pub const DEFAULT_MAX_SCALE: f64 = 8.0;

/// Scale added or removed by one wheel notch or zoom button press.
pub const DEFAULT_ZOOM_STEP: f64 = 0.1;

// ── Document ────────────────────────────────────────────────────

/// Side length in centimeters used when an item arrives without a size.
pub const DEFAULT_ITEM_SIZE_CM: f64 = 60.0;

/// Room size used when a document arrives without usable dimensions.
pub const FALLBACK_ROOM_SIZE_CM: f64 = 1.0;

// ── Scene ───────────────────────────────────────────────────────

/// Room-space padding around the room so edge strokes are not clipped.
pub const VIEW_PADDING_CM: f64 = 50.0;

/// Background grid cell size in room units.
pub const GRID_SIZE_CM: f64 = 50.0;

/// Corner radius of item boxes in room units.
pub const ITEM_CORNER_RADIUS_CM: f64 = 4.0;

/// Stroke width of item boxes in room units.
pub const ITEM_STROKE_WIDTH_CM: f64 = 2.0;

pub const GRID_COLOR: &str = "#f0f0f0";
pub const WALL_COLOR: &str = "#333";
pub const WINDOW_COLOR: &str = "#60a5fa";
pub const DOOR_COLOR: &str = "#fbbf24";
pub const ITEM_FILL: &str = "#fff";
pub const ITEM_STROKE: &str = "#94a3b8";
pub const ITEM_FILL_ACTIVE: &str = "#eff6ff";
pub const ITEM_STROKE_ACTIVE: &str = "#3b82f6";
pub const LABEL_COLOR: &str = "#111827";
pub const MUTED_LABEL_COLOR: &str = "#64748b";

pub const WALL_STROKE_WIDTH: f64 = 5.0;
pub const OPENING_STROKE_WIDTH: f64 = 3.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space slop in pixels added around thin wall strokes.
pub const WALL_HIT_SLOP_PX: f64 = 4.0;

// ── Job polling ─────────────────────────────────────────────────

/// Interval between job status requests.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3000;

/// Cadence of the "Analyzing..." progress dots.
pub const DEFAULT_DOTS_INTERVAL_MS: u64 = 500;
