//! Viewport: pan/zoom transform composed over room space.
//!
//! The transform maps room coordinates (centimeters) to screen pixels as
//! `screen = room * scale + pan`. Rotation never participates.
//!
//! [`Viewport::screen_delta_to_room_delta`] is the only place a screen-space
//! displacement becomes a room-space displacement. The drag controller calls it
//! every frame against the live scale, so a zoom mid-drag shifts the dragged
//! item by a bounded amount rather than accumulating error.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use std::fmt;

use crate::config::EditorConfig;
use crate::doc::Point;

/// Pan offset in screen pixels plus a uniform scale factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub pan_x: f64,
    pub pan_y: f64,
    pub scale: f64,
}

impl ViewTransform {
    /// Convert a screen-space point (pixels) to room coordinates.
    #[must_use]
    pub fn screen_to_room(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.scale,
            y: (screen.y - self.pan_y) / self.scale,
        }
    }

    /// Convert a room-space point to screen coordinates (pixels).
    #[must_use]
    pub fn room_to_screen(&self, room: Point) -> Point {
        Point {
            x: room.x * self.scale + self.pan_x,
            y: room.y * self.scale + self.pan_y,
        }
    }

    /// Convert a screen-space distance (pixels) to a room-space distance.
    #[must_use]
    pub fn screen_dist_to_room(&self, screen_dist: f64) -> f64 {
        screen_dist / self.scale
    }
}

/// Inclusive zoom bounds. Always positive with `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleLimits {
    min: f64,
    max: f64,
}

impl ScaleLimits {
    /// Build limits, ordering the bounds and keeping them positive.
    #[must_use]
    pub fn new(a: f64, b: f64) -> Self {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let lo = if lo.is_finite() && lo > 0.0 { lo } else { f64::EPSILON };
        let hi = if hi.is_finite() && hi >= lo { hi } else { lo };
        Self { min: lo, max: hi }
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Clamp `scale` into the bounds. Non-finite input yields the lower bound.
    #[must_use]
    pub fn clamp(&self, scale: f64) -> f64 {
        if scale.is_nan() {
            return self.min;
        }
        scale.clamp(self.min, self.max)
    }
}

/// Handle returned by [`Viewport::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(ViewTransform)>;

/// Viewport state: the live transform, zoom bounds, and change subscribers.
pub struct Viewport {
    transform: ViewTransform,
    limits: ScaleLimits,
    initial_scale: f64,
    zoom_step: f64,
    viewport_width: f64,
    viewport_height: f64,
    room: Option<(f64, f64)>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl fmt::Debug for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Viewport")
            .field("transform", &self.transform)
            .field("limits", &self.limits)
            .field("viewport_width", &self.viewport_width)
            .field("viewport_height", &self.viewport_height)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl Viewport {
    /// Create a viewport at the configured initial scale with zero pan.
    #[must_use]
    pub fn new(config: &EditorConfig) -> Self {
        let limits = config.scale_limits();
        let initial_scale = limits.clamp(config.initial_scale);
        Self {
            transform: ViewTransform { pan_x: 0.0, pan_y: 0.0, scale: initial_scale },
            limits,
            initial_scale,
            zoom_step: config.zoom_step,
            viewport_width: 0.0,
            viewport_height: 0.0,
            room: None,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.transform.scale
    }

    #[must_use]
    pub fn limits(&self) -> ScaleLimits {
        self.limits
    }

    /// Viewport size in screen pixels.
    #[must_use]
    pub fn size(&self) -> (f64, f64) {
        (self.viewport_width, self.viewport_height)
    }

    #[must_use]
    pub fn screen_to_room(&self, screen: Point) -> Point {
        self.transform.screen_to_room(screen)
    }

    #[must_use]
    pub fn room_to_screen(&self, room: Point) -> Point {
        self.transform.room_to_screen(room)
    }

    /// Convert a screen-space displacement to a room-space displacement using
    /// the current scale. Pan does not participate.
    #[must_use]
    pub fn screen_delta_to_room_delta(&self, dx: f64, dy: f64) -> (f64, f64) {
        (dx / self.transform.scale, dy / self.transform.scale)
    }

    // --- Mutations ---

    /// Set the scale, clamped to the zoom bounds, keeping the pan offset.
    pub fn set_scale(&mut self, scale: f64) {
        let scale = self.limits.clamp(scale);
        self.apply(ViewTransform { scale, ..self.transform });
    }

    pub fn set_pan(&mut self, pan_x: f64, pan_y: f64) {
        self.apply(ViewTransform { pan_x, pan_y, ..self.transform });
    }

    /// Shift the pan offset by a screen-space displacement.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.set_pan(self.transform.pan_x + dx, self.transform.pan_y + dy);
    }

    /// Zoom to `scale` keeping the room point under `anchor` fixed on screen.
    pub fn zoom_at(&mut self, anchor: Point, scale: f64) {
        let room = self.transform.screen_to_room(anchor);
        let scale = self.limits.clamp(scale);
        self.apply(ViewTransform {
            pan_x: anchor.x - room.x * scale,
            pan_y: anchor.y - room.y * scale,
            scale,
        });
    }

    /// Step the zoom for one wheel notch at `anchor`. Negative `delta_y`
    /// (scrolling up) zooms in.
    pub fn wheel(&mut self, anchor: Point, delta_y: f64) {
        if delta_y < 0.0 {
            self.zoom_at(anchor, self.transform.scale + self.zoom_step);
        } else if delta_y > 0.0 {
            self.zoom_at(anchor, self.transform.scale - self.zoom_step);
        }
    }

    /// Zoom in by one step around the viewport center.
    pub fn zoom_in(&mut self) {
        self.zoom_at(self.center(), self.transform.scale + self.zoom_step);
    }

    /// Zoom out by one step around the viewport center.
    pub fn zoom_out(&mut self) {
        self.zoom_at(self.center(), self.transform.scale - self.zoom_step);
    }

    /// Update the viewport size in screen pixels.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport_width = width.max(0.0);
        self.viewport_height = height.max(0.0);
    }

    /// Center a `room_width × room_height` room in a viewport of the given
    /// size at the current scale. The room is remembered for [`Viewport::reset`].
    pub fn center_on(&mut self, room_width: f64, room_height: f64, viewport_width: f64, viewport_height: f64) {
        self.set_viewport_size(viewport_width, viewport_height);
        self.room = Some((room_width, room_height));
        let scale = self.transform.scale;
        self.set_pan(
            (self.viewport_width - room_width * scale) * 0.5,
            (self.viewport_height - room_height * scale) * 0.5,
        );
    }

    /// Restore the initial scale and re-center on the last centered room.
    pub fn reset(&mut self) {
        let scale = self.initial_scale;
        let (pan_x, pan_y) = match self.room {
            Some((w, h)) => (
                (self.viewport_width - w * scale) * 0.5,
                (self.viewport_height - h * scale) * 0.5,
            ),
            None => (0.0, 0.0),
        };
        self.apply(ViewTransform { pan_x, pan_y, scale });
    }

    // --- Subscribers ---

    /// Register a callback invoked with the new transform after every change.
    pub fn subscribe(&mut self, listener: impl FnMut(ViewTransform) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a callback. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn center(&self) -> Point {
        Point::new(self.viewport_width * 0.5, self.viewport_height * 0.5)
    }

    fn apply(&mut self, next: ViewTransform) {
        if next == self.transform {
            return;
        }
        self.transform = next;
        for (_, listener) in &mut self.listeners {
            listener(next);
        }
    }
}
