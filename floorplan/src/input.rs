//! Input model: mouse buttons, wheel deltas, and the pointer gesture state.
//!
//! `Gesture` is the interaction tracked between pointer-down and pointer-up.
//! Item drags keep their own anchor state in [`crate::drag::DragController`];
//! the gesture only records which owner the pointer currently belongs to.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::doc::Point;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code. Unknown codes are treated as primary.
    #[must_use]
    pub fn from_dom(code: i16) -> Self {
        match code {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Which interaction currently owns the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The background is being dragged to pan the viewport.
    Panning {
        /// Screen-space position of the previous pointer event.
        last_screen: Point,
    },
    /// An item is being relocated by the drag controller.
    Dragging {
        /// Index of the item under the pointer at pointer-down.
        item_index: usize,
    },
    /// A wall was pressed; the pointer is held without effect until release.
    Holding,
}

impl Gesture {
    #[must_use]
    pub fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }
}
