//! Drag controller: converts screen-space pointer motion into room-space item
//! displacement, coalesced to at most one document update per animation frame.
//!
//! LIFECYCLE
//! =========
//! `begin_drag` anchors a session at the pointer's screen position and the
//! item's room position. `update_pointer` only records the latest screen
//! position; it may be called any number of times between frames. `tick` runs
//! once per frame and, if the pointer moved since the last tick, emits a new
//! document with the item at
//!
//! ```text
//! origin_position + screen_delta_to_room_delta(latest_screen - origin_start)
//! ```
//!
//! Positions are always recomputed from the anchor, never accumulated, so
//! skipped or redundant frames cannot drift the result. `finish` flushes one
//! last tick before releasing the session, so the final emitted position is
//! the one under the pointer at release.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use tracing::debug;

use crate::doc::{FloorplanDocument, Point, replace_item_position};
use crate::error::{EditorError, InvalidStateReason};
use crate::viewport::Viewport;

/// State of one item relocation gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Index of the dragged item in the document.
    pub item_index: usize,
    /// Screen position of the pointer at pointer-down.
    pub origin_start: Point,
    /// Room position of the item at pointer-down.
    pub origin_position: Point,
    /// Most recent pointer position in screen space.
    pub latest_screen: Point,
    pub active: bool,
}

/// Owns the (at most one) active drag session.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    session: Option<DragSession>,
    /// The pointer moved since the last emitted update.
    dirty: bool,
}

impl DragController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some_and(|s| s.active)
    }

    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Index of the item being dragged, if any.
    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.session.map(|s| s.item_index)
    }

    /// Whether a pointer move is waiting for the next `tick`.
    #[must_use]
    pub fn has_pending_move(&self) -> bool {
        self.session.is_some() && self.dirty
    }

    /// Start dragging `doc.items[item_index]` from `screen`.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidState`] if the surface is read-only, a
    /// session is already active (the existing session is left untouched), or
    /// the index does not name an item.
    pub fn begin_drag(
        &mut self,
        doc: &FloorplanDocument,
        item_index: usize,
        screen: Point,
        read_only: bool,
    ) -> Result<(), EditorError> {
        if read_only {
            return Err(InvalidStateReason::ReadOnly.into());
        }
        if self.is_active() {
            return Err(InvalidStateReason::DragActive.into());
        }
        let Some(item) = doc.item(item_index) else {
            return Err(InvalidStateReason::NoSuchItem { index: item_index, len: doc.items.len() }.into());
        };
        self.session = Some(DragSession {
            item_index,
            origin_start: screen,
            origin_position: item.position,
            latest_screen: screen,
            active: true,
        });
        self.dirty = false;
        debug!(item_index, "drag started");
        Ok(())
    }

    /// Record the latest pointer position. No-op without a session.
    pub fn update_pointer(&mut self, screen: Point) {
        if let Some(session) = self.session.as_mut() {
            if session.latest_screen != screen {
                self.dirty = true;
            }
            session.latest_screen = screen;
        }
    }

    /// Room position the dragged item would take for the latest pointer sample.
    #[must_use]
    pub fn current_position(&self, viewport: &Viewport) -> Option<Point> {
        self.session.map(|s| {
            let (dx, dy) = viewport.screen_delta_to_room_delta(
                s.latest_screen.x - s.origin_start.x,
                s.latest_screen.y - s.origin_start.y,
            );
            s.origin_position.offset(dx, dy)
        })
    }

    /// Per-frame update. Returns the document with the dragged item moved, or
    /// `None` if there is no session or nothing moved since the last tick.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::IndexOutOfRange`] if `doc` no longer contains the
    /// dragged item (the caller replaced the document without ending the drag).
    pub fn tick(&mut self, doc: &FloorplanDocument, viewport: &Viewport) -> Result<Option<FloorplanDocument>, EditorError> {
        if !self.dirty {
            return Ok(None);
        }
        let Some(session) = self.session else {
            return Ok(None);
        };
        let Some(position) = self.current_position(viewport) else {
            return Ok(None);
        };
        let next = replace_item_position(doc, session.item_index, position)?;
        self.dirty = false;
        Ok(Some(next))
    }

    /// Flush any pending movement with one final tick, then end the session.
    ///
    /// # Errors
    ///
    /// Propagates the flush error from [`DragController::tick`]; the session is
    /// released either way.
    pub fn finish(&mut self, doc: &FloorplanDocument, viewport: &Viewport) -> Result<Option<FloorplanDocument>, EditorError> {
        let flushed = self.tick(doc, viewport);
        self.end_drag();
        flushed
    }

    /// Release the session. Idempotent; returns the released session, if any.
    pub fn end_drag(&mut self) -> Option<DragSession> {
        self.dirty = false;
        let ended = self.session.take();
        if let Some(session) = ended {
            debug!(item_index = session.item_index, "drag ended");
        }
        ended
    }
}
