//! Editor engine: pointer gestures, frame scheduling, and the browser surface.
//!
//! [`EngineCore`] holds all editor state that does not touch the DOM and turns
//! input events into [`Action`]s. [`Engine`] wraps the core for the browser:
//! it owns the canvas, schedules `requestAnimationFrame` callbacks for pending
//! drag updates, and paints the scene.
//!
//! FRAME FLOW
//! ==========
//! Pointer moves during a drag only record the pointer position and ask for a
//! frame (`FrameRequested`, at most once until the frame runs). The frame
//! callback calls [`EngineCore::on_frame`], which emits at most one document
//! update. Pointer-up, blur, and teardown cancel the pending frame and flush
//! the final position synchronously.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::config::EditorConfig;
use crate::doc::{FloorplanDocument, Point};
use crate::drag::DragController;
use crate::hit::{Hit, hit_test};
use crate::input::{Button, Gesture, WheelDelta};
use crate::render;
use crate::scene::{Scene, build_scene};
use crate::svg;
use crate::viewport::{SubscriptionId, ViewTransform, Viewport};

const CURSOR_DEFAULT: &str = "default";
const CURSOR_MOVE: &str = "move";
const CURSOR_GRABBING: &str = "grabbing";

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A drag moved an item; the document was replaced.
    DocumentChanged { item_index: usize, position: Point },
    /// A new document was loaded.
    DocumentReplaced,
    /// Schedule one call to [`EngineCore::on_frame`] on the next display refresh.
    FrameRequested,
    /// Drop the frame previously requested.
    FrameCancelled,
    /// The pan or zoom changed.
    ViewChanged(ViewTransform),
    /// The event was consumed; the host must not forward it to the background.
    StopPropagation,
    SetCursor(String),
    RenderNeeded,
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
#[derive(Debug)]
pub struct EngineCore {
    doc: FloorplanDocument,
    job_id: Option<String>,
    pub viewport: Viewport,
    drag: DragController,
    gesture: Gesture,
    read_only: bool,
    frame_pending: bool,
    unsaved: bool,
    centered: bool,
    dpr: f64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(FloorplanDocument::demo(), None, &EditorConfig::default())
    }
}

impl EngineCore {
    /// Create an engine showing `doc`. Without a `job_id` the document is a
    /// demo and cannot be persisted.
    #[must_use]
    pub fn new(doc: FloorplanDocument, job_id: Option<String>, config: &EditorConfig) -> Self {
        Self {
            doc,
            job_id,
            viewport: Viewport::new(config),
            drag: DragController::new(),
            gesture: Gesture::Idle,
            read_only: false,
            frame_pending: false,
            unsaved: false,
            centered: false,
            dpr: 1.0,
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn document(&self) -> &FloorplanDocument {
        &self.doc
    }

    #[must_use]
    pub fn job_id(&self) -> Option<&str> {
        self.job_id.as_deref()
    }

    /// Whether the host may save this document (only analysis jobs are saved).
    #[must_use]
    pub fn can_persist(&self) -> bool {
        self.job_id.is_some()
    }

    /// Whether a drag changed the document since it was loaded or last saved.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    #[must_use]
    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    #[must_use]
    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    /// Whether a frame has been requested and not yet run or cancelled.
    #[must_use]
    pub fn is_frame_pending(&self) -> bool {
        self.frame_pending
    }

    #[must_use]
    pub fn dpr(&self) -> f64 {
        self.dpr
    }

    /// The scene for the current document and view.
    #[must_use]
    pub fn scene(&self) -> Scene {
        build_scene(&self.doc, self.viewport.transform(), self.drag.active_index(), self.read_only)
    }

    // --- Data inputs ---

    pub fn mark_saved(&mut self) {
        self.unsaved = false;
    }

    /// Toggle read-only mode. Entering it releases any drag in progress.
    pub fn set_read_only(&mut self, read_only: bool) -> Vec<Action> {
        self.read_only = read_only;
        let mut actions = if read_only { self.cancel_interaction() } else { Vec::new() };
        if !actions.contains(&Action::RenderNeeded) {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Replace the document wholesale. Any drag is abandoned without a flush
    /// because its anchor refers to the old document.
    pub fn load_document(&mut self, doc: FloorplanDocument, job_id: Option<String>) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.frame_pending {
            self.frame_pending = false;
            actions.push(Action::FrameCancelled);
        }
        self.drag.end_drag();
        self.gesture = Gesture::Idle;
        self.doc = doc;
        self.job_id = job_id;
        self.unsaved = false;

        let (width, height) = self.viewport.size();
        if width > 0.0 && height > 0.0 {
            self.center_on_room(width, height);
        } else {
            self.centered = false;
        }
        actions.push(Action::DocumentReplaced);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Update the viewport size (CSS pixels) and device pixel ratio. The room
    /// is centered the first time a non-empty size arrives.
    pub fn set_viewport(&mut self, width: f64, height: f64, dpr: f64) -> Vec<Action> {
        self.dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        let before = self.viewport.transform();
        if !self.centered && width > 0.0 && height > 0.0 {
            self.center_on_room(width, height);
        } else {
            self.viewport.set_viewport_size(width, height);
        }
        let mut actions = self.view_actions(before);
        if actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen: Point, button: Button) -> Vec<Action> {
        if !self.gesture.is_idle() {
            return Vec::new();
        }
        match button {
            Button::Secondary => return Vec::new(),
            Button::Middle => return self.start_pan(screen),
            Button::Primary => {}
        }

        let room = self.viewport.screen_to_room(screen);
        match hit_test(&self.doc, room, self.viewport.scale()) {
            Some(Hit::Item(index)) => match self.drag.begin_drag(&self.doc, index, screen, self.read_only) {
                Ok(()) => {
                    self.gesture = Gesture::Dragging { item_index: index };
                    vec![
                        Action::StopPropagation,
                        Action::SetCursor(CURSOR_GRABBING.into()),
                        Action::RenderNeeded,
                    ]
                }
                Err(err) => {
                    debug!(%err, item_index = index, "item not draggable");
                    self.start_pan(screen)
                }
            },
            Some(Hit::Wall(index)) if !self.read_only => {
                debug!(wall_index = index, "wall pressed");
                self.gesture = Gesture::Holding;
                vec![Action::StopPropagation]
            }
            _ => self.start_pan(screen),
        }
    }

    pub fn on_pointer_move(&mut self, screen: Point) -> Vec<Action> {
        match self.gesture {
            Gesture::Dragging { .. } => {
                self.drag.update_pointer(screen);
                if self.drag.has_pending_move() && !self.frame_pending {
                    self.frame_pending = true;
                    vec![Action::FrameRequested]
                } else {
                    Vec::new()
                }
            }
            Gesture::Panning { last_screen } => {
                self.gesture = Gesture::Panning { last_screen: screen };
                let before = self.viewport.transform();
                self.viewport.pan_by(screen.x - last_screen.x, screen.y - last_screen.y);
                self.view_actions(before)
            }
            Gesture::Holding => Vec::new(),
            Gesture::Idle => vec![Action::SetCursor(self.hover_cursor(screen).into())],
        }
    }

    /// Run the per-frame drag update.
    pub fn on_frame(&mut self) -> Vec<Action> {
        self.frame_pending = false;
        let Some(item_index) = self.drag.active_index() else {
            return Vec::new();
        };
        match self.drag.tick(&self.doc, &self.viewport) {
            Ok(Some(next)) => self.commit(item_index, next),
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(%err, item_index, "drag target vanished; releasing");
                self.drag.end_drag();
                self.gesture = Gesture::Idle;
                vec![Action::SetCursor(CURSOR_DEFAULT.into()), Action::RenderNeeded]
            }
        }
    }

    pub fn on_pointer_up(&mut self, screen: Point) -> Vec<Action> {
        if self.gesture.is_idle() && !self.frame_pending {
            return Vec::new();
        }
        let mut actions = self.release();
        actions.push(Action::SetCursor(self.hover_cursor(screen).into()));
        actions
    }

    /// Abort the current gesture (window blur, view teardown). A drag is
    /// flushed to its last pointer position.
    pub fn cancel_interaction(&mut self) -> Vec<Action> {
        if self.gesture.is_idle() && !self.frame_pending {
            return Vec::new();
        }
        let mut actions = self.release();
        actions.push(Action::SetCursor(CURSOR_DEFAULT.into()));
        actions
    }

    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta) -> Vec<Action> {
        let before = self.viewport.transform();
        self.viewport.wheel(screen, delta.dy);
        self.view_actions(before)
    }

    pub fn zoom_in(&mut self) -> Vec<Action> {
        let before = self.viewport.transform();
        self.viewport.zoom_in();
        self.view_actions(before)
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        let before = self.viewport.transform();
        self.viewport.zoom_out();
        self.view_actions(before)
    }

    /// Restore the initial zoom and re-center the room.
    pub fn reset_view(&mut self) -> Vec<Action> {
        let before = self.viewport.transform();
        self.viewport.reset();
        self.view_actions(before)
    }

    // --- Internals ---

    fn start_pan(&mut self, screen: Point) -> Vec<Action> {
        self.gesture = Gesture::Panning { last_screen: screen };
        vec![Action::SetCursor(CURSOR_GRABBING.into())]
    }

    fn release(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.frame_pending {
            self.frame_pending = false;
            actions.push(Action::FrameCancelled);
        }
        if let Gesture::Dragging { item_index } = std::mem::take(&mut self.gesture) {
            match self.drag.finish(&self.doc, &self.viewport) {
                Ok(Some(next)) => actions.extend(self.commit(item_index, next)),
                Ok(None) => actions.push(Action::RenderNeeded),
                Err(err) => {
                    warn!(%err, item_index, "final drag update dropped");
                    actions.push(Action::RenderNeeded);
                }
            }
        } else {
            self.drag.end_drag();
        }
        actions
    }

    fn commit(&mut self, item_index: usize, next: FloorplanDocument) -> Vec<Action> {
        let mut actions = Vec::with_capacity(2);
        if let Some(item) = next.item(item_index) {
            actions.push(Action::DocumentChanged { item_index, position: item.position });
        }
        self.doc = next;
        self.unsaved = true;
        actions.push(Action::RenderNeeded);
        actions
    }

    fn center_on_room(&mut self, width: f64, height: f64) {
        let room = self.doc.dimensions;
        self.viewport.center_on(room.width, room.height, width, height);
        self.centered = true;
    }

    fn hover_cursor(&self, screen: Point) -> &'static str {
        if self.read_only {
            return CURSOR_DEFAULT;
        }
        let room = self.viewport.screen_to_room(screen);
        if matches!(hit_test(&self.doc, room, self.viewport.scale()), Some(Hit::Item(_))) {
            CURSOR_MOVE
        } else {
            CURSOR_DEFAULT
        }
    }

    fn view_actions(&self, before: ViewTransform) -> Vec<Action> {
        let after = self.viewport.transform();
        if after == before {
            Vec::new()
        } else {
            vec![Action::ViewChanged(after), Action::RenderNeeded]
        }
    }
}

// =============================================================
// Browser surface
// =============================================================

#[derive(Default)]
struct FrameSlot {
    id: Option<i32>,
    callback: Option<Closure<dyn FnMut(f64)>>,
}

struct Surface {
    /// The latest-value cell: frame callbacks read the core through it rather
    /// than capturing state at scheduling time.
    core: RefCell<EngineCore>,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    on_change: RefCell<Option<js_sys::Function>>,
    frame: RefCell<FrameSlot>,
}

impl Surface {
    fn dispatch(self: &Rc<Self>, actions: &[Action]) {
        let mut render = false;
        let mut changed = false;
        for action in actions {
            match action {
                Action::FrameRequested => self.request_frame(),
                Action::FrameCancelled => self.cancel_frame(),
                Action::RenderNeeded => render = true,
                Action::SetCursor(cursor) => self.set_cursor(cursor),
                Action::DocumentChanged { .. } | Action::DocumentReplaced => changed = true,
                Action::ViewChanged(_) | Action::StopPropagation => {}
            }
        }
        if changed {
            self.notify_change();
        }
        if render {
            self.render();
        }
    }

    fn request_frame(self: &Rc<Self>) {
        let Some(window) = web_sys::window() else {
            warn!("no window; drag frame skipped");
            return;
        };
        let mut slot = self.frame.borrow_mut();
        if slot.id.is_some() {
            return;
        }
        let weak: Weak<Self> = Rc::downgrade(self);
        let callback = slot.callback.get_or_insert_with(|| {
            Closure::wrap(Box::new(move |_ts: f64| {
                let Some(surface) = weak.upgrade() else {
                    return;
                };
                surface.frame.borrow_mut().id = None;
                let actions = surface.core.borrow_mut().on_frame();
                surface.dispatch(&actions);
            }) as Box<dyn FnMut(f64)>)
        });
        match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            Ok(id) => slot.id = Some(id),
            Err(err) => warn!(?err, "requestAnimationFrame failed"),
        }
    }

    fn cancel_frame(&self) {
        let Some(id) = self.frame.borrow_mut().id.take() else {
            return;
        };
        if let Some(window) = web_sys::window() {
            if let Err(err) = window.cancel_animation_frame(id) {
                warn!(?err, "cancelAnimationFrame failed");
            }
        }
    }

    fn set_cursor(&self, cursor: &str) {
        if let Err(err) = self.canvas.style().set_property("cursor", cursor) {
            warn!(?err, cursor, "failed to set cursor");
        }
    }

    fn notify_change(&self) {
        let Some(callback) = self.on_change.borrow().clone() else {
            return;
        };
        let json = match self.core.borrow().document().to_json_pretty() {
            Ok(json) => json,
            Err(err) => {
                warn!(%err, "failed to encode document");
                return;
            }
        };
        if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
            warn!(?err, "document change callback failed");
        }
    }

    fn render(&self) {
        let core = self.core.borrow();
        let (width, height) = core.viewport.size();
        if let Err(err) = render::draw(&self.ctx, &core.scene(), width, height, core.dpr()) {
            warn!(?err, "render failed");
        }
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
///
/// See the crate-level "Embedding" section for how a host wires DOM events in.
pub struct Engine {
    surface: Rc<Surface>,
}

impl Engine {
    /// Create an engine bound to the given canvas element.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the canvas has no 2D context.
    pub fn new(
        canvas: HtmlCanvasElement,
        doc: FloorplanDocument,
        job_id: Option<String>,
        config: &EditorConfig,
    ) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let surface = Surface {
            core: RefCell::new(EngineCore::new(doc, job_id, config)),
            canvas,
            ctx,
            on_change: RefCell::new(None),
            frame: RefCell::new(FrameSlot::default()),
        };
        Ok(Self { surface: Rc::new(surface) })
    }

    fn run(&self, f: impl FnOnce(&mut EngineCore) -> Vec<Action>) -> Vec<Action> {
        let actions = f(&mut self.surface.core.borrow_mut());
        self.surface.dispatch(&actions);
        actions
    }

    // --- Data inputs ---

    pub fn load_document(&self, doc: FloorplanDocument, job_id: Option<String>) -> Vec<Action> {
        self.run(|core| core.load_document(doc, job_id))
    }

    pub fn set_read_only(&self, read_only: bool) -> Vec<Action> {
        self.run(|core| core.set_read_only(read_only))
    }

    pub fn mark_saved(&self) {
        self.surface.core.borrow_mut().mark_saved();
    }

    /// Register the host callback invoked with the document JSON after every
    /// committed change.
    pub fn set_on_document_change(&self, callback: Option<js_sys::Function>) {
        *self.surface.on_change.borrow_mut() = callback;
    }

    /// Call `listener(pan_x, pan_y, scale)` after every view change. The
    /// listener must not call back into the engine synchronously.
    pub fn on_view_change(&self, listener: js_sys::Function) -> SubscriptionId {
        self.surface.core.borrow_mut().viewport.subscribe(move |t| {
            let result = listener.call3(
                &JsValue::NULL,
                &JsValue::from_f64(t.pan_x),
                &JsValue::from_f64(t.pan_y),
                &JsValue::from_f64(t.scale),
            );
            if let Err(err) = result {
                warn!(?err, "view change listener failed");
            }
        })
    }

    pub fn off_view_change(&self, id: SubscriptionId) -> bool {
        self.surface.core.borrow_mut().viewport.unsubscribe(id)
    }

    // --- Viewport ---

    /// Update viewport dimensions (CSS pixels) and device pixel ratio, and
    /// resize the canvas backing store to match.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&self, width_css: f64, height_css: f64, dpr: f64) -> Vec<Action> {
        let actions = self.surface.core.borrow_mut().set_viewport(width_css, height_css, dpr);
        let dpr = self.surface.core.borrow().dpr();
        // Resizing clears the backing store, so it happens before the repaint.
        self.surface.canvas.set_width((width_css.max(0.0) * dpr).round() as u32);
        self.surface.canvas.set_height((height_css.max(0.0) * dpr).round() as u32);
        self.surface.dispatch(&actions);
        actions
    }

    pub fn zoom_in(&self) -> Vec<Action> {
        self.run(EngineCore::zoom_in)
    }

    pub fn zoom_out(&self) -> Vec<Action> {
        self.run(EngineCore::zoom_out)
    }

    pub fn reset_view(&self) -> Vec<Action> {
        self.run(EngineCore::reset_view)
    }

    // --- Input events ---

    pub fn on_pointer_down(&self, screen: Point, button: Button) -> Vec<Action> {
        self.run(|core| core.on_pointer_down(screen, button))
    }

    pub fn on_pointer_move(&self, screen: Point) -> Vec<Action> {
        self.run(|core| core.on_pointer_move(screen))
    }

    pub fn on_pointer_up(&self, screen: Point) -> Vec<Action> {
        self.run(|core| core.on_pointer_up(screen))
    }

    /// Window blur: release any gesture in progress.
    pub fn on_blur(&self) -> Vec<Action> {
        self.run(EngineCore::cancel_interaction)
    }

    pub fn on_wheel(&self, screen: Point, delta: WheelDelta) -> Vec<Action> {
        self.run(|core| core.on_wheel(screen, delta))
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    pub fn render(&self) {
        self.surface.render();
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn document(&self) -> FloorplanDocument {
        self.surface.core.borrow().document().clone()
    }

    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.surface.core.borrow().has_unsaved_changes()
    }

    #[must_use]
    pub fn can_persist(&self) -> bool {
        self.surface.core.borrow().can_persist()
    }

    #[must_use]
    pub fn transform(&self) -> ViewTransform {
        self.surface.core.borrow().viewport.transform()
    }

    /// The current document as a standalone SVG.
    #[must_use]
    pub fn export_svg(&self) -> String {
        svg::to_svg(&self.surface.core.borrow().scene())
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        let actions = self.surface.core.borrow_mut().cancel_interaction();
        self.surface.dispatch(&actions);
        self.surface.cancel_frame();
    }
}
