//! Interactive floorplan editor core.
//!
//! A floorplan is a room outline with walls, windows, doors, and furniture
//! items, produced by video analysis and corrected by the user. This crate
//! owns the document model, the pan/zoom viewport, frame-coalesced item
//! dragging, scene building with Canvas2D and SVG backends, and the job status
//! poller that waits for an analysis to finish. It compiles to WebAssembly for
//! the browser editor and natively for the `floorplan` CLI; everything except
//! [`render`] and [`engine::Engine`] is plain Rust and tested natively.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Browser engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Floorplan document types, decoding, and immutable updates |
//! | [`viewport`] | Pan/zoom transform, zoom bounds, and change subscribers |
//! | [`drag`] | Drag sessions: screen deltas to room positions, once per frame |
//! | [`input`] | Pointer buttons, wheel deltas, and the gesture state |
//! | [`hit`] | Hit-testing items and walls |
//! | [`scene`] | Backend-neutral shapes, labels, and styles for one frame |
//! | [`render`] | Canvas2D backend |
//! | [`svg`] | SVG export backend |
//! | [`job`] | Job records, transport traits, and result view resolution |
//! | [`poller`] | Job status polling and the progress indicator |
//! | [`analysis`] | Parsing vision model output into a document |
//! | [`config`] | Environment-driven tuning |
//! | [`error`] | Editor error types |
//! | [`consts`] | Shared constants (zoom limits, colors, intervals, etc.) |
//!
//! ## Embedding
//!
//! A browser host (a Leptos or plain `wasm-bindgen` component) owns the
//! `<canvas>` and the DOM listeners, and forwards them to one
//! [`engine::Engine`]. Pointer positions are CSS pixels relative to the canvas;
//! every call dispatches its own actions, and the returned list is for hosts
//! that mirror state (cursor, unsaved badge) in their own UI.
//!
//! ```ignore
//! let engine = Engine::new(canvas, doc, Some(job_id), &EditorConfig::default())?;
//! engine.set_on_document_change(Some(save_callback));
//! engine.set_viewport(rect.width(), rect.height(), window.device_pixel_ratio());
//!
//! // pointerdown / pointermove / pointerup / blur / wheel listeners:
//! engine.on_pointer_down(Point::new(ev.offset_x().into(), ev.offset_y().into()), Button::from_dom(ev.button()));
//! engine.on_pointer_move(Point::new(ev.offset_x().into(), ev.offset_y().into()));
//! engine.on_pointer_up(Point::new(ev.offset_x().into(), ev.offset_y().into()));
//! engine.on_blur();
//! engine.on_wheel(Point::new(ev.offset_x().into(), ev.offset_y().into()), WheelDelta { dx: ev.delta_x(), dy: ev.delta_y() });
//! ```
//!
//! Dropping the engine flushes any drag in progress and cancels its pending
//! animation frame. The CLI never constructs an `Engine`; it drives
//! [`drag::DragController`] and [`svg::to_svg`] directly.

pub mod analysis;
pub mod config;
pub mod consts;
pub mod doc;
pub mod drag;
pub mod engine;
pub mod error;
pub mod hit;
pub mod input;
pub mod job;
pub mod poller;
pub mod render;
pub mod scene;
pub mod svg;
pub mod viewport;
