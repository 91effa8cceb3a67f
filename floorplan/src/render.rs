//! Rendering: draws a [`Scene`] to a browser 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It receives a scene built by [`crate::scene::build_scene`] and produces
//! pixels. It does not mutate any application state.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::consts::{LABEL_COLOR, MUTED_LABEL_COLOR};
use crate::scene::{ItemShape, LABEL_FONT_SIZE, Scene, ViewBox, WallShape};

/// Canvas background outside the room sheet.
const BACKDROP_COLOR: &str = "#f3f4f6";

/// Room sheet color under the grid.
const SHEET_COLOR: &str = "#fff";

/// Label pill background.
const LABEL_BACKGROUND: &str = "rgba(255, 255, 255, 0.8)";

/// Horizontal padding inside a label pill, in room units.
const LABEL_PAD: f64 = 2.0;

/// Draw the full scene: sheet and grid, walls, then items.
///
/// `viewport_w` and `viewport_h` are in CSS pixels. `dpr` is the device pixel ratio.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    scene: &Scene,
    viewport_w: f64,
    viewport_h: f64,
    dpr: f64,
) -> Result<(), JsValue> {
    let t = scene.transform;

    // Layer 1: clear and set up transforms.
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.set_fill_style_str(BACKDROP_COLOR);
    ctx.fill_rect(0.0, 0.0, viewport_w, viewport_h);
    ctx.translate(t.pan_x, t.pan_y)?;
    ctx.scale(t.scale, t.scale)?;

    // Layer 2: sheet and grid.
    draw_sheet(ctx, scene.view_box, scene.grid.cell, scene.grid.color, t.scale);

    // Layer 3: walls in document order.
    for wall in &scene.walls {
        draw_wall(ctx, wall);
    }
    for wall in &scene.walls {
        draw_wall_label(ctx, wall)?;
    }

    // Layer 4: items in z-order (first drawn is bottom-most).
    for item in &scene.items {
        draw_item(ctx, item)?;
    }

    Ok(())
}

// =============================================================
// Sheet
// =============================================================

fn draw_sheet(ctx: &CanvasRenderingContext2d, vb: ViewBox, cell: f64, color: &str, scale: f64) {
    ctx.set_fill_style_str(SHEET_COLOR);
    ctx.fill_rect(vb.x, vb.y, vb.width, vb.height);

    if cell <= 0.0 {
        return;
    }

    ctx.save();
    ctx.set_stroke_style_str(color);
    // One device-independent pixel regardless of zoom.
    ctx.set_line_width(1.0 / scale.max(f64::EPSILON));
    ctx.begin_path();
    let right = vb.x + vb.width;
    let bottom = vb.y + vb.height;
    let mut x = vb.x;
    while x <= right {
        ctx.move_to(x, vb.y);
        ctx.line_to(x, bottom);
        x += cell;
    }
    let mut y = vb.y;
    while y <= bottom {
        ctx.move_to(vb.x, y);
        ctx.line_to(right, y);
        y += cell;
    }
    ctx.stroke();
    ctx.restore();
}

// =============================================================
// Walls
// =============================================================

fn draw_wall(ctx: &CanvasRenderingContext2d, wall: &WallShape) {
    ctx.save();
    ctx.set_stroke_style_str(wall.stroke.color);
    ctx.set_line_width(wall.stroke.width);
    ctx.set_line_cap("round");
    ctx.begin_path();
    ctx.move_to(wall.start.x, wall.start.y);
    ctx.line_to(wall.end.x, wall.end.y);
    ctx.stroke();
    ctx.restore();
}

fn draw_wall_label(ctx: &CanvasRenderingContext2d, wall: &WallShape) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_font(&format!("{:.0}px sans-serif", LABEL_FONT_SIZE * 0.9));
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    draw_label_pill(ctx, &wall.length_label, wall.label_anchor.x, wall.label_anchor.y)?;
    ctx.set_fill_style_str(MUTED_LABEL_COLOR);
    ctx.fill_text(&wall.length_label, wall.label_anchor.x, wall.label_anchor.y)?;
    ctx.restore();
    Ok(())
}

// =============================================================
// Items
// =============================================================

fn draw_item(ctx: &CanvasRenderingContext2d, item: &ItemShape) -> Result<(), JsValue> {
    ctx.save();
    ctx.translate(item.center.x, item.center.y)?;
    ctx.rotate(item.rotation.to_radians())?;

    let x = -item.width / 2.0;
    let y = -item.height / 2.0;
    rounded_rect_path(ctx, x, y, item.width, item.height, item.corner_radius)?;

    ctx.set_fill_style_str(item.fill);
    ctx.fill();
    ctx.set_stroke_style_str(item.stroke.color);
    ctx.set_line_width(item.stroke.width);
    ctx.stroke();

    ctx.set_font(&format!("{LABEL_FONT_SIZE:.0}px sans-serif"));
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    draw_label_pill(ctx, &item.label, 0.0, 0.0)?;
    ctx.set_fill_style_str(LABEL_COLOR);
    ctx.fill_text(&item.label, 0.0, 0.0)?;

    if item.highlighted {
        ctx.set_fill_style_str(MUTED_LABEL_COLOR);
        ctx.fill_text(&item.dimensions_label, 0.0, LABEL_FONT_SIZE * 1.4)?;
    }

    ctx.restore();
    Ok(())
}

/// Trace a rounded rectangle. The radius is capped at half the shorter side.
fn rounded_rect_path(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, radius: f64) -> Result<(), JsValue> {
    let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
    ctx.begin_path();
    ctx.move_to(x + r, y);
    ctx.arc_to(x + w, y, x + w, y + h, r)?;
    ctx.arc_to(x + w, y + h, x, y + h, r)?;
    ctx.arc_to(x, y + h, x, y, r)?;
    ctx.arc_to(x, y, x + w, y, r)?;
    ctx.close_path();
    Ok(())
}

/// Fill a translucent pill behind centered text at `(cx, cy)`.
fn draw_label_pill(ctx: &CanvasRenderingContext2d, text: &str, cx: f64, cy: f64) -> Result<(), JsValue> {
    let metrics = ctx.measure_text(text)?;
    let w = metrics.width() + LABEL_PAD * 2.0;
    let h = LABEL_FONT_SIZE + LABEL_PAD;
    ctx.set_fill_style_str(LABEL_BACKGROUND);
    ctx.fill_rect(cx - w / 2.0, cy - h / 2.0, w, h);
    Ok(())
}
