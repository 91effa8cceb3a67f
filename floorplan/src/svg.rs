//! SVG export: serializes a [`Scene`] as a standalone SVG document.
//!
//! The output is in room units (1 user unit = 1 cm) with the padded view box,
//! so it is independent of the on-screen pan and zoom.

#[cfg(test)]
#[path = "svg_test.rs"]
mod svg_test;

use crate::consts::{LABEL_COLOR, MUTED_LABEL_COLOR};
use crate::scene::{LABEL_FONT_SIZE, Scene};

/// Render `scene` as an SVG document string.
#[must_use]
pub fn to_svg(scene: &Scene) -> String {
    let vb = scene.view_box;
    let mut out = String::new();

    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"{} {} {} {}\">\n",
        num(vb.width),
        num(vb.height),
        num(vb.x),
        num(vb.y),
        num(vb.width),
        num(vb.height),
    ));

    // Grid pattern and background.
    let cell = num(scene.grid.cell);
    out.push_str("  <defs>\n");
    out.push_str(&format!(
        "    <pattern id=\"grid\" width=\"{cell}\" height=\"{cell}\" patternUnits=\"userSpaceOnUse\">\n"
    ));
    out.push_str(&format!(
        "      <path d=\"M {cell} 0 L 0 0 0 {cell}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1\"/>\n",
        scene.grid.color
    ));
    out.push_str("    </pattern>\n  </defs>\n");
    out.push_str(&format!(
        "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#fff\"/>\n",
        num(vb.x),
        num(vb.y),
        num(vb.width),
        num(vb.height),
    ));
    out.push_str(&format!(
        "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"url(#grid)\"/>\n",
        num(vb.x),
        num(vb.y),
        num(vb.width),
        num(vb.height),
    ));

    // Walls.
    out.push_str("  <g id=\"walls\">\n");
    for wall in &scene.walls {
        out.push_str(&format!(
            "    <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\" data-kind=\"{}\"/>\n",
            num(wall.start.x),
            num(wall.start.y),
            num(wall.end.x),
            num(wall.end.y),
            wall.stroke.color,
            num(wall.stroke.width),
            wall.kind.as_str(),
        ));
    }
    out.push_str("  </g>\n");

    // Wall lengths at each midpoint, drawn after all walls.
    out.push_str(&format!(
        "  <g id=\"wall-labels\" font-size=\"{}\" fill=\"{MUTED_LABEL_COLOR}\" text-anchor=\"middle\" dominant-baseline=\"middle\">\n",
        num(LABEL_FONT_SIZE * 0.9),
    ));
    for wall in &scene.walls {
        out.push_str(&format!(
            "    <text x=\"{}\" y=\"{}\">{}</text>\n",
            num(wall.label_anchor.x),
            num(wall.label_anchor.y),
            escape_xml(&wall.length_label),
        ));
    }
    out.push_str("  </g>\n");

    // Items.
    out.push_str("  <g id=\"items\">\n");
    for item in &scene.items {
        let x = item.center.x - item.width / 2.0;
        let y = item.center.y - item.height / 2.0;
        out.push_str(&format!(
            "    <g transform=\"translate({}, {}) rotate({}, {}, {})\">\n",
            num(x),
            num(y),
            num(item.rotation),
            num(item.width / 2.0),
            num(item.height / 2.0),
        ));
        out.push_str(&format!(
            "      <rect width=\"{}\" height=\"{}\" rx=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>\n",
            num(item.width),
            num(item.height),
            num(item.corner_radius),
            item.fill,
            item.stroke.color,
            num(item.stroke.width),
        ));
        out.push_str(&format!(
            "      <text x=\"{}\" y=\"{}\" font-size=\"{}\" fill=\"{LABEL_COLOR}\" text-anchor=\"middle\" dominant-baseline=\"middle\">{}</text>\n",
            num(item.width / 2.0),
            num(item.height / 2.0),
            num(LABEL_FONT_SIZE),
            escape_xml(&item.label),
        ));
        if item.highlighted {
            out.push_str(&format!(
                "      <text x=\"{}\" y=\"{}\" font-size=\"{}\" fill=\"{MUTED_LABEL_COLOR}\" text-anchor=\"middle\" dominant-baseline=\"middle\">{}</text>\n",
                num(item.width / 2.0),
                num(item.height / 2.0 + LABEL_FONT_SIZE * 1.4),
                num(LABEL_FONT_SIZE),
                escape_xml(&item.dimensions_label),
            ));
        }
        out.push_str("    </g>\n");
    }
    out.push_str("  </g>\n");
    out.push_str("</svg>\n");
    out
}

/// Escape the five XML special characters.
#[must_use]
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

/// Format a coordinate compactly: at most two decimals, no trailing zeros.
fn num(value: f64) -> String {
    // Adding zero turns -0 into +0.
    let rounded = (value * 100.0).round() / 100.0 + 0.0;
    format!("{rounded}")
}
