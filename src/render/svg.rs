//! Scene graph to SVG document conversion.
//!
//! One document per sampled frame. Coordinates are converted from scene units (origin at the
//! centre, `+y` up) to pixels (origin top-left, `+y` down). Partially revealed entities are drawn
//! with stroke dash arrays, shortened lines, or transparent trailing characters.

use crate::{
    foundation::{
        color::Color,
        core::{Point, Vec2},
        error::{SceneError, SceneResult},
    },
    scene::model::{Connection, SceneGraph, Shape, TEXT_LINE_UNITS, Tip, VisualItem},
};

/// Output height stroke widths are specified against.
pub const REFERENCE_HEIGHT_PX: f64 = 1080.0;
/// Upper bound on arrow tip length, in scene units.
pub const MAX_TIP_LENGTH: f64 = 0.35;
const FONT_FAMILY: &str = "DejaVu Sans, Arial, Helvetica, sans-serif";

#[derive(Clone, Copy, Debug)]
/// Scene-to-pixel mapping for one output size.
pub struct Viewport {
    /// Output width.
    pub width_px: u32,
    /// Output height.
    pub height_px: u32,
    kx: f64,
    ky: f64,
}

impl Viewport {
    /// Viewport mapping `scene.frame` onto `width_px` x `height_px`.
    pub fn new(scene: &SceneGraph, width_px: u32, height_px: u32) -> SceneResult<Self> {
        if width_px == 0 || height_px == 0 {
            return Err(SceneError::render("viewport width/height must be non-zero"));
        }
        Ok(Self {
            width_px,
            height_px,
            kx: f64::from(width_px) / scene.frame.width,
            ky: f64::from(height_px) / scene.frame.height,
        })
    }

    /// Pixel coordinates of a scene point; y grows downwards.
    pub fn point(&self, p: Point) -> (f64, f64) {
        (
            f64::from(self.width_px) * 0.5 + p.x * self.kx,
            f64::from(self.height_px) * 0.5 - p.y * self.ky,
        )
    }

    /// Length along the vertical axis, used for radii and text.
    pub fn len(&self, units: f64) -> f64 {
        units * self.ky
    }

    /// Stroke width in pixels for a width given at the reference height.
    pub fn stroke(&self, width: f64) -> f64 {
        width * f64::from(self.height_px) / REFERENCE_HEIGHT_PX
    }
}

/// Render the visible part of `scene` as a standalone SVG document.
pub fn scene_to_svg(scene: &SceneGraph, width_px: u32, height_px: u32) -> SceneResult<String> {
    let vp = Viewport::new(scene, width_px, height_px)?;
    let mut out = String::with_capacity(4096);
    out.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width_px}" height="{height_px}" viewBox="0 0 {width_px} {height_px}">"#
    ));
    out.push_str(&format!(
        r#"<rect x="0" y="0" width="{width_px}" height="{height_px}" fill="{}"/>"#,
        scene.background.to_hex_rgb()
    ));

    for id in scene.paint_order() {
        if let Some(item) = scene.item(id) {
            draw_item(&mut out, item, &vp);
        } else if let Some(conn) = scene.connection(id) {
            draw_connection(&mut out, conn, scene, &vp)?;
        }
    }
    out.push_str("</svg>");
    Ok(out)
}

fn visible(on_canvas: bool, opacity: f64, reveal: f64) -> bool {
    on_canvas && opacity > 1e-6 && reveal > 1e-6
}

/// Append one item.
pub fn draw_item(out: &mut String, item: &VisualItem, vp: &Viewport) {
    if !visible(item.on_canvas, item.opacity, item.reveal) || item.scale <= 1e-9 {
        return;
    }
    if let Shape::Text { content, font_size } = &item.shape {
        draw_text(out, item, content, *font_size, vp);
        return;
    }

    let (cx, cy) = vp.point(item.position);
    let reveal = item.reveal.clamp(0.0, 1.0);
    out.push_str(&format!(r#"<g opacity="{:.4}">"#, item.opacity));
    match &item.shape {
        Shape::Rect {
            width,
            height,
            corner_radius,
        } => {
            let w = vp.len(width * item.scale);
            let h = vp.len(height * item.scale);
            let r = vp.len(corner_radius * item.scale).min(w * 0.5).min(h * 0.5);
            let perimeter = 2.0 * (w + h) - (8.0 - 2.0 * std::f64::consts::PI) * r;
            out.push_str(&format!(
                r#"<rect x="{:.2}" y="{:.2}" width="{w:.2}" height="{h:.2}" rx="{r:.2}" {} {}/>"#,
                cx - w * 0.5,
                cy - h * 0.5,
                fill_attrs(item, reveal),
                stroke_attrs(item, vp, reveal, perimeter),
            ));
        }
        Shape::Circle { radius } => {
            let r = vp.len(radius * item.scale);
            let perimeter = std::f64::consts::TAU * r;
            out.push_str(&format!(
                r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}" {} {}/>"#,
                fill_attrs(item, reveal),
                stroke_attrs(item, vp, reveal, perimeter),
            ));
        }
        Shape::Dot { radius } => {
            let r = vp.len(radius * item.scale);
            out.push_str(&format!(
                r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}" fill="{}" fill-opacity="{:.4}"/>"#,
                item.color.to_hex_rgb(),
                item.color.a * reveal,
            ));
        }
        Shape::Segment { delta } => {
            let d = *delta * item.scale;
            let a = item.position - d * 0.5;
            let b = a + d * reveal;
            let (x0, y0) = vp.point(a);
            let (x1, y1) = vp.point(b);
            out.push_str(&format!(
                r#"<line x1="{x0:.2}" y1="{y0:.2}" x2="{x1:.2}" y2="{y1:.2}" stroke="{}" stroke-opacity="{:.4}" stroke-width="{:.2}" stroke-linecap="round"/>"#,
                item.color.to_hex_rgb(),
                item.color.a,
                vp.stroke(item.stroke_width).max(0.5),
            ));
        }
        Shape::Text { .. } => {}
    }
    out.push_str("</g>");
}

fn fill_attrs(item: &VisualItem, reveal: f64) -> String {
    match item.fill {
        Some(fill) if fill.opacity > 0.0 => format!(
            r#"fill="{}" fill-opacity="{:.4}""#,
            fill.color.to_hex_rgb(),
            fill.opacity * fill.color.a * reveal
        ),
        _ => r#"fill="none""#.to_owned(),
    }
}

fn stroke_attrs(item: &VisualItem, vp: &Viewport, reveal: f64, perimeter: f64) -> String {
    if item.stroke_width <= 0.0 {
        return String::new();
    }
    let mut s = format!(
        r#"stroke="{}" stroke-opacity="{:.4}" stroke-width="{:.2}""#,
        item.color.to_hex_rgb(),
        item.color.a,
        vp.stroke(item.stroke_width),
    );
    if reveal < 1.0 {
        s.push_str(&format!(
            r#" stroke-dasharray="{:.2} {:.2}""#,
            perimeter * reveal,
            perimeter
        ));
    }
    s
}

/// Append a text item. Unrevealed characters are laid out but transparent, so a line being
/// written keeps its final centring.
pub fn draw_text(out: &mut String, item: &VisualItem, content: &str, font_size: f64, vp: &Viewport) {
    let line_h = vp.len(font_size * TEXT_LINE_UNITS * item.scale);
    let font_px = line_h / 1.2;
    let lines: Vec<&str> = content.split('\n').collect();
    let total: usize = lines.iter().map(|l| l.chars().count()).sum();
    let mut budget = (total as f64 * item.reveal.clamp(0.0, 1.0)).ceil() as usize;

    let (cx, cy) = vp.point(item.position);
    let top = cy - line_h * lines.len() as f64 * 0.5;
    out.push_str(&format!(
        r#"<g opacity="{:.4}" font-family="{FONT_FAMILY}" font-size="{font_px:.2}" fill="{}" fill-opacity="{:.4}" text-anchor="middle">"#,
        item.opacity,
        item.color.to_hex_rgb(),
        item.color.a,
    ));
    for (i, line) in lines.iter().enumerate() {
        let baseline = top + line_h * (i as f64 + 0.5) + font_px * 0.35;
        let n = line.chars().count();
        let shown = budget.min(n);
        budget -= shown;
        let head: String = line.chars().take(shown).collect();
        let tail: String = line.chars().skip(shown).collect();
        out.push_str(&format!(
            r#"<text x="{cx:.2}" y="{baseline:.2}" xml:space="preserve">{}"#,
            escape_xml(&head)
        ));
        if !tail.is_empty() {
            out.push_str(&format!(
                r#"<tspan fill-opacity="0">{}</tspan>"#,
                escape_xml(&tail)
            ));
        }
        out.push_str("</text>");
    }
    out.push_str("</g>");
}

/// Append a connection, straight or arced, with its tips.
pub fn draw_connection(
    out: &mut String,
    conn: &Connection,
    scene: &SceneGraph,
    vp: &Viewport,
) -> SceneResult<()> {
    if !visible(conn.on_canvas, conn.opacity, conn.reveal) {
        return Ok(());
    }
    let (a, b) = scene.endpoints(conn)?;
    let chord = b - a;
    let len = chord.hypot();
    if len < 1e-6 {
        return Ok(());
    }
    let t = conn.reveal.clamp(0.0, 1.0);
    let normal = Vec2::new(-chord.y, chord.x) / len;
    let control = a.midpoint(b) + normal * (len * (conn.style.angle / 4.0).tan());

    // Quadratic split at `t` keeps the partial curve on the final path.
    let c1 = a.lerp(control, t);
    let end = c1.lerp(control.lerp(b, t), t);

    let color = conn.style.color;
    let tip_len = (MAX_TIP_LENGTH).min(len * conn.style.tip_ratio);
    let (x0, y0) = vp.point(a);
    let (qx, qy) = vp.point(c1);
    let (x1, y1) = vp.point(end);

    out.push_str(&format!(r#"<g opacity="{:.4}">"#, conn.opacity));
    out.push_str(&format!(
        r#"<path d="M {x0:.2} {y0:.2} Q {qx:.2} {qy:.2} {x1:.2} {y1:.2}" fill="none" stroke="{}" stroke-opacity="{:.4}" stroke-width="{:.2}" stroke-linecap="round"/>"#,
        color.to_hex_rgb(),
        color.a,
        vp.stroke(conn.style.width).max(0.5),
    ));
    if matches!(conn.style.tip, Tip::End | Tip::Both) {
        let dir = end - c1;
        out.push_str(&tip(end, dir, tip_len * t.max(0.35), color, vp));
    }
    if conn.style.tip == Tip::Both {
        let dir = a - c1;
        let dir = if dir.hypot() < 1e-9 { a - end } else { dir };
        out.push_str(&tip(a, dir, tip_len * t.max(0.35), color, vp));
    }
    out.push_str("</g>");
    Ok(())
}

fn tip(at: Point, dir: Vec2, length: f64, color: Color, vp: &Viewport) -> String {
    let n = dir.hypot();
    if n < 1e-9 || length <= 0.0 {
        return String::new();
    }
    let u = dir / n;
    let side = Vec2::new(-u.y, u.x) * (length * 0.45);
    let base = at - u * length;
    let pts = [at, base + side, base - side]
        .map(|p| vp.point(p))
        .map(|(x, y)| format!("{x:.2},{y:.2}"))
        .join(" ");
    format!(
        r#"<polygon points="{pts}" fill="{}" fill-opacity="{:.4}"/>"#,
        color.to_hex_rgb(),
        color.a
    )
}

/// Escape text for inclusion in SVG character data.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
