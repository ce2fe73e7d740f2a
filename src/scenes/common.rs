//! Building blocks shared by the scene scripts.

use crate::{
    foundation::{
        color::Color,
        core::{Direction, Point, Rect, Vec2},
        error::SceneResult,
    },
    layout::place::{self, Align},
    scene::{
        dsl::SceneBuilder,
        model::{VisualItem, text_size},
    },
};

/// Gap used by `next_to` when a script does not say otherwise.
pub const NEXT_TO_BUFF: f64 = 0.25;
/// Gap between a block and the frame edge.
pub const EDGE_BUFF: f64 = 0.5;
/// Padding of a surrounding rectangle.
pub const SURROUND_BUFF: f64 = 0.1;
/// Gap between stacked entries when a script does not say otherwise.
pub const ARRANGE_BUFF: f64 = 0.25;

/// Down in scene units (y up).
pub const DOWN: Vec2 = Vec2::new(0.0, -1.0);
/// Up.
pub const UP: Vec2 = Vec2::new(0.0, 1.0);
/// Left.
pub const LEFT: Vec2 = Vec2::new(-1.0, 0.0);
/// Right.
pub const RIGHT: Vec2 = Vec2::new(1.0, 0.0);

#[derive(Clone, Copy, Debug)]
/// One line of a [`text_stack`].
pub struct TextLine<'a> {
    /// Line content.
    pub text: &'a str,
    /// Text colour.
    pub color: Color,
    /// Font size in points.
    pub size: f64,
}

impl<'a> TextLine<'a> {
    /// Line of `text` in `color` at `size`.
    pub fn new(text: &'a str, color: Color, size: f64) -> Self {
        Self { text, color, size }
    }
}

/// Stack text lines into group `id` (items `id.0`, `id.1`, ...) centred on `center`.
pub fn text_stack(
    s: &mut SceneBuilder,
    id: &str,
    lines: &[TextLine<'_>],
    buff: f64,
    align: Align,
    center: Point,
) -> SceneResult<Rect> {
    let sizes: Vec<Vec2> = lines.iter().map(|l| text_size(l.text, l.size)).collect();
    let spots = place::arrange(&sizes, Direction::Down, buff, align, center);
    let mut ids = Vec::with_capacity(lines.len());
    for (i, (line, at)) in lines.iter().zip(spots).enumerate() {
        let item_id = format!("{id}.{i}");
        s.add(
            VisualItem::text(&item_id, line.text, line.size)
                .color(line.color)
                .at(at),
        )?;
        ids.push(item_id);
    }
    s.group(id, ids)?;
    s.bounds(id)
}

/// A titled bullet list pushed against a frame edge, then shifted by `shift`.
#[allow(clippy::too_many_arguments)]
pub fn explanation(
    s: &mut SceneBuilder,
    id: &str,
    title: TextLine<'_>,
    body: &[&str],
    body_color: Color,
    buff: f64,
    edge: Direction,
    shift: Vec2,
) -> SceneResult<()> {
    let mut lines = vec![title];
    lines.extend(body.iter().map(|t| TextLine::new(t, body_color, 20.0)));
    let align = match edge {
        Direction::Right => Align::End,
        _ => Align::Start,
    };
    let r = text_stack(s, id, &lines, buff, align, Point::ORIGIN)?;
    let size = Vec2::new(r.width(), r.height());
    let at = place::to_edge(r.center(), size, edge, EDGE_BUFF, s.frame()) + shift;
    move_to(s, id, at)
}

/// Translate every item of `id` so its bounds are centred on `at`.
pub fn move_to(s: &mut SceneBuilder, id: &str, at: Point) -> SceneResult<()> {
    let c = s.center(id)?;
    s.translate(id, at - c)
}

/// Place `id` beside `anchor`.
pub fn next_to(
    s: &mut SceneBuilder,
    id: &str,
    anchor: &str,
    dir: Direction,
    buff: f64,
) -> SceneResult<()> {
    let at = s.beside(anchor, s.size(id)?, dir, buff)?;
    move_to(s, id, at)
}

/// Text inside a rounded outline, grouped as `id` with parts `id.text` and `id.box`.
pub fn boxed_text(
    s: &mut SceneBuilder,
    id: &str,
    text: &str,
    size: f64,
    color: Color,
    corner_radius: f64,
    at: Point,
) -> SceneResult<()> {
    let t = VisualItem::text(format!("{id}.text"), text, size)
        .color(color)
        .at(at);
    let r = place::surround(t.bounds(), SURROUND_BUFF);
    s.add(t)?;
    s.add(
        VisualItem::rounded_rect(format!("{id}.box"), r.width(), r.height(), corner_radius)
            .color(color)
            .at(at),
    )?;
    s.group(id, [format!("{id}.text"), format!("{id}.box")])
}

/// A copy of `item` drawn as a soft halo: thick translucent stroke, no fill.
pub fn glow(item: &VisualItem, id: &str, color: Color) -> VisualItem {
    let mut g = item.clone();
    g.id = id.to_owned();
    g.fill = None;
    g.stroke_width = 20.0;
    g.color = color.with_alpha(0.3);
    g.z = item.z - 1;
    g
}

#[cfg(test)]
#[path = "../../tests/unit/scenes/common.rs"]
mod tests;
