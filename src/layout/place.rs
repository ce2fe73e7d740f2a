//! Relative placement in scene units.
//!
//! Every helper returns the *centre* the new item should be moved to; callers own the items.

use crate::foundation::core::{Direction, FrameSpec, Point, Rect, Vec2};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Cross-axis alignment for [`arrange`].
pub enum Align {
    /// Left edge for vertical stacks, top edge for horizontal stacks.
    Start,
    #[default]
    /// Centred on the cross axis.
    Center,
    /// Right edge for vertical stacks, bottom edge for horizontal stacks.
    End,
}

/// Rectangle of `size` centred on `center`.
pub fn rect_at(center: Point, size: Vec2) -> Rect {
    Rect::from_center_size(center, (size.x, size.y))
}

/// Centre for an item of `size` placed beside `anchor` with a `buff` gap.
pub fn next_to(anchor: Rect, size: Vec2, dir: Direction, buff: f64) -> Point {
    let c = anchor.center();
    match dir {
        Direction::Up => Point::new(c.x, anchor.y1 + buff + size.y * 0.5),
        Direction::Down => Point::new(c.x, anchor.y0 - buff - size.y * 0.5),
        Direction::Right => Point::new(anchor.x1 + buff + size.x * 0.5, c.y),
        Direction::Left => Point::new(anchor.x0 - buff - size.x * 0.5, c.y),
    }
}

/// Push an item against a frame edge, keeping its other coordinate.
pub fn to_edge(current: Point, size: Vec2, edge: Direction, buff: f64, frame: FrameSpec) -> Point {
    let b = frame.bounds();
    match edge {
        Direction::Up => Point::new(current.x, b.y1 - buff - size.y * 0.5),
        Direction::Down => Point::new(current.x, b.y0 + buff + size.y * 0.5),
        Direction::Left => Point::new(b.x0 + buff + size.x * 0.5, current.y),
        Direction::Right => Point::new(b.x1 - buff - size.x * 0.5, current.y),
    }
}

/// Lay out items edge to edge along `dir` with `buff` gaps, the whole run centred on `center`.
pub fn arrange(sizes: &[Vec2], dir: Direction, buff: f64, align: Align, center: Point) -> Vec<Point> {
    if sizes.is_empty() {
        return Vec::new();
    }
    let gaps = (sizes.len() - 1) as f64 * buff;
    let horizontal = dir.is_horizontal();
    let along = |s: &Vec2| if horizontal { s.x } else { s.y };
    let across = |s: &Vec2| if horizontal { s.y } else { s.x };

    let total = sizes.iter().map(along).sum::<f64>() + gaps;
    let cross = sizes.iter().map(across).fold(0.0, f64::max);

    let mut out = Vec::with_capacity(sizes.len());
    let mut cursor = -total * 0.5;
    for size in sizes {
        let mid = cursor + along(size) * 0.5;
        cursor += along(size) + buff;

        // Cross offset measured from the run's start edge (left or top).
        let off = align_offset(cross, across(size), align) + across(size) * 0.5 - cross * 0.5;
        let p = match dir {
            Direction::Right => Point::new(center.x + mid, center.y - off),
            Direction::Left => Point::new(center.x - mid, center.y - off),
            Direction::Down => Point::new(center.x + off, center.y - mid),
            Direction::Up => Point::new(center.x + off, center.y + mid),
        };
        out.push(p);
    }
    out
}

/// `rect` grown by `buff` on every side.
pub fn surround(rect: Rect, buff: f64) -> Rect {
    rect.inflate(buff, buff)
}

/// Smallest rectangle covering all inputs.
pub fn bounds_union(rects: impl IntoIterator<Item = Rect>) -> Option<Rect> {
    rects.into_iter().reduce(|a, b| a.union(b))
}

fn align_offset(container: f64, content: f64, align: Align) -> f64 {
    let rem = (container - content).max(0.0);
    match align {
        Align::Start => 0.0,
        Align::Center => rem * 0.5,
        Align::End => rem,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/place.rs"]
mod tests;
