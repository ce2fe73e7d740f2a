//! Sequential RNN processing, token by token, then a side-by-side comparison with transformers.

use crate::{
    foundation::{
        color::Color,
        core::{Direction, FrameSpec, Point, Vec2},
        error::SceneResult,
    },
    layout::{
        pattern::{LayoutFrame, LayoutPattern, layout},
        place::{self, Align},
    },
    scene::{
        dsl::{Scene, SceneBuilder},
        model::{Connection, VisualItem, text_size},
    },
    scenes::common::{EDGE_BUFF, NEXT_TO_BUFF, SURROUND_BUFF, boxed_text, move_to, next_to},
    timeline::step::{Action, TimelineStep},
};

/// Catalog name.
pub const NAME: &str = "rnn_limitations";

#[derive(Clone, Debug)]
/// Colours used by this scene.
pub struct Palette {
    /// RNN title and input arrows.
    pub rnn: Color,
    /// Hidden state circles.
    pub hidden: Color,
    /// Input tokens.
    pub token: Color,
    /// Time step markers.
    pub marker: Color,
    /// Closing note.
    pub note: Color,
    /// Comparison table.
    pub table: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            rnn: Color::rgb8(0x2e, 0xcc, 0x71),
            hidden: Color::rgb8(0xe7, 0x4c, 0x3c),
            token: Color::WHITE,
            marker: Color::GRAY,
            note: Color::YELLOW,
            table: Color::WHITE,
        }
    }
}

/// Input sentence, one token per time step.
pub const TOKENS: [&str; 5] = ["ICTer", "workshop", "2024", "is", "awesome"];

/// Comparison table rows; the first is the header.
pub const COMPARISON: [[&str; 2]; 4] = [
    ["RNN", "Transformer"],
    ["Sequential", "Parallel"],
    ["Limited Context", "Global Context"],
    ["Memory Efficient", "Computationally Efficient"],
];

const TOKEN_FONT: f64 = 24.0;
const HIDDEN_RADIUS: f64 = 0.3;
const TABLE_FONT: f64 = 24.0;
const TABLE_H_BUFF: f64 = 0.65;
const TABLE_V_BUFF: f64 = 0.4;

fn subscript(n: usize) -> String {
    const DIGITS: [char; 10] = ['₀', '₁', '₂', '₃', '₄', '₅', '₆', '₇', '₈', '₉'];
    n.to_string()
        .chars()
        .filter_map(|c| c.to_digit(10).map(|d| DIGITS[d as usize]))
        .collect()
}

/// Build the scene.
pub fn build(p: &Palette) -> SceneResult<Scene> {
    let mut s = SceneBuilder::new(NAME);

    s.add(VisualItem::text("title", "Understanding the Limitations of RNNs", 40.0))?;
    let size = s.size("title")?;
    let at = place::to_edge(Point::ORIGIN, size, Direction::Up, EDGE_BUFF, s.frame());
    move_to(&mut s, "title", at)?;
    s.play(TimelineStep::new([Action::write("title")]));

    s.add(VisualItem::text("rnn.title", "Recurrent Neural Network (RNN)", 32.0).color(p.rnn))?;
    next_to(&mut s, "rnn.title", "title", Direction::Down, 1.5)?;

    let sizes: Vec<Vec2> = TOKENS
        .iter()
        .map(|t| {
            let sz = text_size(t, TOKEN_FONT);
            Vec2::new(sz.x + 2.0 * SURROUND_BUFF, sz.y + 2.0 * SURROUND_BUFF)
        })
        .collect();
    let spots = place::arrange(&sizes, Direction::Right, 0.75, Align::Center, Point::ORIGIN);
    let token = |i: usize| format!("token.{i}");
    for (i, (t, at)) in TOKENS.iter().zip(spots).enumerate() {
        boxed_text(&mut s, &token(i), t, TOKEN_FONT, p.token, 0.1, at)?;
    }
    s.group("tokens", (0..TOKENS.len()).map(token))?;
    next_to(&mut s, "tokens", "rnn.title", Direction::Down, 1.5)?;

    s.play(TimelineStep::new([Action::write("rnn.title")]));
    s.play(TimelineStep::new([Action::appear("tokens")]));

    hidden_state(&mut s, 0, p.hidden)?;
    next_to(&mut s, "h.0", &token(0), Direction::Up, 0.75)?;
    s.play(TimelineStep::new([Action::appear("h.0")]));

    let mut rnn_parts = vec!["rnn.title".to_owned(), "tokens".to_owned(), "h.0".to_owned()];
    for i in 0..TOKENS.len() {
        let h = format!("h.{}", i + 1);
        hidden_state(&mut s, i + 1, p.hidden)?;
        next_to(&mut s, &h, &token(i), Direction::Up, 0.75)?;

        let input = format!("input.{i}");
        s.connect(Connection::arrow(&input, token(i), format!("{h}.circle")).color(p.rnn))?;

        let marker = format!("marker.{i}");
        time_marker(&mut s, &marker, i + 1, p.marker)?;
        next_to(&mut s, &marker, &token(i), Direction::Down, NEXT_TO_BUFF)?;

        s.play(
            TimelineStep::new([
                Action::appear(h.as_str()),
                Action::grow(input.as_str()),
                Action::appear(marker.as_str()),
                Action::recolor(token(i), p.rnn),
            ])
            .run_time(0.8),
        );
        rnn_parts.extend([h.clone(), input, marker]);

        if i > 0 {
            let state = format!("state.{i}");
            s.connect(
                Connection::arrow(&state, format!("h.{i}.circle"), format!("{h}.circle"))
                    .color(p.hidden),
            )?;
            s.play(TimelineStep::new([Action::grow(state.as_str())]).run_time(0.5));
            rnn_parts.push(state);
        }

        let busy = format!("processing.{i}");
        s.add(VisualItem::text(&busy, "Processing...", 16.0).color(p.marker))?;
        next_to(&mut s, &busy, &h, Direction::Right, NEXT_TO_BUFF)?;
        s.play(TimelineStep::new([Action::fade_in(busy.as_str())]));
        s.play(TimelineStep::new([Action::fade_out(busy)]));
    }

    s.group("rnn", rnn_parts)?;
    s.play(TimelineStep::new([Action::fade_out("rnn")]));

    comparison_table(&mut s, "table", p.table)?;
    next_to(&mut s, "table", "title", Direction::Down, 1.75)?;
    s.play(TimelineStep::new([Action::appear("table")]));

    s.add(
        VisualItem::text(
            "note",
            "Transformers trade sequential processing for parallel computation",
            24.0,
        )
        .color(p.note),
    )?;
    next_to(&mut s, "note", "table", Direction::Down, 0.5)?;
    s.play(TimelineStep::new([Action::write("note")]).wait(2.0));

    s.build()
}

/// Circle with a subscripted `h` label, grouped as `h.{index}`.
fn hidden_state(s: &mut SceneBuilder, index: usize, color: Color) -> SceneResult<()> {
    let id = format!("h.{index}");
    s.add(VisualItem::circle(format!("{id}.circle"), HIDDEN_RADIUS).color(color))?;
    s.add(VisualItem::text(format!("{id}.text"), format!("h{}", subscript(index)), 28.0).color(color))?;
    s.group(&id, [format!("{id}.circle"), format!("{id}.text")])
}

/// Short tick with a `t=N` caption underneath.
fn time_marker(s: &mut SceneBuilder, id: &str, time: usize, color: Color) -> SceneResult<()> {
    let tick = format!("{id}.tick");
    let text = format!("{id}.text");
    s.add(VisualItem::segment(&tick, Vec2::new(0.0, -0.4)).color(color))?;
    s.add(VisualItem::text(&text, format!("t={time}"), 16.0).color(color))?;
    next_to(s, &text, &tick, Direction::Down, 0.1)?;
    s.group(id, [tick, text])
}

/// Outlined cells holding [`COMPARISON`], grouped as `id` and centred on the origin.
fn comparison_table(s: &mut SceneBuilder, id: &str, color: Color) -> SceneResult<()> {
    let cells: Vec<&str> = COMPARISON.iter().flatten().copied().collect();
    let (cw, ch) = cells.iter().fold((0.0f64, 0.0f64), |(w, h), c| {
        let sz = text_size(c, TABLE_FONT);
        (w.max(sz.x), h.max(sz.y))
    });
    let (cw, ch) = (cw + TABLE_H_BUFF, ch + TABLE_V_BUFF);
    let (rows, cols) = (COMPARISON.len(), 2);

    // Cell centres sit half a cell in from the table outline.
    let frame = LayoutFrame::new(
        FrameSpec::new(cw * cols as f64, ch * rows as f64)?,
        0.5 / cols as f64,
        0.5 / rows as f64,
    )?;
    let centers = layout(cells.len(), &LayoutPattern::Grid { rows, cols }, &frame)?;

    let mut members = Vec::with_capacity(cells.len() * 2);
    for (i, (text, at)) in cells.iter().zip(centers).enumerate() {
        let cell = format!("{id}.cell.{i}");
        let label = format!("{id}.text.{i}");
        s.add(VisualItem::rect(&cell, cw, ch).color(color).stroke(2.0).at(at))?;
        s.add(VisualItem::text(&label, *text, TABLE_FONT).color(color).at(at))?;
        members.extend([cell, label]);
    }
    s.group(id, members)
}

#[cfg(test)]
#[path = "../../tests/unit/scenes/rnn_limitations.rs"]
mod tests;
