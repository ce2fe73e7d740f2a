//! Four attention heads run side by side, then get concatenated and projected.

use crate::{
    animation::ease::Ease,
    foundation::{
        color::Color,
        core::{Direction, Point, Vec2},
        error::SceneResult,
    },
    layout::place::{self, Align},
    scene::{
        dsl::{Scene, SceneBuilder},
        model::{Connection, VisualItem},
    },
    scenes::common::{
        ARRANGE_BUFF, DOWN, NEXT_TO_BUFF, TextLine, explanation, glow, move_to, next_to,
        text_stack,
    },
    timeline::step::{Action, PropChange, TimelineStep},
};

/// Catalog name.
pub const NAME: &str = "multi_head";

#[derive(Clone, Debug)]
/// Colours used by this scene.
pub struct Palette {
    /// Input block.
    pub input: Color,
    /// One colour per head.
    pub heads: [Color; 4],
    /// Concatenated heads.
    pub concat: Color,
    /// Output projection.
    pub projection: Color,
    /// Headings.
    pub heading: Color,
    /// Explanatory text.
    pub body: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            input: Color::rgb8(0x2e, 0xcc, 0x71),
            heads: [
                Color::rgb8(0xFF, 0x57, 0x33),
                Color::rgb8(0x33, 0xFF, 0x57),
                Color::rgb8(0x33, 0x57, 0xFF),
                Color::rgb8(0xFF, 0x33, 0xF5),
            ],
            concat: Color::rgb8(0xe6, 0x7e, 0x22),
            projection: Color::rgb8(0x16, 0xa0, 0x85),
            heading: Color::WHITE,
            body: Color::GRAY,
        }
    }
}

const TITLE_EDGE_BUFF: f64 = 1.0;

/// Build the scene.
pub fn build(p: &Palette) -> SceneResult<Scene> {
    let mut s = SceneBuilder::new(NAME);
    let explain = |s: &mut SceneBuilder, id: &str, title: &str, body: &[&str]| {
        explanation(
            s,
            id,
            TextLine::new(title, p.heading, 24.0),
            body,
            p.body,
            ARRANGE_BUFF,
            Direction::Right,
            DOWN,
        )
    };

    let title = text_stack(
        &mut s,
        "title",
        &[
            TextLine::new("Multi-Head Attention", p.heading, 32.0),
            TextLine::new("Parallel processing of attention mechanisms", p.body, 20.0),
        ],
        0.5,
        Align::Center,
        Point::ORIGIN,
    )?;
    let at = place::to_edge(
        title.center(),
        Vec2::new(title.width(), title.height()),
        Direction::Up,
        TITLE_EDGE_BUFF,
        s.frame(),
    );
    move_to(&mut s, "title", at)?;
    s.play(TimelineStep::new([Action::write("title")]).wait(2.0));
    s.play(TimelineStep::new([Action::fade_out("title.1")]).wait(1.0));

    s.add(
        VisualItem::rect("input", 0.8, 1.0)
            .color(p.input)
            .fill(p.input, 0.3)
            .at(Point::new(-6.0, 0.0)),
    )?;
    s.add(VisualItem::text("input.label", "Input\nToken", 20.0).color(p.input))?;
    next_to(&mut s, "input.label", "input", Direction::Up, NEXT_TO_BUFF)?;
    s.play(TimelineStep::new([
        Action::appear("input"),
        Action::write("input.label"),
    ]));

    let total = p.heads.len();
    for (i, color) in p.heads.iter().enumerate() {
        head(&mut s, i, total, *color)?;
        s.play(TimelineStep::new([Action::appear(format!("head.{i}"))]).run_time(0.75));
    }
    s.wait(2.0);

    explain(
        &mut s,
        "explain.heads",
        "Parallel Attention Heads:",
        &[
            "• Each head learns different patterns",
            "• Different aspects of relationships",
            "• Independent parameter matrices",
        ],
    )?;
    s.play(TimelineStep::new([Action::write("explain.heads")]).wait(7.0));

    // Concatenation, placed against the second head.
    s.add(
        VisualItem::rect("concat", 1.2, 2.0)
            .color(p.concat)
            .fill(p.concat, 0.3),
    )?;
    next_to(&mut s, "concat", "head.1.att", Direction::Right, 1.5)?;
    s.add(VisualItem::text("concat.label", "Concatenate", 20.0).color(p.concat))?;
    next_to(&mut s, "concat.label", "concat", Direction::Up, NEXT_TO_BUFF)?;
    let mut concat_step = vec![
        Action::fade_out("explain.heads"),
        Action::appear("concat"),
        Action::write("concat.label"),
    ];
    for (i, color) in p.heads.iter().enumerate() {
        let id = format!("concat.arrow.{i}");
        s.connect(Connection::arrow(&id, format!("head.{i}.att"), "concat").color(*color))?;
        concat_step.push(Action::grow(id));
    }
    s.play(TimelineStep::new(concat_step).run_time(1.5));

    explain(
        &mut s,
        "explain.concat",
        "Concatenation:",
        &[
            "• Combine all head outputs",
            "• Preserve information from all heads",
            "• [Head₁; Head₂; Head₃; Head₄]",
        ],
    )?;
    s.play(TimelineStep::new([Action::write("explain.concat")]).wait(7.0));

    let projection = VisualItem::rect("projection", 1.2, 1.5)
        .color(p.projection)
        .fill(p.projection, 0.3);
    s.add(glow(&projection, "projection.glow", p.projection))?;
    s.add(projection)?;
    s.group("projection.group", ["projection.glow", "projection"])?;
    next_to(&mut s, "projection.group", "concat", Direction::Right, 1.5)?;
    s.add(VisualItem::text("projection.label", "Linear\nProjection", 20.0).color(p.projection))?;
    next_to(&mut s, "projection.label", "projection", Direction::Up, NEXT_TO_BUFF)?;
    s.connect(Connection::arrow("projection.arrow", "concat", "projection").color(p.concat))?;
    s.play(TimelineStep::new([
        Action::fade_out("explain.concat"),
        Action::appear("projection.group"),
        Action::write("projection.label"),
        Action::appear("projection.arrow"),
    ]));

    explain(
        &mut s,
        "explain.projection",
        "Final Projection:",
        &[
            "• Projects concatenated features",
            "• Combines multi-head information",
            "• Produces final attention output",
        ],
    )?;
    s.play(TimelineStep::new([Action::write("explain.projection")]).wait(7.0));

    s.play(
        TimelineStep::new([Action::animate(
            "projection.glow",
            PropChange::default().scale(1.2).opacity(0.5),
        )])
        .ease(Ease::ThereAndBack)
        .run_time(2.0)
        .wait(2.0),
    );

    s.play(TimelineStep::new([Action::clear(DOWN * 0.5)]).run_time(1.5));
    s.build()
}

/// One head: Q/K/V boxes with labels, an attention box, and arrows from the input token.
/// Everything lands in group `head.{index}`; the attention box is `head.{index}.att`.
fn head(s: &mut SceneBuilder, index: usize, total: usize, color: Color) -> SceneResult<()> {
    let id = format!("head.{index}");
    let y = (total as f64 - 1.0) / 2.0 - index as f64;
    let boxes = place::arrange(
        &[Vec2::new(0.3, 0.4); 3],
        Direction::Right,
        0.2,
        Align::Center,
        Point::new(-2.0, y),
    );

    let mut members = Vec::new();
    for (name, at) in ["Q", "K", "V"].into_iter().zip(boxes) {
        let box_id = format!("{id}.{}", name.to_lowercase());
        let label_id = format!("{box_id}.label");
        s.add(
            VisualItem::rect(&box_id, 0.3, 0.4)
                .color(color)
                .fill(color, 0.3)
                .at(at),
        )?;
        s.add(VisualItem::text(&label_id, name, 14.0).color(color))?;
        next_to(s, &label_id, &box_id, Direction::Up, 0.1)?;
        let arrow_id = format!("{box_id}.in");
        s.connect(Connection::arrow(&arrow_id, "input", &box_id).color(color).width(2.0))?;
        members.extend([box_id, label_id, arrow_id]);
    }
    s.group(format!("{id}.qkv"), [format!("{id}.q"), format!("{id}.k"), format!("{id}.v")])?;

    let att = format!("{id}.att");
    let att_label = format!("{att}.label");
    s.add(
        VisualItem::rect(&att, 0.6, 0.6)
            .color(color)
            .fill(color, 0.2),
    )?;
    next_to(s, &att, &format!("{id}.qkv"), Direction::Right, 1.0)?;
    s.add(VisualItem::text(&att_label, format!("Head {}", index + 1), 16.0).color(color))?;
    next_to(s, &att_label, &att, Direction::Up, NEXT_TO_BUFF)?;
    let att_arrow = format!("{att}.in");
    s.connect(
        Connection::arrow(&att_arrow, format!("{id}.q"), &att)
            .color(color)
            .width(2.0),
    )?;
    members.extend([att, att_label, att_arrow]);
    s.group(id, members)
}

#[cfg(test)]
#[path = "../../tests/unit/scenes/multi_head.rs"]
mod tests;
