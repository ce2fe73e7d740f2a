//! Single-head self-attention, one stage at a time: embedding, Q/K/V projections, score matrix,
//! softmax, weighted sum.

use std::f64::consts::TAU;

use crate::{
    foundation::{
        color::Color,
        core::{Direction, Point, Vec2},
        error::SceneResult,
        math::softmax,
    },
    layout::place::{self, Align},
    scene::{
        dsl::{Scene, SceneBuilder},
        model::{Connection, VisualItem, text_size},
    },
    scenes::common::{
        DOWN, NEXT_TO_BUFF, TextLine, explanation, glow, next_to, text_stack,
    },
    timeline::step::{Action, PropChange, TimelineStep},
};

/// Catalog name.
pub const NAME: &str = "attention";

#[derive(Clone, Debug)]
/// Colours used by this scene.
pub struct Palette {
    /// Token embedding box.
    pub token: Color,
    /// Query projection.
    pub query: Color,
    /// Key projection.
    pub key: Color,
    /// Value projection.
    pub value: Color,
    /// Score matrix fill.
    pub matrix: Color,
    /// Softmax bars.
    pub bars: Color,
    /// Attention output.
    pub output: Color,
    /// Stage headings.
    pub heading: Color,
    /// Explanatory text.
    pub body: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            token: Color::rgb8(0x2e, 0xcc, 0x71),
            query: Color::rgb8(0xe7, 0x4c, 0x3c),
            key: Color::rgb8(0x34, 0x98, 0xdb),
            value: Color::rgb8(0xf1, 0xc4, 0x0f),
            matrix: Color::rgb8(0x9b, 0x59, 0xb6),
            bars: Color::rgb8(0x34, 0x98, 0xdb),
            output: Color::rgb8(0x1a, 0xbc, 0x9c),
            heading: Color::WHITE,
            body: Color::GRAY,
        }
    }
}

/// Raw compatibility scores behind the softmax bars.
pub const SCORES: [f64; 5] = [2.2, 1.6, 1.1, 0.7, 0.0];

const BAR_MAX_WIDTH: f64 = 1.2;

fn vector_box(id: &str, color: Color) -> VisualItem {
    VisualItem::rect(id, 0.8, 1.0).color(color).fill(color, 0.3)
}

fn curved(id: &str, from: &str, to: &str, color: Color) -> Connection {
    Connection::arrow(id, from, to).color(color).curved(TAU / 4.0)
}

/// Build the scene.
pub fn build(p: &Palette) -> SceneResult<Scene> {
    let mut s = SceneBuilder::new(NAME);
    let explain = |s: &mut SceneBuilder, id: &str, title: &str, color: Color, body: &[&str]| {
        explanation(
            s,
            id,
            TextLine::new(title, color, 24.0),
            body,
            p.body,
            0.2,
            Direction::Left,
            DOWN * 2.0,
        )
    };

    // Token embedding.
    s.add(vector_box("token", p.token).at(Point::new(-6.0, 2.0)))?;
    s.add(VisualItem::text("token.label", "Token\nEmbedding", 24.0).color(p.token))?;
    next_to(&mut s, "token.label", "token", Direction::Up, NEXT_TO_BUFF)?;
    explain(
        &mut s,
        "explain.token",
        "Token Embedding:",
        p.token,
        &[
            "• Dense vector representation of input token",
            "• Typically 512 or 768 dimensions",
            "• Captures semantic meaning of the token",
        ],
    )?;
    s.play(
        TimelineStep::new([
            Action::appear("token"),
            Action::write("token.label"),
            Action::write("explain.token"),
        ])
        .run_time(1.5)
        .wait(5.0),
    );

    // Q/K/V projections.
    explain(
        &mut s,
        "explain.linear",
        "Linear Transformations:",
        p.heading,
        &[
            "• WQ, WK, WV are learned weight matrices",
            "• Q = TokenEmb × WQ",
            "• K = TokenEmb × WK",
            "• V = TokenEmb × WV",
            "• Typically projects to dk dimensions",
        ],
    )?;
    let qkv = [
        ("query", "Query", p.query),
        ("key", "Key", p.key),
        ("value", "Value", p.value),
    ];
    let spots = place::arrange(
        &[Vec2::new(0.8, 1.0); 3],
        Direction::Right,
        1.2,
        Align::Center,
        Point::new(-2.0, 2.0),
    );
    for ((id, label, color), at) in qkv.iter().zip(spots) {
        s.add(vector_box(id, *color).at(at))?;
        let label_id = format!("{id}.label");
        s.add(VisualItem::text(&label_id, *label, 20.0).color(*color))?;
        next_to(&mut s, &label_id, id, Direction::Up, NEXT_TO_BUFF)?;
        s.connect(Connection::arrow(format!("project.{id}"), "token", *id).color(*color))?;
    }
    s.group("projections", ["project.query", "project.key", "project.value"])?;
    s.group("qkv.labels", ["query.label", "key.label", "value.label"])?;

    s.play(TimelineStep::new([Action::fade_out("explain.token")]).run_time(0.5));
    s.play(
        TimelineStep::new([
            Action::write("explain.linear"),
            Action::appear("projections"),
            Action::copy_into("token", "query"),
            Action::copy_into("token", "key"),
            Action::copy_into("token", "value"),
            Action::write("qkv.labels"),
        ])
        .run_time(2.0)
        .wait(6.0),
    );

    // Score matrix.
    explain(
        &mut s,
        "explain.scores",
        "Attention Calculation:",
        p.heading,
        &[
            "• Compute compatibility scores between",
            "  Query and all Keys",
            "• Score = (Q × K^T) / √dk",
            "• √dk scaling prevents vanishing gradients",
            "• Results in attention score matrix",
        ],
    )?;
    let m_center = Point::new(-3.0, 0.0);
    s.add(
        VisualItem::rect("matrix", 1.0, 1.0)
            .color(Color::WHITE)
            .fill(p.matrix, 0.3)
            .at(m_center),
    )?;
    let mut grid = Vec::new();
    for i in 0..4 {
        let k = i as f64 / 3.0;
        let v = format!("matrix.grid.v{i}");
        let h = format!("matrix.grid.h{i}");
        s.add(
            VisualItem::segment(&v, Vec2::new(0.0, -1.0))
                .at(m_center + Vec2::new(-0.5 + k, 0.0))
                .stroke(2.0),
        )?;
        s.add(
            VisualItem::segment(&h, Vec2::new(1.0, 0.0))
                .at(m_center + Vec2::new(0.0, 0.5 - k))
                .stroke(2.0),
        )?;
        grid.push(v);
        grid.push(h);
    }
    s.group("matrix.grid", grid)?;
    s.add(VisualItem::text("matrix.label", "Attention\nScores", 20.0))?;
    next_to(&mut s, "matrix.label", "matrix", Direction::Left, NEXT_TO_BUFF)?;
    s.connect(curved("score.query", "query", "matrix", p.query))?;
    s.connect(curved("score.key", "key", "matrix", p.key))?;
    s.group("score.arrows", ["score.query", "score.key"])?;

    s.play(
        TimelineStep::new([
            Action::fade_out("explain.linear"),
            Action::fade_out("projections"),
        ])
        .run_time(0.5),
    );
    s.play(
        TimelineStep::new([
            Action::write("explain.scores"),
            Action::appear("matrix"),
            Action::appear("matrix.grid"),
            Action::write("matrix.label"),
            Action::appear("score.arrows"),
        ])
        .run_time(1.5)
        .wait(6.0),
    );

    // Softmax distribution.
    explain(
        &mut s,
        "explain.softmax",
        "Softmax Operation:",
        p.heading,
        &[
            "• Converts raw scores to probabilities",
            "• exp(xi) / Σexp(xj) for each score",
            "• Output sums to 1.0 (probability dist.)",
            "• Higher scores get higher probabilities",
            "• Controls focus on different tokens",
        ],
    )?;
    softmax_bars(&mut s, p)?;
    next_to(&mut s, "softmax", "matrix", Direction::Down, 0.5)?;
    text_stack(
        &mut s,
        "softmax.label",
        &[
            TextLine::new("Softmax Distribution", Color::WHITE, 20.0),
            TextLine::new("(Attention weights across tokens)", p.body, 16.0),
        ],
        0.1,
        Align::Center,
        Point::ORIGIN,
    )?;
    next_to(&mut s, "softmax.label", "softmax", Direction::Left, NEXT_TO_BUFF)?;
    s.connect(Connection::arrow("softmax.arrow", "matrix", "softmax").color(Color::WHITE))?;

    s.play(
        TimelineStep::new([
            Action::fade_out("explain.scores"),
            Action::fade_out("score.arrows"),
        ])
        .run_time(0.5),
    );
    s.play(
        TimelineStep::new([
            Action::write("explain.softmax"),
            Action::appear("softmax"),
            Action::write("softmax.label"),
            Action::appear("softmax.arrow"),
        ])
        .run_time(2.0)
        .wait(6.0),
    );

    // Weighted sum of values.
    explain(
        &mut s,
        "explain.output",
        "Output Computation:",
        p.heading,
        &[
            "• Weighted sum of Values",
            "• Weights from softmax distribution",
            "• Output = Σ(attention_prob_i × value_i)",
            "• Aggregates information from relevant",
            "  tokens based on attention weights",
        ],
    )?;
    let output = vector_box("output", p.output);
    s.add(glow(&output, "output.glow", p.output))?;
    s.add(output)?;
    s.group("output.group", ["output.glow", "output"])?;
    next_to(&mut s, "output.group", "softmax", Direction::Down, 0.5)?;
    s.add(VisualItem::text("output.label", "Output", 20.0).color(p.output))?;
    next_to(&mut s, "output.label", "output", Direction::Right, NEXT_TO_BUFF)?;
    s.connect(curved("weighted.softmax", "softmax", "output", p.matrix))?;
    s.connect(curved("weighted.value", "value", "output", p.value))?;
    s.group("weighted.arrows", ["weighted.softmax", "weighted.value"])?;

    s.play(TimelineStep::new([Action::fade_out("explain.softmax")]).run_time(0.5));
    s.play(
        TimelineStep::new([
            Action::write("explain.output"),
            Action::appear("output.group"),
            Action::write("output.label"),
            Action::appear("weighted.arrows"),
        ])
        .run_time(2.0)
        .wait(6.0),
    );

    // Summary.
    explain(
        &mut s,
        "explain.summary",
        "Self-Attention Summary:",
        p.heading,
        &[
            "• Dynamically focuses on relevant tokens",
            "• Captures contextual relationships",
            "• Parallel computation for efficiency",
            "• Foundation of modern transformers",
        ],
    )?;
    s.play(
        TimelineStep::new([
            Action::fade_out("explain.output"),
            Action::fade_out("weighted.arrows"),
        ])
        .run_time(0.5),
    );
    s.play(
        TimelineStep::new([
            Action::write("explain.summary"),
            Action::animate("output.glow", PropChange::default().scale(1.2).opacity(0.5)),
        ])
        .run_time(5.0)
        .wait(6.0),
    );

    s.play(TimelineStep::new([Action::clear(DOWN * 0.5)]).run_time(1.5));
    s.build()
}

/// Horizontal probability bars with their values, grouped as `softmax`, centred on the origin.
fn softmax_bars(s: &mut SceneBuilder, p: &Palette) -> SceneResult<()> {
    let probs = softmax(&SCORES);
    let rows: Vec<(Vec2, Vec2)> = probs
        .iter()
        .map(|prob| {
            let bar = Vec2::new(BAR_MAX_WIDTH * prob, 0.2);
            let text = text_size(&format!("{prob:.2}"), 16.0);
            (bar, text)
        })
        .collect();
    let row_sizes: Vec<Vec2> = rows
        .iter()
        .map(|(b, t)| Vec2::new(b.x + t.x, b.y.max(t.y)))
        .collect();
    let row_centers = place::arrange(&row_sizes, Direction::Down, 0.1, Align::Center, Point::ORIGIN);

    let mut members = Vec::new();
    for (i, ((prob, (bar, text)), center)) in probs.iter().zip(&rows).zip(row_centers).enumerate() {
        let parts = place::arrange(&[*bar, *text], Direction::Right, 0.0, Align::Center, center);
        let bar_id = format!("softmax.bar{i}");
        let val_id = format!("softmax.value{i}");
        s.add(
            VisualItem::rect(&bar_id, bar.x, bar.y)
                .color(Color::WHITE)
                .stroke(1.0)
                .fill(p.bars, 0.8)
                .at(parts[0]),
        )?;
        s.add(VisualItem::text(&val_id, format!("{prob:.2}"), 16.0).at(parts[1]))?;
        members.push(bar_id);
        members.push(val_id);
    }
    s.group("softmax", members)?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scenes/attention.rs"]
mod tests;
