//! A word's path from text to token id to embedding, positional encoding, and their sum.

use crate::{
    foundation::{
        color::Color,
        core::{Direction, Point, Vec2},
        error::SceneResult,
        math::{Rng64, sine_ramp},
    },
    layout::place::{self, Align},
    scene::{
        dsl::{Scene, SceneBuilder},
        model::{Attach, Connection, Tip, VisualItem, text_size},
    },
    scenes::common::{EDGE_BUFF, NEXT_TO_BUFF, SURROUND_BUFF, boxed_text, move_to, next_to},
    timeline::step::{Action, TimelineStep},
};

/// Catalog name.
pub const NAME: &str = "token_embedding";

#[derive(Clone, Debug)]
/// Colours used by this scene.
pub struct Palette {
    /// Input words.
    pub word: Color,
    /// Token id boxes.
    pub token: Color,
    /// Embedding vector.
    pub embed: Color,
    /// Position encoding vector.
    pub position: Color,
    /// Summed embedding.
    pub combined: Color,
    /// Subtitle and dimension markers.
    pub dim: Color,
    /// Recoloured values under focus.
    pub highlight: Color,
    /// Title and operators.
    pub text: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            word: Color::rgb8(0x2e, 0xcc, 0x71),
            token: Color::rgb8(0xe7, 0x4c, 0x3c),
            embed: Color::rgb8(0x34, 0x98, 0xdb),
            position: Color::rgb8(0x9b, 0x59, 0xb6),
            combined: Color::rgb8(0xf1, 0xc4, 0x0f),
            dim: Color::rgb8(0x95, 0xa5, 0xa6),
            highlight: Color::YELLOW,
            text: Color::WHITE,
        }
    }
}

#[derive(Clone, Debug)]
/// Words and vector sizes shown.
pub struct Script {
    /// Input words; the first is followed through.
    pub words: Vec<String>,
    /// Token id shown for the first word.
    pub token_id: u32,
    /// Vector length.
    pub dims: usize,
    /// Seed for the sampled embedding values.
    pub seed: u64,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            words: ["Hello", "ICTer", "Workshop"].map(String::from).to_vec(),
            token_id: 35674,
            dims: 8,
            seed: 7,
        }
    }
}

const CELL: Vec2 = Vec2::new(0.8, 0.4);
const CELL_GAP: f64 = 0.1;
const VALUE_FONT: f64 = 16.0;

/// Sampled embedding, positional ramp, and their elementwise sum.
pub fn vectors(script: &Script) -> [Vec<f64>; 3] {
    let mut rng = Rng64::new(script.seed);
    let embed: Vec<f64> = (0..script.dims).map(|_| rng.next_gaussian() * 0.5).collect();
    let position = sine_ramp(script.dims, 0.3);
    let combined = embed.iter().zip(&position).map(|(a, b)| a + b).collect();
    [embed, position, combined]
}

/// Build the scene with the default script.
pub fn build(p: &Palette) -> SceneResult<Scene> {
    build_with(p, &Script::default())
}

/// Build the scene from `script`.
pub fn build_with(p: &Palette, script: &Script) -> SceneResult<Scene> {
    let mut s = SceneBuilder::new(NAME);

    s.add(VisualItem::text("title", "The journey of a Token", 40.0).color(p.text))?;
    let size = s.size("title")?;
    let at = place::to_edge(Point::ORIGIN, size, Direction::Up, EDGE_BUFF, s.frame());
    move_to(&mut s, "title", at)?;
    s.add(VisualItem::text("subtitle", "From Words to High-Dimensional Vectors", 24.0).color(p.dim))?;
    next_to(&mut s, "subtitle", "title", Direction::Down, NEXT_TO_BUFF)?;
    s.play(TimelineStep::new([Action::write("title"), Action::write("subtitle")]));

    // Input words down the left edge.
    let sizes: Vec<Vec2> = script
        .words
        .iter()
        .map(|w| {
            let t = text_size(w, 32.0);
            Vec2::new(t.x + 2.0 * SURROUND_BUFF, t.y + 2.0 * SURROUND_BUFF)
        })
        .collect();
    let spots = place::arrange(&sizes, Direction::Down, 0.5, Align::Center, Point::ORIGIN);
    let word = |i: usize| format!("word.{i}");
    for (i, (w, at)) in script.words.iter().zip(spots).enumerate() {
        boxed_text(&mut s, &word(i), w, 32.0, p.word, 0.2, at)?;
    }
    s.group("words", (0..script.words.len()).map(word))?;
    let r = s.bounds("words")?;
    let at = place::to_edge(r.center(), s.size("words")?, Direction::Left, 1.0, s.frame());
    move_to(&mut s, "words", at)?;

    s.add(VisualItem::text("formula", "E: V → ℝᵈ    d = 512", 38.0).color(p.embed))?;
    next_to(&mut s, "formula", "subtitle", Direction::Down, 1.0)?;
    s.add(
        VisualItem::text(
            "formula.note",
            "Each word is mapped to a high-dimensional vector",
            20.0,
        )
        .color(p.dim),
    )?;
    next_to(&mut s, "formula.note", "formula", Direction::Down, NEXT_TO_BUFF)?;
    s.play(
        TimelineStep::new([
            Action::fade_in("words"),
            Action::write("formula"),
            Action::write("formula.note"),
        ])
        .wait(3.0),
    );
    s.play(TimelineStep::new([
        Action::fade_out("formula"),
        Action::fade_out("formula.note"),
    ]));

    // Tokenization of the first word.
    let first = script.words.first().map(String::as_str).unwrap_or_default();
    s.add(
        VisualItem::text(
            "tokenize",
            format!("tokenize({first}) = {}", script.token_id),
            38.0,
        )
        .color(p.token),
    )?;
    next_to(&mut s, "tokenize", &word(0), Direction::Right, 2.0)?;
    s.play(
        TimelineStep::new([
            Action::write("tokenize"),
            Action::recolor(word(0), p.highlight),
        ])
        .run_time(1.25),
    );
    s.play(TimelineStep::new([Action::recolor(word(0), p.word)]));

    // Embedding, positional, and combined vectors.
    let values = vectors(script);
    let kinds = [
        ("embed", "Token\nEmbedding", p.embed),
        ("position", "Position\nEncoding", p.position),
        ("combined", "Final\nEmbedding", p.combined),
    ];
    let column = Vec2::new(
        CELL.x,
        script.dims as f64 * CELL.y + script.dims.saturating_sub(1) as f64 * CELL_GAP,
    );
    let spots = place::arrange(&[column; 3], Direction::Right, 1.5, Align::Center, Point::ORIGIN);
    for ((id, _, color), (vals, at)) in kinds.iter().zip(values.iter().zip(spots)) {
        vector_column(&mut s, id, vals, *color, at)?;
    }
    s.group("vectors", kinds.map(|(id, _, _)| id))?;
    next_to(&mut s, "vectors", "tokenize", Direction::Down, 1.5)?;

    let mut reveal = Vec::new();
    let mut labels = Vec::new();
    for (id, text, color) in kinds {
        let label = format!("{id}.label");
        s.add(VisualItem::text(&label, text, 20.0).color(color))?;
        next_to(&mut s, &label, id, Direction::Up, NEXT_TO_BUFF)?;
        reveal.push(Action::appear(id));
        labels.push(label);
    }
    s.group("labels", labels)?;
    s.add(
        VisualItem::text(
            "pe",
            "PE(pos, 2i) = sin(pos / 10000^(2i/d))\nPE(pos, 2i+1) = cos(pos / 10000^(2i/d))",
            29.0,
        )
        .color(p.position),
    )?;
    next_to(&mut s, "pe", "vectors", Direction::Down, 1.0)?;
    reveal.extend([Action::write("labels"), Action::write("pe")]);
    s.play(TimelineStep::new(reveal));

    // Dimension arrows beside each vector.
    let mut dims = Vec::new();
    for (id, _, _) in kinds {
        dims.push(dimension_arrow(&mut s, id, script.dims, p.dim)?);
    }
    s.group("dims", dims.iter().flat_map(|(a, l)| [a.clone(), l.clone()]))?;
    s.play(TimelineStep::new(dims.iter().flat_map(|(arrow, label)| {
        [Action::grow(arrow.as_str()), Action::write(label.as_str())]
    })));

    let plus_at = s.center("position")? + Vec2::new(-0.5, 0.0);
    let equals_at = s.center("combined")? + Vec2::new(-0.5, 0.0);
    s.add(VisualItem::text("plus", "+", 36.0).color(p.text).at(plus_at))?;
    s.add(VisualItem::text("equals", "=", 36.0).color(p.text).at(equals_at))?;
    s.play(TimelineStep::new([Action::write("plus"), Action::write("equals")]));

    for i in 0..script.dims {
        s.play(
            TimelineStep::new(
                kinds.map(|(id, _, _)| Action::recolor(format!("{id}.{i}"), p.highlight)),
            )
            .run_time(0.3),
        );
        s.play(
            TimelineStep::new(
                kinds.map(|(id, _, color)| Action::recolor(format!("{id}.{i}"), color)),
            )
            .run_time(0.3),
        );
    }

    s.play(TimelineStep::new(
        [
            "words", "tokenize", "vectors", "labels", "pe", "dims", "plus", "equals",
        ]
        .map(Action::fade_out),
    ));

    // Summary.
    s.add(
        VisualItem::text(
            "summary.text",
            "Key Points:\n1. Words → Tokens → Embeddings\n2. Embeddings capture semantic meaning\n\
             3. Position adds sequential information\n4. Final dim",
            24.0,
        )
        .color(p.text),
    )?;
    let r = place::surround(s.bounds("summary.text")?, 0.3);
    s.add(
        VisualItem::rect("summary.box", r.width(), r.height())
            .color(p.dim)
            .at(r.center()),
    )?;
    s.group("summary", ["summary.text", "summary.box"])?;
    next_to(&mut s, "summary", "title", Direction::Down, 1.5)?;
    s.play(TimelineStep::new([
        Action::write("summary.text"),
        Action::appear("summary.box"),
    ]));

    s.add(VisualItem::text("semantic", "king − man + woman ≈ queen", 38.0).color(p.embed))?;
    next_to(&mut s, "semantic", "summary", Direction::Down, NEXT_TO_BUFF)?;
    s.play(TimelineStep::new([Action::write("semantic")]).wait(3.0));

    s.build()
}

/// Stacked value cells grouped as `id`; cell `i` is group `id.i`.
fn vector_column(
    s: &mut SceneBuilder,
    id: &str,
    values: &[f64],
    color: Color,
    center: Point,
) -> SceneResult<()> {
    let spots = place::arrange(
        &vec![CELL; values.len()],
        Direction::Down,
        CELL_GAP,
        Align::Center,
        center,
    );
    let mut cells = Vec::with_capacity(values.len());
    for (i, (v, at)) in values.iter().zip(spots).enumerate() {
        let cell = format!("{id}.{i}");
        s.add(
            VisualItem::rect(format!("{cell}.box"), CELL.x, CELL.y)
                .color(color)
                .stroke(1.0)
                .at(at),
        )?;
        s.add(
            VisualItem::text(format!("{cell}.value"), format!("{v:.2}"), VALUE_FONT)
                .color(color)
                .at(at),
        )?;
        s.group(&cell, [format!("{cell}.box"), format!("{cell}.value")])?;
        cells.push(cell);
    }
    s.group(id, cells)
}

/// Double-headed arrow spanning half the vector's height, with a `d=N` caption.
///
/// The arrow runs between two anchor dots that never appear on canvas.
fn dimension_arrow(
    s: &mut SceneBuilder,
    id: &str,
    dims: usize,
    color: Color,
) -> SceneResult<(String, String)> {
    let r = s.bounds(id)?;
    let len = (r.height() + 0.2) * 0.5;
    let x = r.x1 + 0.1;
    let cy = r.center().y;
    let top = format!("{id}.dim.top");
    let bottom = format!("{id}.dim.bottom");
    s.add(VisualItem::dot(&top, 0.01).at(Point::new(x, cy + len * 0.5)))?;
    s.add(VisualItem::dot(&bottom, 0.01).at(Point::new(x, cy - len * 0.5)))?;

    let arrow = format!("{id}.dim");
    s.connect(
        Connection::arrow(&arrow, &top, &bottom)
            .color(color)
            .tip(Tip::Both)
            .attach(Attach::Center)
            .buff(0.0),
    )?;
    let label = format!("{id}.dim.label");
    s.add(VisualItem::text(&label, format!("d={dims}"), 16.0).color(color))?;
    let size = s.size(&label)?;
    let at = place::next_to(
        place::rect_at(Point::new(x, cy), Vec2::ZERO),
        size,
        Direction::Right,
        0.1,
    );
    s.reposition(&label, at)?;
    Ok((arrow, label))
}

#[cfg(test)]
#[path = "../../tests/unit/scenes/token_embedding.rs"]
mod tests;
