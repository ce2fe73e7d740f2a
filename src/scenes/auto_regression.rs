//! Words of a sentence chained node to node; repeated words collapse into one shared node.

use crate::{
    foundation::{color::Color, core::Point, error::SceneResult, math::centroid},
    layout::pattern::{LayoutFrame, LayoutPattern, layout},
    scene::{
        dsl::{Scene, SceneBuilder},
        model::{Attach, Connection, VisualItem},
    },
    timeline::step::{Action, TimelineStep},
};

/// Catalog name.
pub const NAME: &str = "auto_regression";

#[derive(Clone, Debug)]
/// Colours used by this scene.
pub struct Palette {
    /// Word node outlines.
    pub node: Color,
    /// Word labels.
    pub text: Color,
    /// Chain arrows.
    pub arrow: Color,
    /// Merged word and node.
    pub highlight: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            node: Color::WHITE,
            text: Color::WHITE,
            arrow: Color::WHITE,
            highlight: Color::RED,
        }
    }
}

#[derive(Clone, Debug)]
/// Sentence and layout of the chain.
pub struct Script {
    /// Words, split on whitespace.
    pub sentence: String,
    /// Word merged into a single node, compared case-insensitively.
    pub merge_word: String,
    /// Snake rows.
    pub rows: usize,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            sentence: "Early one morning the sun was shining I was laying in bed Wondering if she \
                       had changed at all if her hair was still red"
                .to_owned(),
            merge_word: "was".to_owned(),
            rows: 4,
        }
    }
}

const NODE_RADIUS: f64 = 0.3;
const MERGED_RADIUS: f64 = 0.5;
const FONT: f64 = 24.0;

fn arrow(id: String, from: String, to: String, color: Color) -> Connection {
    Connection::arrow(id, from, to)
        .color(color)
        .width(2.0)
        .tip_ratio(0.15)
}

/// Build the scene with the default script.
pub fn build(palette: &Palette) -> SceneResult<Scene> {
    build_with(palette, &Script::default())
}

/// Build the scene from `script`.
pub fn build_with(palette: &Palette, script: &Script) -> SceneResult<Scene> {
    let words: Vec<&str> = script.sentence.split_whitespace().collect();
    let spots = layout(
        words.len(),
        &LayoutPattern::snake(script.rows),
        &LayoutFrame::default(),
    )?;

    let mut s = SceneBuilder::new(NAME);
    let node = |i: usize| format!("node.{i}");
    let word = |i: usize| format!("word.{i}");
    s.add_all(words.iter().zip(&spots).enumerate().flat_map(|(i, (w, at))| {
        [
            VisualItem::circle(node(i), NODE_RADIUS).color(palette.node).at(*at),
            VisualItem::text(word(i), *w, FONT).color(palette.text).at(*at),
        ]
    }))?;
    for i in 1..words.len() {
        s.connect(
            arrow(format!("arrow.{}", i - 1), node(i - 1), node(i), palette.arrow)
                .attach(Attach::Boundary)
                .buff(0.0),
        )?;
    }
    let all_nodes: Vec<String> = (0..words.len()).map(node).collect();
    let all_words: Vec<String> = (0..words.len()).map(word).collect();
    let all_arrows: Vec<String> = (1..words.len()).map(|i| format!("arrow.{}", i - 1)).collect();
    s.group("nodes", all_nodes)?;
    s.group("words", all_words)?;

    s.play(TimelineStep::new([Action::appear("nodes"), Action::write("words")]));
    if !all_arrows.is_empty() {
        s.group("arrows", all_arrows)?;
        s.play(TimelineStep::new([Action::appear("arrows")]).wait(1.0));
    }

    let hits: Vec<usize> = words
        .iter()
        .enumerate()
        .filter(|(_, w)| w.eq_ignore_ascii_case(&script.merge_word))
        .map(|(i, _)| i)
        .collect();
    if hits.is_empty() {
        s.wait(2.0);
        return s.build();
    }

    s.group("hit_nodes", hits.iter().map(|&i| node(i)))?;
    s.group("hit_words", hits.iter().map(|&i| word(i)))?;
    s.play(
        TimelineStep::new([
            Action::recolor("hit_nodes", palette.highlight),
            Action::recolor("hit_words", palette.highlight),
        ])
        .wait(1.0),
    );

    let hit_points: Vec<Point> = hits.iter().map(|&i| spots[i]).collect();
    let center = centroid(&hit_points).unwrap_or(Point::ORIGIN);

    s.add(
        VisualItem::circle("merged.node", MERGED_RADIUS)
            .color(palette.highlight)
            .at(center),
    )?;
    s.add(
        VisualItem::text("merged.word", script.merge_word.as_str(), FONT)
            .color(palette.highlight)
            .at(center),
    )?;

    // Arrows touching a merged word are dropped and re-routed through the merged node.
    let mut dropped = Vec::new();
    let mut rerouted = Vec::new();
    for &i in &hits {
        if i > 0 {
            dropped.push(format!("arrow.{}", i - 1));
            let id = format!("reroute.in.{i}");
            s.connect(
                arrow(id.clone(), node(i - 1), "merged.node".into(), palette.arrow)
                    .attach(Attach::Center)
                    .buff(NODE_RADIUS),
            )?;
            rerouted.push(id);
        }
        if i + 1 < words.len() {
            dropped.push(format!("arrow.{i}"));
            let id = format!("reroute.out.{i}");
            s.connect(
                arrow(id.clone(), "merged.node".into(), node(i + 1), palette.arrow)
                    .attach(Attach::Center)
                    .buff(NODE_RADIUS),
            )?;
            rerouted.push(id);
        }
    }
    dropped.sort();
    dropped.dedup();

    let mut gather: Vec<Action> = hits
        .iter()
        .flat_map(|&i| [Action::move_to(node(i), center), Action::move_to(word(i), center)])
        .collect();
    gather.extend(dropped.iter().map(|id| Action::fade_out(id.as_str())));
    s.play(TimelineStep::new(gather));

    let mut merge = vec![
        Action::transform_into("hit_nodes", "merged.node"),
        Action::transform_into("hit_words", "merged.word"),
    ];
    merge.extend(rerouted.iter().map(|id| Action::appear(id.as_str())));
    s.play(TimelineStep::new(merge).wait(2.0));

    s.build()
}

#[cfg(test)]
#[path = "../../tests/unit/scenes/auto_regression.rs"]
mod tests;
