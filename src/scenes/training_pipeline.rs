//! The three training phases of a language model, with a small network that reacts to each.

use crate::{
    animation::ease::Ease,
    foundation::{
        color::Color,
        core::{Direction, Point, Rect, Vec2},
        error::SceneResult,
    },
    layout::place::{self, Align},
    scene::{
        dsl::{Scene, SceneBuilder},
        model::{Attach, Connection, VisualItem, text_size},
    },
    scenes::common::{
        DOWN, EDGE_BUFF, LEFT, NEXT_TO_BUFF, RIGHT, TextLine, UP, move_to, next_to, text_stack,
    },
    timeline::step::{Action, PropChange, TimelineStep},
};

/// Catalog name.
pub const NAME: &str = "training_pipeline";

#[derive(Clone, Debug)]
/// Colours used by this scene.
pub struct Palette {
    /// Main title.
    pub title: Color,
    /// Subtitle and accents.
    pub accent: Color,
    /// Body text.
    pub text: Color,
    /// Colours of the first and last network layer; layers between are interpolated.
    pub layers: (Color, Color),
    /// Source tags on the data cards.
    pub tags: [Color; 4],
    /// Positive feedback.
    pub positive: Color,
    /// Negative feedback.
    pub negative: Color,
    /// Layers lit during training.
    pub highlight: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            title: Color::WHITE,
            accent: Color::BLUE,
            text: Color::WHITE,
            layers: (Color::BLUE_A, Color::BLUE_E),
            tags: [Color::BLUE_B, Color::GREEN_B, Color::RED_B, Color::YELLOW_B],
            positive: Color::GREEN,
            negative: Color::RED,
            highlight: Color::YELLOW,
        }
    }
}

/// One card row: tag colour index, tag, excerpt.
type CardRow = (usize, &'static str, &'static str);

struct Phase {
    key: &'static str,
    title: &'static str,
    facts: [&'static str; 3],
    card: &'static [CardRow],
}

const PRETRAINING: Phase = Phase {
    key: "pre",
    title: "Pre-training Phase",
    facts: [
        "Dataset Size: ~1.5 trillion tokens",
        "Training Time: 1-6 months",
        "Compute: Thousands of GPUs",
    ],
    card: &[
        (0, "Wikipedia:", " Ancient civilizations developed..."),
        (1, "Code:", " class NetworkModel(nn.Module):"),
        (2, "Book:", " The character's journey began..."),
        (3, "Research:", " The study demonstrates that..."),
    ],
};

const FINETUNING: Phase = Phase {
    key: "fine",
    title: "Fine-tuning Phase",
    facts: [
        "Dataset Size: ~100k examples",
        "Training Time: 1-7 days",
        "Compute: 8-32 GPUs",
    ],
    card: &[
        (0, "Clinical:", " Patient presents with..."),
        (1, "Diagnosis:", " Tests indicate elevated..."),
        (2, "Treatment:", " Recommended protocol..."),
    ],
};

const RLHF: Phase = Phase {
    key: "rlhf",
    title: "RLHF Phase",
    facts: [
        "Dataset Size: ~50k human ratings",
        "Training Time: 2-4 weeks",
        "Compute: 16-64 GPUs",
    ],
    card: &[
        (0, "Human:", " Explain quantum computing"),
        (1, "Assistant:", " Quantum computing uses..."),
        (3, "Rating:", " Clear and accurate (9/10)"),
    ],
};

const LAYERS: usize = 4;
const NODES_PER_LAYER: usize = 5;
const NETWORK_SCALE: f64 = 0.8;
const NODE_RADIUS: f64 = 0.08;
const CARD_FONT: f64 = 16.0;

/// Build the scene.
pub fn build(p: &Palette) -> SceneResult<Scene> {
    let mut s = SceneBuilder::new(NAME);

    // Header, later shrunk against the top edge.
    let header = text_stack(
        &mut s,
        "header",
        &[
            TextLine::new("Large Language Model Training Pipeline", p.title, 48.0),
            TextLine::new("From Raw Data to Intelligent Responses", p.accent, 28.0),
        ],
        0.3,
        Align::Center,
        Point::ORIGIN,
    )?;
    let small = Vec2::new(header.width() * 0.6, header.height() * 0.6);
    let header_at = place::to_edge(header.center(), small, Direction::Up, EDGE_BUFF, s.frame());
    let header_final = place::rect_at(header_at, small);

    s.play(TimelineStep::new([Action::write("header.0")]).run_time(2.5));
    s.play(TimelineStep::new([Action::fade_in_from("header.1", UP)]).run_time(2.0));
    s.play(
        TimelineStep::new([Action::animate(
            "header",
            PropChange::default().move_to(header_at).scale(0.6),
        )])
        .run_time(2.0)
        .wait(1.5),
    );

    network(&mut s, p, Point::new(-2.0, -1.0))?;

    // Pre-training: the network appears while the facts slide aside.
    phase_info(&mut s, &PRETRAINING, p, header_final)?;
    introduce(&mut s, &PRETRAINING, 1.0);
    s.play(
        TimelineStep::new([
            Action::shift(phase_id(&PRETRAINING), RIGHT * 5.0),
            Action::appear("network"),
        ])
        .run_time(3.0)
        .wait(3.0),
    );
    s.play(
        TimelineStep::new([Action::shift("network", UP * 2.0)])
            .run_time(1.5)
            .wait(1.0),
    );
    show_cards(&mut s, &PRETRAINING, p, 2, 1.0)?;

    // Pulses over the middle node of every layer but the last, with the network raised.
    let mut grow = Vec::new();
    let mut fade = Vec::new();
    for layer in 0..LAYERS - 1 {
        let at = s.center(&node_id(layer, NODES_PER_LAYER / 2))? + UP * 2.0;
        let id = format!("pulse.{layer}");
        s.add(VisualItem::dot(&id, 0.2).color(p.accent).opacity(0.8).at(at))?;
        grow.push(Action::grow(id.as_str()));
        fade.push(Action::animate(id, PropChange::default().scale(2.0).opacity(0.0)));
    }
    s.play(TimelineStep::new(grow).run_time(2.0));
    s.play(TimelineStep::new(fade).run_time(2.5).wait(1.5));

    // Fine-tuning.
    phase_info(&mut s, &FINETUNING, p, header_final)?;
    next_phase(&mut s, &PRETRAINING, &FINETUNING);
    show_cards(&mut s, &FINETUNING, p, 2, 3.0)?;

    // RLHF with the reward-model feedback loop.
    phase_info(&mut s, &RLHF, p, header_final)?;
    next_phase(&mut s, &FINETUNING, &RLHF);

    let card = card_id(&RLHF, 0);
    data_card(&mut s, &card, RLHF.card, p)?;
    move_to(&mut s, &card, Point::ORIGIN + LEFT * 2.0 + DOWN * 2.0)?;
    s.play(TimelineStep::new([Action::appear(card.as_str())]).run_time(2.0).wait(4.0));

    feedback(&mut s, p)?;
    next_to(&mut s, "feedback", &card, Direction::Down, NEXT_TO_BUFF)?;
    reward_model(&mut s, p)?;
    next_to(&mut s, "reward", &card, Direction::Right, 1.0)?;
    s.play(TimelineStep::new([Action::appear("feedback")]).run_time(2.0).wait(3.0));
    s.play(TimelineStep::new([Action::appear("reward")]).run_time(2.0).wait(3.0));

    s.connect(
        Connection::arrow("loop.reward", "feedback", "reward")
            .color(p.text)
            .curved(-0.5),
    )?;
    s.connect(
        Connection::arrow("loop.network", "reward", "network.nodes")
            .color(p.text)
            .curved(-0.5),
    )?;
    s.play(
        TimelineStep::new([Action::appear("loop.reward"), Action::appear("loop.network")])
            .run_time(2.5)
            .wait(4.0),
    );

    for _ in 0..2 {
        s.play(
            TimelineStep::new([Action::recolor("network.hot", p.highlight)])
                .ease(Ease::ThereAndBack)
                .run_time(3.0)
                .wait(1.0),
        );
    }
    s.wait(4.0);

    s.play(
        TimelineStep::new([Action::clear(DOWN * 0.5)])
            .run_time(2.5)
            .wait(2.0),
    );
    s.build()
}

fn node_id(layer: usize, node: usize) -> String {
    format!("net.{layer}.{node}")
}

fn phase_id(phase: &Phase) -> String {
    format!("phase.{}", phase.key)
}

fn card_id(phase: &Phase, n: usize) -> String {
    format!("card.{}.{n}", phase.key)
}

/// Dots in layers joined by faint arcs, centred on `center`.
///
/// Groups: `network` (everything), `network.nodes` (dots), `network.hot` (every layer but the
/// last, plus all arcs).
fn network(s: &mut SceneBuilder, p: &Palette, center: Point) -> SceneResult<()> {
    let layer_step = (2.0 * NODE_RADIUS + 1.0) * NETWORK_SCALE;
    let node_step = (2.0 * NODE_RADIUS + 0.3) * NETWORK_SCALE;
    let mut nodes = Vec::new();
    let mut hot = Vec::new();
    for layer in 0..LAYERS {
        let t = layer as f64 / (LAYERS - 1) as f64;
        let color = p.layers.0.lerp(p.layers.1, t);
        let x = center.x + (layer as f64 - (LAYERS - 1) as f64 / 2.0) * layer_step;
        for node in 0..NODES_PER_LAYER {
            let y = center.y + ((NODES_PER_LAYER - 1) as f64 / 2.0 - node as f64) * node_step;
            let id = node_id(layer, node);
            s.add(
                VisualItem::dot(&id, NODE_RADIUS * NETWORK_SCALE)
                    .color(color)
                    .at(Point::new(x, y)),
            )?;
            if layer + 1 < LAYERS {
                hot.push(id.clone());
            }
            nodes.push(id);
        }
    }

    let mut arcs = Vec::new();
    for layer in 0..LAYERS - 1 {
        for a in 0..NODES_PER_LAYER {
            for b in 0..NODES_PER_LAYER {
                let id = format!("net.arc.{layer}.{a}.{b}");
                s.connect(
                    Connection::line(&id, node_id(layer, a), node_id(layer + 1, b))
                        .color(p.text)
                        .curved(0.1)
                        .attach(Attach::Center)
                        .buff(0.0)
                        .opacity(0.2),
                )?;
                arcs.push(id);
            }
        }
    }
    hot.extend(arcs.iter().cloned());
    s.group("network.nodes", nodes.iter().cloned())?;
    s.group("network.hot", hot)?;
    s.group("network", nodes.into_iter().chain(arcs))
}

/// Phase title over its facts, grouped as `phase.<key>` and placed under the shrunken header.
fn phase_info(s: &mut SceneBuilder, phase: &Phase, p: &Palette, header: Rect) -> SceneResult<()> {
    let id = phase_id(phase);
    let title = format!("{id}.title");
    let facts = format!("{id}.facts");
    s.add(VisualItem::text(&title, phase.title, 36.0).color(p.accent))?;
    let lines = phase.facts.map(|f| TextLine::new(f, p.text, 20.0));
    let block = text_stack(s, &facts, &lines, 0.3, Align::Start, Point::ORIGIN)?;

    let sizes = [s.size(&title)?, Vec2::new(block.width(), block.height())];
    let spots = place::arrange(&sizes, Direction::Down, 0.5, Align::Center, Point::ORIGIN);
    move_to(s, &title, spots[0])?;
    move_to(s, &facts, spots[1])?;
    s.group(&id, [title, facts])?;

    place_beside_rect(s, &id, header, Direction::Down, 0.8)
}

/// Title, then facts, each written with a pause to read.
fn introduce(s: &mut SceneBuilder, phase: &Phase, title_wait: f64) {
    let id = phase_id(phase);
    s.play(
        TimelineStep::new([Action::write(format!("{id}.title"))])
            .run_time(2.0)
            .wait(title_wait),
    );
    s.play(
        TimelineStep::new([Action::write(format!("{id}.facts"))])
            .run_time(3.0)
            .wait(4.0),
    );
}

/// Swap phase facts while the network dips and comes back up.
fn next_phase(s: &mut SceneBuilder, done: &Phase, next: &Phase) {
    s.play(
        TimelineStep::new([
            Action::fade_out(phase_id(done)),
            Action::shift("network", DOWN * 2.0),
        ])
        .run_time(2.0)
        .wait(1.0),
    );
    introduce(s, next, 3.0);
    s.play(
        TimelineStep::new([
            Action::shift(phase_id(next), RIGHT * 5.0),
            Action::shift("network", UP * 2.0),
        ])
        .run_time(2.0)
        .wait(1.5),
    );
}

/// Slide `count` copies of the phase's data card in from the left, one after another.
fn show_cards(
    s: &mut SceneBuilder,
    phase: &Phase,
    p: &Palette,
    count: usize,
    read_wait: f64,
) -> SceneResult<()> {
    for n in 0..count {
        let id = card_id(phase, n);
        data_card(s, &id, phase.card, p)?;
        s.translate(&id, LEFT * 6.0 + DOWN)?;
        s.play(
            TimelineStep::new([Action::appear(id.as_str())])
                .run_time(2.0)
                .wait(read_wait),
        );
        s.play(
            TimelineStep::new([Action::shift(id.as_str(), RIGHT * 2.0)])
                .run_time(3.0)
                .wait(4.0),
        );
        s.play(
            TimelineStep::new([Action::fade_out(id)])
                .run_time(1.5)
                .wait(1.0),
        );
    }
    Ok(())
}

/// Tagged excerpts in a rounded frame, grouped as `id` and centred on the origin.
fn data_card(s: &mut SceneBuilder, id: &str, rows: &[CardRow], p: &Palette) -> SceneResult<()> {
    let row_sizes: Vec<Vec2> = rows
        .iter()
        .map(|(_, tag, text)| {
            let (a, b) = (text_size(tag, CARD_FONT), text_size(text, CARD_FONT));
            Vec2::new(a.x + 0.1 + b.x, a.y.max(b.y))
        })
        .collect();
    let centers = place::arrange(&row_sizes, Direction::Down, 0.3, Align::Center, Point::ORIGIN);

    let mut members = Vec::new();
    for (i, ((tone, tag, text), center)) in rows.iter().zip(centers).enumerate() {
        let sizes = [text_size(tag, CARD_FONT), text_size(text, CARD_FONT)];
        let at = place::arrange(&sizes, Direction::Right, 0.1, Align::Center, center);
        let tag_id = format!("{id}.{i}.tag");
        let text_id = format!("{id}.{i}.text");
        let color = p.tags.get(*tone).copied().unwrap_or(p.text);
        s.add(VisualItem::text(&tag_id, *tag, CARD_FONT).color(color).at(at[0]))?;
        s.add(VisualItem::text(&text_id, *text, CARD_FONT).color(p.text).at(at[1]))?;
        members.extend([tag_id, text_id]);
    }
    let content = format!("{id}.rows");
    s.group(&content, members.iter().cloned())?;
    let r = place::surround(s.bounds(&content)?, 0.2);
    let frame = format!("{id}.frame");
    s.add(
        VisualItem::rounded_rect(&frame, r.width(), r.height(), 0.2)
            .color(p.text)
            .at(r.center()),
    )?;
    members.push(frame);
    s.group(id, members)
}

/// Plus and minus markers side by side, grouped as `feedback`.
fn feedback(s: &mut SceneBuilder, p: &Palette) -> SceneResult<()> {
    let spots = place::arrange(
        &[Vec2::new(0.4, 0.4); 2],
        Direction::Right,
        1.0,
        Align::Center,
        Point::ORIGIN,
    );
    let mut members = Vec::new();
    for ((name, sign, color), at) in [("positive", "+", p.positive), ("negative", "-", p.negative)]
        .into_iter()
        .zip(spots)
    {
        let ring = format!("feedback.{name}");
        let label = format!("feedback.{name}.sign");
        s.add(VisualItem::circle(&ring, 0.2).color(color).fill(color, 0.2).at(at))?;
        s.add(VisualItem::text(&label, sign, 24.0).color(color).at(at))?;
        members.extend([ring, label]);
    }
    s.group("feedback", members)
}

fn reward_model(s: &mut SceneBuilder, p: &Palette) -> SceneResult<()> {
    s.add(VisualItem::rounded_rect("reward.box", 2.0, 1.5, 0.2).color(p.text))?;
    s.add(VisualItem::text("reward.text", "Reward\nModel", 20.0).color(p.text))?;
    s.group("reward", ["reward.box", "reward.text"])
}

fn place_beside_rect(
    s: &mut SceneBuilder,
    id: &str,
    anchor: Rect,
    dir: Direction,
    buff: f64,
) -> SceneResult<()> {
    let at = place::next_to(anchor, s.size(id)?, dir, buff);
    move_to(s, id, at)
}

#[cfg(test)]
#[path = "../../tests/unit/scenes/training_pipeline.rs"]
mod tests;
