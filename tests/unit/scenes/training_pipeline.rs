use super::*;
use crate::render::{pipeline::snapshot_at, record::RecordingRenderer};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn builds_and_plays_to_an_empty_canvas() {
    let scene = build(&Palette::default()).unwrap();
    assert!(close(scene.duration(), 162.5));
    let mut rec = RecordingRenderer::new();
    let report = scene.play(&mut rec).unwrap();
    assert_eq!(report.steps.len(), 36);
    assert!(rec.last_scene().unwrap().on_canvas().is_empty());
}

#[test]
fn network_has_four_layers_of_five() {
    let scene = build(&Palette::default()).unwrap();
    let g = &scene.graph;
    assert_eq!(g.group("network.nodes").unwrap().members.len(), 20);
    assert_eq!(g.group("network").unwrap().members.len(), 20 + 75);
    assert_eq!(g.group("network.hot").unwrap().members.len(), 15 + 75);

    let p = Palette::default();
    assert_eq!(g.item("net.0.0").unwrap().color, p.layers.0);
    assert_eq!(g.item("net.3.4").unwrap().color, p.layers.1);
    let c = g.center_of("network.nodes").unwrap();
    assert!(close(c.x, -2.0) && close(c.y, -1.0));
}

#[test]
fn header_shrinks_against_the_top_edge() {
    let scene = build(&Palette::default()).unwrap();
    let authored = scene.graph.bounds_of("header").unwrap();
    let top = scene.graph.frame.bounds().y1;

    let held = snapshot_at(&scene, 7.0).unwrap();
    let r = held.bounds_of("header").unwrap();
    assert!(close(r.height(), authored.height() * 0.6));
    assert!(close(r.y1, top - EDGE_BUFF));

    // Phase facts hang under where the header ends up.
    let phase = scene.graph.bounds_of("phase.pre").unwrap();
    assert!(close(phase.y1, r.y0 - 0.8));
}

#[test]
fn every_card_repetition_is_its_own_entity() {
    let scene = build(&Palette::default()).unwrap();
    let g = &scene.graph;
    for id in ["card.pre.0", "card.pre.1", "card.fine.0", "card.fine.1", "card.rlhf.0"] {
        assert!(g.group(id).is_some(), "{id}");
    }
    assert!(g.group("card.rlhf.1").is_none());
    let p = Palette::default();
    assert_eq!(g.item("card.rlhf.0.2.tag").unwrap().color, p.tags[3]);
    let frame = g.bounds_of("card.pre.0.frame").unwrap();
    let rows = g.bounds_of("card.pre.0.rows").unwrap();
    assert!(close(frame.width(), rows.width() + 0.4));
}

#[test]
fn feedback_loop_sits_around_the_rlhf_card() {
    let scene = build(&Palette::default()).unwrap();
    let g = &scene.graph;
    let card = g.bounds_of("card.rlhf.0").unwrap();
    let feedback = g.bounds_of("feedback").unwrap();
    let reward = g.bounds_of("reward").unwrap();
    assert!(close(feedback.y1, card.y0 - NEXT_TO_BUFF));
    assert!(close(reward.x0, card.x1 + 1.0));
    assert!(close(card.center().x, -2.0) && close(card.center().y, -2.0));
    assert_eq!(g.connection("loop.network").unwrap().to, "network.nodes");
}

#[test]
fn network_glows_and_settles_back() {
    let scene = build(&Palette::default()).unwrap();
    let p = Palette::default();

    let peak = snapshot_at(&scene, 147.5).unwrap();
    assert_eq!(
        peak.item("net.1.2").unwrap().color.to_rgba8(),
        p.highlight.to_rgba8()
    );
    assert_eq!(peak.item("net.3.2").unwrap().color, p.layers.1);

    let after = snapshot_at(&scene, 155.0).unwrap();
    assert_eq!(after.item("net.1.2").unwrap().color, p.layers.0.lerp(p.layers.1, 1.0 / 3.0));
    assert_eq!(after.connection("net.arc.0.0.0").unwrap().style.color, p.text);
}

#[test]
fn pulses_start_over_the_raised_network() {
    let scene = build(&Palette::default()).unwrap();
    let g = &scene.graph;
    for layer in 0..LAYERS - 1 {
        let pulse = g.item(&format!("pulse.{layer}")).unwrap().position;
        let node = g.item(&node_id(layer, 2)).unwrap().position;
        assert!(close(pulse.x, node.x));
        assert!(close(pulse.y, node.y + 2.0));
    }
}
