use super::*;
use crate::render::{pipeline::snapshot_at, record::RecordingRenderer};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn builds_and_plays_to_an_empty_canvas() {
    let scene = build(&Palette::default()).unwrap();
    assert!(close(scene.duration(), 43.0));
    let mut rec = RecordingRenderer::new();
    let report = scene.play(&mut rec).unwrap();
    assert_eq!(report.steps.len(), 14);
    assert!(rec.last_scene().unwrap().on_canvas().is_empty());
}

#[test]
fn heads_stack_top_to_bottom() {
    let scene = build(&Palette::default()).unwrap();
    let g = &scene.graph;
    let ys: Vec<f64> = (0..4)
        .map(|i| g.center_of(&format!("head.{i}.q")).unwrap().y)
        .collect();
    for (y, want) in ys.iter().zip([1.5, 0.5, -0.5, -1.5]) {
        assert!(close(*y, want));
    }
    assert_eq!(g.group("head.2").unwrap().members.len(), 12);
    assert_eq!(g.item("head.3.att").unwrap().color, Palette::default().heads[3]);
}

#[test]
fn attention_boxes_sit_right_of_their_projections() {
    let scene = build(&Palette::default()).unwrap();
    let g = &scene.graph;
    let qkv = g.bounds_of("head.0.qkv").unwrap();
    let att = g.bounds_of("head.0.att").unwrap();
    assert!(close(att.x0, qkv.x1 + 1.0));
    assert!(close(att.center().y, qkv.center().y));
}

#[test]
fn concat_and_projection_chain_rightwards() {
    let scene = build(&Palette::default()).unwrap();
    let g = &scene.graph;
    let att = g.bounds_of("head.1.att").unwrap();
    let concat = g.bounds_of("concat").unwrap();
    let projection = g.bounds_of("projection.group").unwrap();
    assert!(close(concat.x0, att.x1 + 1.5));
    assert!(close(projection.x0, concat.x1 + 1.5));
}

#[test]
fn title_hangs_from_the_top_edge() {
    let scene = build(&Palette::default()).unwrap();
    let top = scene.graph.bounds_of("title").unwrap().y1;
    assert!(close(top, scene.graph.frame.bounds().y1 - TITLE_EDGE_BUFF));
}

#[test]
fn projection_glow_pulses_back() {
    let scene = build(&Palette::default()).unwrap();
    let mid = snapshot_at(&scene, 38.5).unwrap();
    assert!(mid.item("projection.glow").unwrap().scale > 1.1);
    let after = snapshot_at(&scene, 40.0).unwrap();
    let glow = after.item("projection.glow").unwrap();
    assert!(close(glow.scale, 1.0));
    assert!(close(glow.opacity, 1.0));
    assert!(!after.is_on_canvas("title.1"));
    assert!(after.is_on_canvas("title.0"));
}
