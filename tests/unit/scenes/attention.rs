use super::*;
use crate::render::{pipeline::snapshot_at, record::RecordingRenderer};

#[test]
fn builds_and_plays_to_an_empty_canvas() {
    let scene = build(&Palette::default()).unwrap();
    assert!((scene.duration() - 53.0).abs() < 1e-9);

    let mut rec = RecordingRenderer::new();
    let report = scene.play(&mut rec).unwrap();
    assert_eq!(report.steps.len(), 12);
    assert!(rec.last_scene().unwrap().on_canvas().is_empty());
}

#[test]
fn bars_follow_the_softmax_of_the_scores() {
    let scene = build(&Palette::default()).unwrap();
    let g = &scene.graph;
    let widths: Vec<f64> = (0..SCORES.len())
        .map(|i| g.item(&format!("softmax.bar{i}")).unwrap().size().x)
        .collect();
    let total: f64 = widths.iter().sum();
    assert!((total - BAR_MAX_WIDTH).abs() < 1e-9);
    assert!(widths.windows(2).all(|w| w[0] > w[1]));

    let crate::scene::model::Shape::Text { content, .. } = &g.item("softmax.value0").unwrap().shape
    else {
        panic!("value label should be text");
    };
    assert_eq!(content, "0.45");
}

#[test]
fn explanations_share_the_left_edge() {
    let scene = build(&Palette::default()).unwrap();
    let left = scene.graph.frame.bounds().x0 + crate::scenes::common::EDGE_BUFF;
    for id in [
        "explain.token",
        "explain.linear",
        "explain.scores",
        "explain.softmax",
        "explain.output",
        "explain.summary",
    ] {
        let r = scene.graph.bounds_of(id).unwrap();
        assert!((r.x0 - left).abs() < 1e-9, "{id}");
    }
}

#[test]
fn only_the_current_stage_is_explained() {
    let scene = build(&Palette::default()).unwrap();
    let mid_output = snapshot_at(&scene, 39.0).unwrap();
    assert!(mid_output.is_on_canvas("explain.output.0"));
    assert!(!mid_output.is_on_canvas("explain.softmax.0"));
    assert!(!mid_output.is_on_canvas("score.query"));
    assert!(mid_output.is_on_canvas("softmax.bar0"));
    assert!(mid_output.is_on_canvas("weighted.value"));
    assert!(mid_output.is_on_canvas("query"));
}

#[test]
fn score_arrows_arc() {
    let scene = build(&Palette::default()).unwrap();
    let c = scene.graph.connection("score.key").unwrap();
    assert!((c.style.angle - TAU / 4.0).abs() < 1e-12);
    assert_eq!(c.style.color, Palette::default().key);
}
