use super::*;
use crate::render::{pipeline::snapshot_at, record::RecordingRenderer};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn subscripts_every_digit() {
    assert_eq!(subscript(0), "₀");
    assert_eq!(subscript(12), "₁₂");
}

#[test]
fn builds_and_ends_on_the_comparison() {
    let scene = build(&Palette::default()).unwrap();
    assert!(close(scene.duration(), 25.0));

    let mut rec = RecordingRenderer::new();
    let report = scene.play(&mut rec).unwrap();
    assert_eq!(report.steps.len(), 26);

    let end = rec.last_scene().unwrap();
    assert!(end.is_on_canvas("table.cell.0"));
    assert!(end.is_on_canvas("note"));
    assert!(end.is_on_canvas("title"));
    assert!(!end.is_on_canvas("h.3.circle"));
    assert!(!end.is_on_canvas("token.4.text"));
    assert!(!end.is_on_canvas("processing.2"));
}

#[test]
fn hidden_states_sit_above_their_tokens() {
    let scene = build(&Palette::default()).unwrap();
    let g = &scene.graph;
    for i in 0..TOKENS.len() {
        let h = g.bounds_of(&format!("h.{}", i + 1)).unwrap();
        let t = g.bounds_of(&format!("token.{i}")).unwrap();
        assert!(close(h.y0, t.y1 + 0.75));
        assert!(close(h.center().x, t.center().x));
        let m = g.bounds_of(&format!("marker.{i}")).unwrap();
        assert!(close(m.y1, t.y0 - NEXT_TO_BUFF));
    }
}

#[test]
fn table_is_a_uniform_grid() {
    let scene = build(&Palette::default()).unwrap();
    let g = &scene.graph;
    let first = g.item("table.cell.0").unwrap();
    let right = g.item("table.cell.1").unwrap();
    let below = g.item("table.cell.2").unwrap();
    let cw = first.size().x;
    let ch = first.size().y;
    assert!(close(right.position.x - first.position.x, cw));
    assert!(close(first.position.y - below.position.y, ch));

    let table = g.bounds_of("table").unwrap();
    assert!(close(table.width(), 2.0 * cw));
    assert!(close(table.height(), 4.0 * ch));
    assert!(close(table.center().x, 0.0));
    let title = g.bounds_of("title").unwrap();
    assert!(close(table.y1, title.y0 - 1.75));
}

#[test]
fn note_stays_on_screen_below_the_table() {
    let scene = build(&Palette::default()).unwrap();
    let g = &scene.graph;
    let note = g.bounds_of("note").unwrap();
    let table = g.bounds_of("table").unwrap();
    assert!(close(note.y1, table.y0 - 0.5));
    let frame = g.frame.bounds();
    assert!(note.y0 > frame.y0 && note.x0 > frame.x0 && note.x1 < frame.x1);
}

#[test]
fn tokens_turn_green_as_they_are_consumed() {
    let scene = build(&Palette::default()).unwrap();
    // Title, rnn title, tokens and h0 take 4s; the first token step runs 4.0..4.8.
    let g = snapshot_at(&scene, 5.0).unwrap();
    assert_eq!(g.item("token.0.text").unwrap().color, Palette::default().rnn);
    assert_eq!(g.item("token.1.text").unwrap().color, Palette::default().token);
    assert!(g.is_on_canvas("processing.0"));
}
