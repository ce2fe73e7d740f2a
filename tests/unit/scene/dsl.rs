use super::*;
use crate::{
    render::record::{RecordingRenderer, RenderEvent},
    timeline::step::Action,
};

#[test]
fn groups_flatten_nested_group_ids() {
    let mut s = SceneBuilder::new("t");
    s.add(VisualItem::circle("a", 0.5)).unwrap();
    s.add(VisualItem::circle("b", 0.5)).unwrap();
    s.add(VisualItem::circle("c", 0.5)).unwrap();
    s.group("ab", ["a", "b"]).unwrap();
    s.group("abc", ["ab", "c"]).unwrap();
    assert_eq!(
        s.graph().group("abc").unwrap().members,
        vec!["a".to_owned(), "b".to_owned(), "c".to_owned()]
    );
}

#[test]
fn beside_and_translate_use_authored_geometry() {
    let mut s = SceneBuilder::new("t");
    s.add(VisualItem::rect("a", 2.0, 1.0)).unwrap();
    let p = s
        .beside("a", Vec2::new(1.0, 1.0), Direction::Right, 0.5)
        .unwrap();
    assert_eq!(p, Point::new(2.0, 0.0));

    s.add(VisualItem::rect("b", 1.0, 1.0).at(p)).unwrap();
    s.group("ab", ["a", "b"]).unwrap();
    s.translate("ab", Vec2::new(0.0, 1.0)).unwrap();
    assert_eq!(s.center("b").unwrap(), Point::new(2.0, 1.0));
    assert_eq!(s.size("ab").unwrap(), Vec2::new(3.5, 1.0));

    s.reposition("a", Point::new(-1.0, 0.0)).unwrap();
    assert_eq!(s.center("a").unwrap(), Point::new(-1.0, 0.0));
    assert!(s.reposition("ab", Point::ORIGIN).is_err());
}

#[test]
fn build_rejects_unknown_step_targets() {
    let mut s = SceneBuilder::new("t");
    s.add(VisualItem::circle("a", 0.5)).unwrap();
    s.play(TimelineStep::new([Action::appear("a"), Action::fade_in("ghost")]));
    let err = s.build().unwrap_err();
    assert!(err.to_string().contains("ghost"));
}

#[test]
fn build_rejects_bad_step_timing() {
    let mut s = SceneBuilder::new("t");
    s.add(VisualItem::circle("a", 0.5)).unwrap();
    s.play(TimelineStep::new([Action::appear("a")]).run_time(-1.0));
    assert!(s.build().is_err());
}

#[test]
fn leading_wait_becomes_a_pause() {
    let mut s = SceneBuilder::new("t");
    s.add(VisualItem::circle("a", 0.5)).unwrap();
    s.wait(1.0);
    s.play(TimelineStep::new([Action::appear("a")]).run_time(2.0));
    s.wait(0.5);
    let scene = s.build().unwrap();
    assert_eq!(scene.timeline.steps.len(), 2);
    assert!((scene.duration() - 3.5).abs() < 1e-12);
}

#[test]
fn play_leaves_the_authored_graph_untouched() {
    let mut s = SceneBuilder::new("t");
    s.add(VisualItem::circle("a", 0.5)).unwrap();
    s.play(TimelineStep::new([Action::appear("a")]));
    let scene = s.build().unwrap();

    let mut rec = RecordingRenderer::new();
    scene.play(&mut rec).unwrap();
    assert!(!scene.graph.item("a").unwrap().on_canvas);
    assert!(rec.last_scene().unwrap().item("a").unwrap().on_canvas);
    assert!(matches!(
        &rec.events()[0],
        RenderEvent::Animate { targets, .. } if targets == &vec!["a".to_owned()]
    ));

    // A second run sees the same starting state.
    let mut again = RecordingRenderer::new();
    scene.play(&mut again).unwrap();
    assert_eq!(rec.events(), again.events());
}
