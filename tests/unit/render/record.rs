use super::*;
use crate::{
    foundation::{color::Color, core::FrameSpec},
    scene::model::VisualItem,
    timeline::{
        sequencer::Sequencer,
        step::{Action, Timeline, TimelineStep},
    },
};

#[test]
fn clock_advances_by_run_time_and_holds() {
    let mut g = SceneGraph::new(FrameSpec::default(), Color::BLACK);
    g.insert_item(VisualItem::dot("d", 0.1)).unwrap();
    let mut t = Timeline::default();
    t.wait(0.5);
    t.push(
        TimelineStep::new([Action::grow("d")])
            .run_time(2.0)
            .ease(Ease::Linear)
            .wait(1.0),
    );

    let mut rec = RecordingRenderer::new();
    Sequencer::new(&t).run(&mut g, &mut rec).unwrap();
    assert_eq!(rec.clock(), 3.5);
    assert!(rec.last_scene().unwrap().is_on_canvas("d"));

    let events = rec.into_events();
    assert!(matches!(events[0], RenderEvent::Hold { at, secs, on_canvas: 0 } if at == 0.0 && secs == 0.5));
    assert!(matches!(
        &events[1],
        RenderEvent::Animate { at, step: 1, ease: Ease::Linear, .. } if *at == 0.5
    ));
    assert!(matches!(events[2], RenderEvent::Hold { on_canvas: 1, .. }));
    assert_eq!(events.last(), Some(&RenderEvent::Finish { at: 3.5 }));
}

#[test]
fn last_scene_drops_entities_that_faded_out() {
    let mut g = SceneGraph::new(FrameSpec::default(), Color::BLACK);
    g.insert_item(VisualItem::dot("a", 0.1)).unwrap();
    g.insert_item(VisualItem::dot("b", 0.1)).unwrap();
    let mut t = Timeline::default();
    t.push(TimelineStep::new([Action::appear("a"), Action::appear("b")]));
    t.push(TimelineStep::new([Action::fade_out("a")]));

    let mut rec = RecordingRenderer::new();
    Sequencer::new(&t).run(&mut g, &mut rec).unwrap();
    let last = rec.last_scene().unwrap();
    assert!(!last.is_on_canvas("a"));
    assert!(last.is_on_canvas("b"));
    assert_eq!(last.item("a").unwrap().opacity, 1.0);
}

#[test]
fn events_serialize_with_a_tag() {
    let v = serde_json::to_value(RenderEvent::Remove {
        at: 1.0,
        id: "x".into(),
    })
    .unwrap();
    assert_eq!(v["event"], "remove");
    assert_eq!(v["id"], "x");
}
