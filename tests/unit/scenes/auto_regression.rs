use super::*;
use crate::render::record::RecordingRenderer;

fn finish(scene: &Scene) -> crate::scene::model::SceneGraph {
    let mut rec = RecordingRenderer::new();
    scene.play(&mut rec).unwrap();
    rec.last_scene().unwrap().clone()
}

#[test]
fn default_sentence_builds_a_chain() {
    let scene = build(&Palette::default()).unwrap();
    let g = &scene.graph;
    assert_eq!(g.group("nodes").unwrap().members.len(), 25);
    assert_eq!(g.group("arrows").unwrap().members.len(), 24);
    assert_eq!(
        g.group("hit_nodes").unwrap().members,
        vec!["node.5".to_owned(), "node.8".to_owned(), "node.22".to_owned()]
    );
}

#[test]
fn repeated_word_collapses_into_one_node() {
    let scene = build(&Palette::default()).unwrap();
    let end = finish(&scene);

    for i in [5, 8, 22] {
        assert!(!end.is_on_canvas(&format!("node.{i}")));
        assert!(!end.is_on_canvas(&format!("word.{i}")));
    }
    assert!(end.is_on_canvas("merged.node"));
    assert!(end.is_on_canvas("merged.word"));
    for id in ["arrow.4", "arrow.5", "arrow.7", "arrow.8", "arrow.21", "arrow.22"] {
        assert!(!end.is_on_canvas(id), "{id}");
    }
    assert!(end.is_on_canvas("arrow.6"));
    assert!(end.is_on_canvas("reroute.in.5"));
    assert!(end.is_on_canvas("reroute.out.22"));

    let spots = layout(25, &LayoutPattern::snake(4), &LayoutFrame::default()).unwrap();
    let expected = centroid(&[spots[5], spots[8], spots[22]]).unwrap();
    let merged = end.item("merged.node").unwrap().position;
    assert!((merged - expected).hypot() < 1e-9);
}

#[test]
fn merge_word_matches_case_insensitively() {
    let script = Script {
        sentence: "the Cat saw the cat".into(),
        merge_word: "cat".into(),
        rows: 2,
    };
    let scene = build_with(&Palette::default(), &script).unwrap();
    assert_eq!(scene.graph.group("hit_words").unwrap().members.len(), 2);
    // The last word has no outgoing arrow to re-route.
    assert!(scene.graph.connection("reroute.out.4").is_none());
    assert!(scene.graph.connection("reroute.in.4").is_some());
    finish(&scene);
}

#[test]
fn sentence_without_the_word_just_holds() {
    let script = Script {
        sentence: "nothing to merge here".into(),
        ..Script::default()
    };
    let scene = build_with(&Palette::default(), &script).unwrap();
    assert!(scene.graph.item("merged.node").is_none());
    assert_eq!(scene.timeline.steps.len(), 2);
    assert_eq!(scene.timeline.steps[1].wait_after, 3.0);
}

#[test]
fn single_word_has_no_arrows() {
    let script = Script {
        sentence: "was".into(),
        ..Script::default()
    };
    let scene = build_with(&Palette::default(), &script).unwrap();
    assert!(scene.graph.group("arrows").is_none());
    let end = finish(&scene);
    assert!(end.is_on_canvas("merged.node"));
}

#[test]
fn empty_sentence_is_a_layout_error() {
    let script = Script {
        sentence: "   ".into(),
        ..Script::default()
    };
    assert!(build_with(&Palette::default(), &script).is_err());
}
