use super::*;
use crate::foundation::core::FrameSpec;

fn props(x: f64, opacity: f64) -> Props {
    Props {
        position: Point::new(x, 0.0),
        color: Color::BLACK,
        opacity,
        scale: 1.0,
        reveal: 1.0,
    }
}

fn scene_with(id: &str) -> SceneGraph {
    let mut g = SceneGraph::new(FrameSpec::default(), Color::BLACK);
    g.insert_item(VisualItem::circle(id, 0.5)).unwrap();
    g
}

fn plan(tweens: Vec<Tween>) -> StepPlan {
    StepPlan {
        index: 0,
        run_time: 1.0,
        ease: Ease::Linear,
        wait_after: 0.0,
        tweens,
    }
}

#[test]
fn props_lerp_is_componentwise() {
    let mid = props(0.0, 0.0).lerp(props(2.0, 1.0), 0.5);
    assert_eq!(mid.position, Point::new(1.0, 0.0));
    assert_eq!(mid.opacity, 0.5);
}

#[test]
fn sample_interpolates_without_touching_the_input() {
    let g = scene_with("a");
    let p = plan(vec![Tween {
        entity: "a".into(),
        kind: TweenKind::Item,
        from: props(0.0, 0.0),
        to: props(4.0, 1.0),
        exit: false,
        restore: None,
    }]);
    let mid = p.sample(&g, 0.25);
    let a = mid.item("a").unwrap();
    assert_eq!(a.position, Point::new(1.0, 0.0));
    assert!(a.on_canvas);
    assert!(!g.item("a").unwrap().on_canvas);
}

#[test]
fn ghosts_exist_only_in_samples() {
    let g = scene_with("a");
    let src = g.item("a").unwrap().clone();
    let p = plan(vec![Tween {
        entity: "a~b".into(),
        kind: TweenKind::Ghost(Box::new(src)),
        from: props(0.0, 1.0),
        to: props(3.0, 0.0),
        exit: false,
        restore: None,
    }]);
    assert!(p.targets().is_empty());
    assert!(p.sample(&g, 0.5).item("a~b").is_some());

    let mut settled = g.clone();
    p.settle(&mut settled);
    assert!(settled.item("a~b").is_none());
}

#[test]
fn exits_restore_their_start_values() {
    let mut g = scene_with("a");
    let start = props(0.0, 1.0);
    let p = plan(vec![Tween {
        entity: "a".into(),
        kind: TweenKind::Item,
        from: start,
        to: props(2.0, 0.0),
        exit: true,
        restore: Some(start),
    }]);
    assert_eq!(p.exits().collect::<Vec<_>>(), vec!["a"]);
    p.settle(&mut g);
    let a = g.item("a").unwrap();
    assert!(!a.on_canvas);
    assert_eq!(a.opacity, 1.0);
    assert_eq!(a.position, Point::ORIGIN);
}
