use super::*;

#[test]
fn step_defaults() {
    let step = TimelineStep::new([Action::appear("a")]);
    assert_eq!(step.run_time, DEFAULT_RUN_TIME);
    assert_eq!(step.ease, Ease::Smooth);
    assert_eq!(step.wait_after, 0.0);
    assert_eq!(step.elapsed(), 1.0);
}

#[test]
fn elapsed_ignores_action_count() {
    let one = TimelineStep::new([Action::appear("a")]).run_time(2.0).wait(1.0);
    let many = TimelineStep::new((0..10).map(|i| Action::appear(format!("a{i}"))))
        .run_time(2.0)
        .wait(1.0);
    assert_eq!(one.elapsed(), many.elapsed());
}

#[test]
fn timings_are_validated() {
    assert!(TimelineStep::new([Action::appear("a")]).run_time(-0.5).validate(0).is_err());
    assert!(TimelineStep::new([Action::appear("a")]).run_time(0.0).validate(0).is_err());
    assert!(TimelineStep::new([Action::appear("a")]).wait(f64::NAN).validate(0).is_err());
    assert!(TimelineStep::pause(2.0).validate(0).is_ok());
}

#[test]
fn animate_changes_are_validated() {
    let empty = TimelineStep::new([Action::animate("a", PropChange::default())]);
    assert!(empty.validate(0).is_err());
    assert!(TimelineStep::new([Action::scale("a", -1.0)]).validate(0).is_err());
    assert!(TimelineStep::new([Action::set_opacity("a", 1.5)]).validate(0).is_err());
    assert!(TimelineStep::new([Action::set_opacity("a", 0.5)]).validate(0).is_ok());
    let err = TimelineStep::new([Action::scale("a", f64::INFINITY)])
        .validate(7)
        .unwrap_err();
    assert!(err.to_string().contains("step 7"));
}

#[test]
fn wait_extends_the_last_step_or_opens_with_a_pause() {
    let mut t = Timeline::default();
    t.wait(1.5);
    assert_eq!(t.steps.len(), 1);
    assert!(t.steps[0].actions.is_empty());

    t.push(TimelineStep::new([Action::appear("a")]));
    t.wait(2.0);
    t.wait(0.5);
    assert_eq!(t.steps.len(), 2);
    assert_eq!(t.steps[1].wait_after, 2.5);
    assert_eq!(t.total_duration(), 1.5 + 1.0 + 2.5);
}

#[test]
fn referenced_ids_include_replacements_but_not_canvas_targets() {
    let mut t = Timeline::default();
    t.push(TimelineStep::new([
        Action::write("title"),
        Action::transform_into("old", "new"),
    ]));
    t.push(TimelineStep::new([Action::clear(Vec2::ZERO)]));
    let ids: Vec<&str> = t.referenced_ids().collect();
    assert_eq!(ids, vec!["title", "old", "new"]);
}

#[test]
fn constructors_map_to_ops() {
    assert_eq!(
        Action::fade_in("a").op,
        Op::FadeIn { shift: Vec2::ZERO }
    );
    assert_eq!(Action::clear(Vec2::new(0.0, -0.5)).target, Target::OnCanvas);
    let Op::Animate(change) = Action::move_to("a", Point::new(1.0, 2.0)).op else {
        panic!("expected animate");
    };
    assert_eq!(change.move_to, Some(Point::new(1.0, 2.0)));
    assert!(change.scale.is_none());
}

#[test]
fn actions_serialize_flat() {
    let v = serde_json::to_value(Action::recolor("a", Color::RED)).unwrap();
    assert_eq!(v["op"], "animate");
    assert_eq!(v["target"]["id"], "a");
    assert_eq!(v["color"], "#fc6255");
}
