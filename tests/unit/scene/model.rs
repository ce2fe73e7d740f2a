use super::*;

fn graph() -> SceneGraph {
    SceneGraph::new(FrameSpec::default(), Color::BLACK)
}

fn close(a: Point, b: Point) -> bool {
    (a - b).hypot() < 1e-9
}

#[test]
fn text_size_estimates_from_longest_line() {
    let s = text_size("abc", 40.0);
    assert!((s.x - 0.825).abs() < 1e-12);
    assert!((s.y - 0.5).abs() < 1e-12);

    let s = text_size("ab\nabcd", 40.0);
    assert!((s.x - 1.1).abs() < 1e-12);
    assert!((s.y - 1.0).abs() < 1e-12);
}

#[test]
fn item_defaults_and_scaled_bounds() {
    let mut item = VisualItem::rect("r", 2.0, 1.0).at(Point::new(1.0, 1.0));
    assert_eq!(item.stroke_width, 4.0);
    assert!(!item.on_canvas);
    item.scale = 2.0;
    assert_eq!(item.bounds(), Rect::new(-1.0, 0.0, 3.0, 2.0));

    assert_eq!(VisualItem::text("t", "hi", 24.0).stroke_width, 0.0);
    assert_eq!(VisualItem::dot("d", 0.1).stroke_width, 0.0);
}

#[test]
fn duplicate_and_empty_ids_are_rejected() {
    let mut g = graph();
    g.insert_item(VisualItem::circle("a", 1.0)).unwrap();
    assert!(g.insert_item(VisualItem::circle("a", 1.0)).is_err());
    assert!(g.insert_item(VisualItem::circle("  ", 1.0)).is_err());
    g.insert_group(Group {
        id: "g".into(),
        members: vec!["a".into()],
    })
    .unwrap();
    assert!(g.insert_item(VisualItem::circle("g", 1.0)).is_err());
}

#[test]
fn degenerate_geometry_is_rejected() {
    let mut g = graph();
    assert!(g.insert_item(VisualItem::rect("r", 0.0, 1.0)).is_err());
    assert!(g.insert_item(VisualItem::circle("c", -1.0)).is_err());
    assert!(g.insert_item(VisualItem::segment("s", Vec2::ZERO)).is_err());
    assert!(g.insert_item(VisualItem::text("t", "x", f64::NAN)).is_err());
    assert!(
        g.insert_item(VisualItem::dot("d", 0.1).at(Point::new(f64::INFINITY, 0.0)))
            .is_err()
    );
}

#[test]
fn connections_need_known_non_connection_endpoints() {
    let mut g = graph();
    g.insert_item(VisualItem::circle("a", 0.5)).unwrap();
    g.insert_item(VisualItem::circle("b", 0.5).at(Point::new(3.0, 0.0))).unwrap();
    assert!(g.insert_connection(Connection::arrow("x", "a", "missing")).is_err());
    g.insert_connection(Connection::arrow("ab", "a", "b")).unwrap();
    assert!(g.insert_connection(Connection::arrow("bad", "a", "ab")).is_err());
    assert!(
        g.insert_connection(Connection::arrow("neg", "a", "b").buff(-1.0))
            .is_err()
    );
    assert_eq!(g.kind_of("ab"), Some(EntityKind::Connection));
}

#[test]
fn groups_are_flat_and_non_empty() {
    let mut g = graph();
    g.insert_item(VisualItem::circle("a", 0.5)).unwrap();
    assert!(
        g.insert_group(Group {
            id: "empty".into(),
            members: vec![],
        })
        .is_err()
    );
    g.insert_group(Group {
        id: "g".into(),
        members: vec!["a".into()],
    })
    .unwrap();
    assert!(
        g.insert_group(Group {
            id: "outer".into(),
            members: vec!["g".into()],
        })
        .is_err()
    );
    assert_eq!(g.expand("g").unwrap(), vec!["a".to_owned()]);
    assert_eq!(g.expand("a").unwrap(), vec!["a".to_owned()]);
    assert!(g.expand("nope").is_err());
}

#[test]
fn group_bounds_cover_items_only() {
    let mut g = graph();
    g.insert_item(VisualItem::rect("a", 1.0, 1.0)).unwrap();
    g.insert_item(VisualItem::rect("b", 1.0, 1.0).at(Point::new(4.0, 2.0)))
        .unwrap();
    g.insert_item(VisualItem::dot("far", 0.1).at(Point::new(-6.0, 0.0)))
        .unwrap();
    g.insert_connection(Connection::arrow("c", "far", "b")).unwrap();
    g.insert_group(Group {
        id: "g".into(),
        members: vec!["a".into(), "b".into(), "c".into()],
    })
    .unwrap();
    assert_eq!(g.bounds_of("g").unwrap(), Rect::new(-0.5, -0.5, 4.5, 2.5));
    assert!(close(g.center_of("g").unwrap(), Point::new(2.0, 1.0)));
}

#[test]
fn boundary_attachment_clips_to_outlines() {
    let mut g = graph();
    g.insert_item(VisualItem::rect("a", 2.0, 1.0)).unwrap();
    g.insert_item(VisualItem::rect("b", 2.0, 1.0).at(Point::new(5.0, 0.0)))
        .unwrap();
    g.insert_item(VisualItem::circle("c", 0.5).at(Point::new(0.0, 4.0)))
        .unwrap();

    let ab = Connection::arrow("ab", "a", "b");
    let (s, e) = g.endpoints(&ab).unwrap();
    assert!(close(s, Point::new(1.1, 0.0)));
    assert!(close(e, Point::new(3.9, 0.0)));

    let ac = Connection::arrow("ac", "a", "c").buff(0.0);
    let (s, e) = g.endpoints(&ac).unwrap();
    assert!(close(s, Point::new(0.0, 0.5)));
    assert!(close(e, Point::new(0.0, 3.5)));

    let centred = Connection::line("l", "a", "b")
        .attach(Attach::Center)
        .buff(0.0);
    let (s, e) = g.endpoints(&centred).unwrap();
    assert!(close(s, Point::ORIGIN));
    assert!(close(e, Point::new(5.0, 0.0)));
}

#[test]
fn overlapping_endpoints_collapse_to_a_point() {
    let mut g = graph();
    g.insert_item(VisualItem::rect("a", 2.0, 2.0)).unwrap();
    g.insert_item(VisualItem::rect("b", 2.0, 2.0).at(Point::new(1.0, 0.0)))
        .unwrap();
    let (s, e) = g.endpoints(&Connection::arrow("ab", "a", "b")).unwrap();
    assert!(close(s, e));
}

#[test]
fn paint_order_sorts_by_z_then_insertion() {
    let mut g = graph();
    g.insert_item(VisualItem::circle("back", 1.0)).unwrap();
    g.insert_item(VisualItem::circle("top", 1.0).z(5)).unwrap();
    g.insert_item(VisualItem::circle("under", 1.0).z(-1)).unwrap();
    g.insert_item(VisualItem::circle("front", 1.0)).unwrap();
    assert_eq!(g.paint_order(), vec!["under", "back", "front", "top"]);
}

#[test]
fn on_canvas_follows_insertion_order() {
    let mut g = graph();
    g.insert_item(VisualItem::circle("a", 1.0)).unwrap();
    g.insert_item(VisualItem::circle("b", 1.0)).unwrap();
    g.item_mut("b").unwrap().on_canvas = true;
    g.item_mut("a").unwrap().on_canvas = true;
    assert_eq!(g.on_canvas(), vec!["a".to_owned(), "b".to_owned()]);
    assert!(g.is_on_canvas("a"));
    assert!(!g.is_on_canvas("nope"));
}

#[test]
fn shapes_serialize_with_a_kind_tag() {
    let v = serde_json::to_value(Shape::Circle { radius: 1.0 }).unwrap();
    assert_eq!(v["kind"], "circle");
    let back: Shape = serde_json::from_str(r#"{"kind":"rect","width":1,"height":2}"#).unwrap();
    assert_eq!(
        back,
        Shape::Rect {
            width: 1.0,
            height: 2.0,
            corner_radius: 0.0
        }
    );
}

#[test]
fn in_place_mutation_bypasses_authoring_checks() {
    let mut g = graph();
    g.insert_item(VisualItem::circle("a", 1.0)).unwrap();
    g.insert_item(VisualItem::circle("b", 1.0).z(1)).unwrap();

    g.item_mut("a").unwrap().on_canvas = true;
    assert!(g.is_on_canvas("a"));
    assert_eq!(g.on_canvas(), vec!["a".to_owned()]);

    // A zero radius would fail insert_item; transients are not validated.
    g.insert_transient(VisualItem::circle("ghost", 0.0));
    assert_eq!(g.paint_order(), vec!["a", "ghost", "b"]);
    assert!(g.item_mut("missing").is_none());
    assert!(g.connection_mut("a").is_none());
}
