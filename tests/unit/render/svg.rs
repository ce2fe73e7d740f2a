use super::*;
use crate::{
    foundation::core::FrameSpec,
    scene::model::{Attach, Tip},
};

fn scene() -> SceneGraph {
    SceneGraph::new(FrameSpec::new(16.0, 9.0).unwrap(), Color::BLACK)
}

fn shown(mut item: VisualItem) -> VisualItem {
    item.on_canvas = true;
    item
}

#[test]
fn viewport_maps_centre_and_flips_y() {
    let g = scene();
    let vp = Viewport::new(&g, 1600, 900).unwrap();
    assert_eq!(vp.point(Point::ORIGIN), (800.0, 450.0));
    assert_eq!(vp.point(Point::new(-8.0, 4.5)), (0.0, 0.0));
    assert_eq!(vp.len(1.0), 100.0);
    assert_eq!(vp.stroke(4.0), 4.0 * 900.0 / 1080.0);
    assert!(Viewport::new(&g, 0, 900).is_err());
}

#[test]
fn empty_scene_is_just_the_background() {
    let svg = scene_to_svg(&scene(), 160, 90).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.ends_with("</svg>"));
    assert!(svg.contains(r##"fill="#000000""##));
    assert_eq!(svg.matches("<rect").count(), 1);
}

#[test]
fn only_on_canvas_items_are_drawn() {
    let mut g = scene();
    g.insert_item(VisualItem::circle("hidden", 1.0)).unwrap();
    g.insert_item(shown(VisualItem::circle("c", 1.0).color(Color::RED)))
        .unwrap();
    let svg = scene_to_svg(&g, 160, 90).unwrap();
    assert_eq!(svg.matches("<circle").count(), 1);
    assert!(svg.contains(r##"stroke="#fc6255""##));
}

#[test]
fn partial_reveal_dashes_the_outline() {
    let mut g = scene();
    let mut c = shown(VisualItem::rect("r", 2.0, 1.0));
    c.reveal = 0.5;
    g.insert_item(c).unwrap();
    let svg = scene_to_svg(&g, 160, 90).unwrap();
    assert!(svg.contains("stroke-dasharray"));
}

#[test]
fn writing_text_hides_the_tail() {
    let mut g = scene();
    let mut t = shown(VisualItem::text("t", "a<b", 48.0));
    t.reveal = 0.5;
    g.insert_item(t).unwrap();
    let svg = scene_to_svg(&g, 160, 90).unwrap();
    assert!(svg.contains(r#"xml:space="preserve">a&lt;<tspan fill-opacity="0">b</tspan>"#));
}

#[test]
fn double_tipped_connections_get_two_heads() {
    let mut g = scene();
    g.insert_item(VisualItem::dot("a", 0.01).at(Point::new(-2.0, 0.0)))
        .unwrap();
    g.insert_item(VisualItem::dot("b", 0.01).at(Point::new(2.0, 0.0)))
        .unwrap();
    let mut c = Connection::arrow("ab", "a", "b")
        .tip(Tip::Both)
        .attach(Attach::Center)
        .buff(0.0);
    c.on_canvas = true;
    g.insert_connection(c).unwrap();
    let svg = scene_to_svg(&g, 160, 90).unwrap();
    assert_eq!(svg.matches("<polygon").count(), 2);
    assert!(svg.contains("<path d=\"M 60.00 45.00 Q"));
}

#[test]
fn escape_covers_markup_characters() {
    assert_eq!(escape_xml(r#"<a & 'b' "c">"#), "&lt;a &amp; &apos;b&apos; &quot;c&quot;&gt;");
}
