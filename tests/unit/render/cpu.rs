use super::*;
use crate::{
    foundation::{color::Color, core::FrameSpec},
    scene::model::VisualItem,
};

fn no_fonts() -> FontOptions {
    FontOptions::default()
}

#[test]
fn zero_size_is_rejected() {
    assert!(CpuRasterizer::new(0, 10, &no_fonts()).is_err());
}

#[test]
fn filled_rect_over_background() {
    let mut g = SceneGraph::new(FrameSpec::new(4.0, 4.0).unwrap(), Color::BLACK);
    let mut r = VisualItem::rect("r", 2.0, 2.0)
        .color(Color::RED)
        .fill(Color::RED, 1.0);
    r.on_canvas = true;
    g.insert_item(r).unwrap();

    let raster = CpuRasterizer::new(40, 40, &no_fonts()).unwrap();
    assert_eq!(raster.size(), (40, 40));
    let frame = raster.rasterize(&g).unwrap();
    assert!(frame.premultiplied);
    assert_eq!(frame.data.len(), 40 * 40 * 4);
    assert_eq!(frame.pixel(20, 20), Some([0xFC, 0x62, 0x55, 255]));
    assert_eq!(frame.pixel(1, 1), Some([0, 0, 0, 255]));
    assert_eq!(frame.pixel(40, 0), None);
}

#[test]
fn missing_font_dirs_are_skipped() {
    let fonts = FontOptions {
        system_fonts: false,
        dirs: vec![PathBuf::from("/definitely/not/a/font/dir")],
    };
    let raster = CpuRasterizer::new(8, 8, &fonts).unwrap();
    assert_eq!(raster.font_faces(), 0);
}

#[test]
fn malformed_svg_is_a_render_error() {
    let raster = CpuRasterizer::new(8, 8, &no_fonts()).unwrap();
    let err = raster.rasterize_svg("<svg").unwrap_err();
    assert!(err.to_string().starts_with("render error"));
}
