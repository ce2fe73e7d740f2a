use super::*;
use crate::{
    encode::sink::{CountingSink, InMemorySink},
    foundation::{color::Color, core::Point},
    scene::{dsl::SceneBuilder, model::VisualItem},
    timeline::step::{Action, TimelineStep},
};

fn small_config(fps: u32) -> RenderConfig {
    RenderConfig {
        fps,
        width_px: 32,
        height_px: 18,
        system_fonts: false,
        format: OutputFormat::Png,
        ..RenderConfig::default()
    }
}

fn boxed_scene() -> Scene {
    let mut s = SceneBuilder::new("boxed");
    s.add(
        VisualItem::rect("box", 4.0, 4.0)
            .color(Color::RED)
            .fill(Color::RED, 1.0),
    )
    .unwrap();
    s.play(TimelineStep::new([Action::appear("box")]));
    s.wait(0.5);
    s.play(TimelineStep::new([Action::shift("box", crate::Vec2::new(1.0, 0.0))]).run_time(0.5));
    s.build().unwrap()
}

#[test]
fn frame_count_matches_rounded_duration() {
    let scene = boxed_scene();
    let mut sink = InMemorySink::new();
    let report = render_scene(&scene, &small_config(10), &mut sink).unwrap();

    assert_eq!(report.duration_secs, 2.0);
    assert_eq!(sink.frames().len(), 20);
    assert!(sink.is_ended());
    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height, cfg.fps.num), (32, 18, 10));
    for (i, (idx, _)) in sink.frames().iter().enumerate() {
        assert_eq!(*idx, i as u64);
    }
}

#[test]
fn uneven_steps_do_not_drift() {
    let mut s = SceneBuilder::new("uneven");
    for i in 0..3 {
        s.add(VisualItem::dot(format!("d{i}"), 0.2)).unwrap();
        s.play(TimelineStep::new([Action::grow(format!("d{i}").as_str())]).run_time(0.33));
    }
    let scene = s.build().unwrap();
    let mut sink = CountingSink::default();
    render_scene(&scene, &small_config(10), &mut sink).unwrap();
    assert_eq!(sink.count(), 10);
}

#[test]
fn invalid_config_fails_before_rendering() {
    let scene = boxed_scene();
    let mut sink = InMemorySink::new();
    let cfg = RenderConfig {
        fps: 0,
        ..small_config(10)
    };
    assert!(render_scene(&scene, &cfg, &mut sink).is_err());
    assert!(sink.config().is_none());
}

#[test]
fn snapshots_track_playback_time() {
    let scene = boxed_scene();
    let start = snapshot_at(&scene, 0.0).unwrap();
    let b = start.item("box").unwrap();
    assert!(b.on_canvas);
    assert!(b.reveal < 1e-9);

    let holding = snapshot_at(&scene, 1.2).unwrap();
    assert_eq!(holding.item("box").unwrap().reveal, 1.0);
    assert_eq!(holding.item("box").unwrap().position, Point::ORIGIN);

    let end = snapshot_at(&scene, 100.0).unwrap();
    assert_eq!(end.item("box").unwrap().position, Point::new(1.0, 0.0));
}

#[test]
fn still_frame_shows_the_filled_box() {
    let scene = boxed_scene();
    let cfg = RenderConfig {
        width_px: 64,
        height_px: 36,
        ..small_config(10)
    };
    let frame = render_still(&scene, 1.2, &cfg).unwrap();
    assert_eq!((frame.width, frame.height), (64, 36));
    assert_eq!(frame.pixel(32, 18), Some([0xFC, 0x62, 0x55, 255]));
    assert_eq!(frame.pixel(1, 1), Some([0, 0, 0, 255]));
}

#[test]
fn png_output_lands_in_a_directory() {
    let dir = std::env::temp_dir().join(format!("mlreel_pipeline_png_{}", std::process::id()));
    let scene = boxed_scene();
    let (path, report) = render_to_path(&scene, &small_config(4), Some(dir.clone())).unwrap();
    assert_eq!(path, dir);
    assert_eq!(report.steps.len(), 2);
    assert!(dir.join("frame_00000.png").is_file());
    assert!(dir.join("frame_00007.png").is_file());
    assert!(!dir.join("frame_00008.png").exists());
    let _ = std::fs::remove_dir_all(&dir);
}
