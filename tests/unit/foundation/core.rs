use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    assert!(Fps::new(30000, 1001).is_ok());
}

#[test]
fn fps_rounds_to_nearest_frame_boundary() {
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.secs_to_frames_round(1.0), 30);
    assert_eq!(fps.secs_to_frames_round(0.51 / 30.0), 1);
    assert_eq!(fps.secs_to_frames_round(0.49 / 30.0), 0);
    assert_eq!(fps.secs_to_frames_round(-3.0), 0);
    assert!((fps.frames_to_secs(45) - 1.5).abs() < 1e-12);
}

#[test]
fn default_frame_is_sixteen_by_nine() {
    let f = FrameSpec::default();
    assert_eq!(f.height, 8.0);
    assert!((f.width / f.height - 16.0 / 9.0).abs() < 1e-12);
    let b = f.bounds();
    assert_eq!(b.center(), Point::ORIGIN);
    assert!(f.contains(Point::new(b.x1, b.y0)));
    assert!(!f.contains(Point::new(b.x1 + 0.01, 0.0)));
}

#[test]
fn frame_rejects_degenerate_sizes() {
    assert!(FrameSpec::new(0.0, 1.0).is_err());
    assert!(FrameSpec::new(1.0, f64::NAN).is_err());
    assert!(FrameSpec::new(-2.0, 1.0).is_err());
}

#[test]
fn direction_units_point_the_right_way() {
    assert_eq!(Direction::Up.unit(), Vec2::new(0.0, 1.0));
    assert_eq!(Direction::Left.by(2.0), Vec2::new(-2.0, 0.0));
    assert!(Direction::Right.is_horizontal());
    assert!(!Direction::Down.is_horizontal());
}
