use super::*;
use crate::foundation::core::Fps;

fn frame(data: Vec<u8>, premultiplied: bool) -> FrameRGBA {
    FrameRGBA {
        width: (data.len() / 4) as u32,
        height: 1,
        data,
        premultiplied,
    }
}

#[test]
fn flatten_composites_over_background() {
    let src = frame(vec![255, 0, 0, 255, 0, 0, 0, 0, 128, 0, 0, 128], true);
    let mut dst = Vec::new();
    flatten_onto(&mut dst, &src, Color::rgb8(0, 0, 255)).unwrap();
    assert_eq!(&dst[..4], &[255, 0, 0, 255]);
    assert_eq!(&dst[4..8], &[0, 0, 255, 255]);
    assert_eq!(&dst[8..], &[128, 0, 127, 255]);
}

#[test]
fn flatten_takes_straight_alpha_as_is() {
    let src = frame(vec![255, 255, 255, 128], false);
    let mut dst = vec![9; 64];
    flatten_onto(&mut dst, &src, Color::BLACK).unwrap();
    assert_eq!(dst, [128, 128, 128, 255]);
}

#[test]
fn flatten_ignores_background_alpha() {
    let src = frame(vec![0, 0, 0, 0], true);
    let mut dst = Vec::new();
    flatten_onto(&mut dst, &src, Color::WHITE.with_alpha(0.0)).unwrap();
    assert_eq!(dst, [255, 255, 255, 255]);
}

#[test]
fn args_describe_raw_input_and_mp4_output() {
    let opts = FfmpegSinkOpts {
        overwrite: false,
        ..FfmpegSinkOpts::new("media/demo.mp4")
    };
    let cfg = SinkConfig {
        width: 32,
        height: 18,
        fps: Fps::new(30, 1).unwrap(),
    };
    let args: Vec<String> = encoder_args(&opts, cfg)
        .into_iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();

    assert_eq!(args[0], "-n");
    let after = |flag: &str| {
        let i = args.iter().position(|a| a == flag).unwrap();
        args[i + 1].clone()
    };
    assert_eq!(after("-s"), "32x18");
    assert_eq!(after("-r"), "30/1");
    assert_eq!(after("-c:v"), "libx264");
    let rate = args.iter().position(|a| a == "-r").unwrap();
    let input = args.iter().position(|a| a == "-i").unwrap();
    assert!(rate < input);
    assert_eq!(args.last().unwrap(), "media/demo.mp4");
}

#[test]
fn odd_sizes_are_rejected_before_spawning() {
    let out = std::env::temp_dir().join("mlreel_ffmpeg_odd.mp4");
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&out));
    let cfg = SinkConfig {
        width: 31,
        height: 18,
        fps: Fps::new(30, 1).unwrap(),
    };
    let err = sink.begin(cfg).unwrap_err();
    assert!(err.to_string().contains("even"));
}

#[test]
fn frames_before_begin_are_rejected() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("unused.mp4"));
    assert_eq!(sink.out_path(), std::path::Path::new("unused.mp4"));
    assert!(sink.push_frame(0, &frame(vec![0; 16], true)).is_err());
    assert!(sink.end().is_err());
}
