use std::{
    ffi::OsString,
    io::Write as _,
    path::PathBuf,
    process::{Child, ChildStdin, Command, Stdio},
};

use crate::{
    encode::sink::{
        FrameSink, SinkConfig, check_frame_size, ensure_parent_dir, unpremultiply_rgba8,
    },
    foundation::{
        color::Color,
        error::{SceneError, SceneResult},
    },
    render::backend::FrameRGBA,
};

/// Options for [`FfmpegSink`].
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Replace an existing file at `out_path`.
    pub overwrite: bool,
    /// Colour that transparent pixels are flattened onto; H.264 carries no alpha.
    pub background: Color,
}

impl FfmpegSinkOpts {
    /// Overwriting, black-background options for `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            background: Color::BLACK,
        }
    }
}

/// Streams frames as raw RGBA into a system `ffmpeg` process that writes libx264/yuv420p MP4.
#[derive(Debug)]
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    running: Option<Encoder>,
}

#[derive(Debug)]
struct Encoder {
    child: Child,
    stdin: ChildStdin,
    /// Flattened copy of the current frame.
    opaque: Vec<u8>,
}

impl FfmpegSink {
    /// Sink that starts `ffmpeg` on [`FrameSink::begin`].
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            running: None,
        }
    }

    /// MP4 path this sink writes.
    pub fn out_path(&self) -> &std::path::Path {
        &self.opts.out_path
    }
}

/// Command line for one encode: raw RGBA on stdin, MP4 at `opts.out_path`.
pub(crate) fn encoder_args(opts: &FfmpegSinkOpts, cfg: SinkConfig) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![if opts.overwrite { "-y" } else { "-n" }.into()];
    let size = format!("{}x{}", cfg.width, cfg.height);
    let rate = format!("{}/{}", cfg.fps.num, cfg.fps.den);
    // `-r` must precede `-i` to set the rawvideo input rate.
    let input = [
        "-loglevel",
        "error",
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgba",
        "-s",
        size.as_str(),
        "-r",
        rate.as_str(),
        "-i",
        "pipe:0",
    ];
    let output = [
        "-an",
        "-c:v",
        "libx264",
        "-pix_fmt",
        "yuv420p",
        "-movflags",
        "+faststart",
    ];
    args.extend(input.iter().chain(&output).map(|a| OsString::from(*a)));
    args.push(opts.out_path.clone().into_os_string());
    args
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> SceneResult<()> {
        check_frame_size(cfg.width, cfg.height, true)?;
        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(SceneError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        let mut child = Command::new("ffmpeg")
            .args(encoder_args(&self.opts, cfg))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    SceneError::encode("ffmpeg is required for MP4 output but is not on PATH")
                }
                _ => SceneError::encode(format!("spawn ffmpeg: {e}")),
            })?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| SceneError::encode("ffmpeg stdin is not piped"))?;

        tracing::debug!(
            out = %self.opts.out_path.display(),
            width = cfg.width,
            height = cfg.height,
            "ffmpeg started"
        );
        self.running = Some(Encoder {
            child,
            stdin,
            opaque: Vec::new(),
        });
        Ok(())
    }

    fn push_frame(&mut self, _idx: u64, frame: &FrameRGBA) -> SceneResult<()> {
        let enc = self
            .running
            .as_mut()
            .ok_or_else(|| SceneError::encode("ffmpeg sink not started"))?;
        flatten_onto(&mut enc.opaque, frame, self.opts.background)?;
        enc.stdin
            .write_all(&enc.opaque)
            .map_err(|e| SceneError::encode(format!("write frame to ffmpeg: {e}")))
    }

    fn end(&mut self) -> SceneResult<()> {
        let Encoder { child, stdin, .. } = self
            .running
            .take()
            .ok_or_else(|| SceneError::encode("ffmpeg sink not started"))?;
        // Closing stdin is the end-of-stream signal.
        drop(stdin);
        // stderr is only read here; `-loglevel error` keeps it well under the pipe buffer.
        let output = child
            .wait_with_output()
            .map_err(|e| SceneError::encode(format!("wait for ffmpeg: {e}")))?;
        if !output.status.success() {
            return Err(SceneError::encode(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        tracing::info!(out = %self.opts.out_path.display(), "mp4 written");
        Ok(())
    }
}

/// Composite `frame` over an opaque `background` into `dst` as straight RGBA8 with alpha 255.
pub fn flatten_onto(dst: &mut Vec<u8>, frame: &FrameRGBA, background: Color) -> SceneResult<()> {
    dst.resize(frame.data.len(), 0);
    if frame.premultiplied {
        unpremultiply_rgba8(dst, &frame.data)?;
    } else {
        dst.copy_from_slice(&frame.data);
    }
    let bg = background.with_alpha(1.0);
    for px in dst.chunks_exact_mut(4) {
        if px[3] == u8::MAX {
            continue;
        }
        let fg = Color::rgb8(px[0], px[1], px[2]);
        let alpha = f64::from(px[3]) / 255.0;
        px.copy_from_slice(&bg.lerp(fg, alpha).to_rgba8());
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
