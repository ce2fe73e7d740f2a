use std::path::{Path, PathBuf};

use crate::{
    foundation::{
        core::Fps,
        error::{SceneError, SceneResult},
    },
    render::backend::FrameRGBA,
};

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
}

/// Consumer of rendered frames.
///
/// Ordering contract: `push_frame` is called with strictly increasing frame indices, starting at 0.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> SceneResult<()>;
    /// Push one frame in timeline order.
    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> SceneResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> SceneResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(u64, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Frames in timeline order.
    pub fn frames(&self) -> &[(u64, FrameRGBA)] {
        &self.frames
    }

    /// `true` once [`FrameSink::end`] has been called.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> SceneResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> SceneResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> SceneResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Sink that counts frames and keeps only the most recent one.
#[derive(Debug, Default)]
pub struct CountingSink {
    count: u64,
    last: Option<FrameRGBA>,
}

impl CountingSink {
    /// Frames pushed since the last `begin`.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Most recent frame, if any.
    pub fn last(&self) -> Option<&FrameRGBA> {
        self.last.as_ref()
    }
}

impl FrameSink for CountingSink {
    fn begin(&mut self, _cfg: SinkConfig) -> SceneResult<()> {
        self.count = 0;
        self.last = None;
        Ok(())
    }

    fn push_frame(&mut self, _idx: u64, frame: &FrameRGBA) -> SceneResult<()> {
        self.count += 1;
        self.last = Some(frame.clone());
        Ok(())
    }

    fn end(&mut self) -> SceneResult<()> {
        Ok(())
    }
}

/// Writes `frame_00000.png`, `frame_00001.png`, ... into one directory.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    overwrite: bool,
    written: u64,
    scratch: Vec<u8>,
}

impl PngSequenceSink {
    /// Sink writing into `dir`; with `overwrite` unset, existing frames are an error.
    pub fn new(dir: impl Into<PathBuf>, overwrite: bool) -> Self {
        Self {
            dir: dir.into(),
            overwrite,
            written: 0,
            scratch: Vec::new(),
        }
    }

    /// File that frame `idx` is written to.
    pub fn frame_path(&self, idx: u64) -> PathBuf {
        self.dir.join(format!("frame_{idx:05}.png"))
    }

    /// Frames written since the last `begin`.
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> SceneResult<()> {
        check_frame_size(cfg.width, cfg.height, false)?;
        ensure_dir(&self.dir)?;
        let first = self.frame_path(0);
        if !self.overwrite && first.exists() {
            return Err(SceneError::validation(format!(
                "output file '{}' already exists",
                first.display()
            )));
        }
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> SceneResult<()> {
        let path = self.frame_path(idx);
        let data: &[u8] = if frame.premultiplied {
            self.scratch.resize(frame.data.len(), 0);
            unpremultiply_rgba8(&mut self.scratch, &frame.data)?;
            &self.scratch
        } else {
            &frame.data
        };
        image::save_buffer_with_format(
            &path,
            data,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| SceneError::encode(format!("write png '{}': {e}", path.display())))?;
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> SceneResult<()> {
        tracing::info!(dir = %self.dir.display(), frames = self.written, "png sequence written");
        Ok(())
    }
}

/// Reject zero-sized frames, and odd sizes when the output is chroma-subsampled (`even`).
pub fn check_frame_size(width: u32, height: u32, even: bool) -> SceneResult<()> {
    if width == 0 || height == 0 {
        return Err(SceneError::validation(format!(
            "frame size {width}x{height} must be non-zero"
        )));
    }
    if even && !(width.is_multiple_of(2) && height.is_multiple_of(2)) {
        return Err(SceneError::validation(format!(
            "frame size {width}x{height} must be even for yuv420p mp4 output"
        )));
    }
    Ok(())
}

/// Create `path`'s parent directory if it is missing.
pub fn ensure_parent_dir(path: &Path) -> SceneResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

/// Create `dir` and any missing parents.
pub fn ensure_dir(dir: &Path) -> SceneResult<()> {
    use anyhow::Context as _;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create output directory '{}'", dir.display()))?;
    Ok(())
}

/// Convert premultiplied RGBA8 to straight alpha.
pub fn unpremultiply_rgba8(dst: &mut [u8], src: &[u8]) -> SceneResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(SceneError::validation(
            "unpremultiply_rgba8 expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u32::from(s[3]);
        match a {
            0 => d.copy_from_slice(&[0, 0, 0, 0]),
            255 => d.copy_from_slice(s),
            _ => {
                for c in 0..3 {
                    d[c] = ((u32::from(s[c]) * 255 + a / 2) / a).min(255) as u8;
                }
                d[3] = s[3];
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
