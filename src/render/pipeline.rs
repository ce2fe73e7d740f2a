use std::path::PathBuf;

use crate::{
    config::{OutputFormat, RenderConfig},
    encode::{
        ffmpeg::{FfmpegSink, FfmpegSinkOpts},
        sink::{FrameSink, PngSequenceSink, SinkConfig},
    },
    foundation::{core::Fps, error::SceneResult},
    render::{
        backend::{FrameRGBA, Renderer},
        cpu::CpuRasterizer,
    },
    scene::{dsl::Scene, model::SceneGraph},
    timeline::{
        plan::StepPlan,
        sequencer::{PlaybackReport, Sequencer},
    },
};

/// Renderer that samples every step at a fixed frame rate and pushes rasterized frames to a sink.
///
/// Frame counts come from cumulative time: a step ending at `t` seconds closes at frame
/// `round(t * fps)`, so rounding never drifts and the total is `round(duration * fps)`.
pub struct FrameRenderer<'s, S: FrameSink + ?Sized> {
    raster: CpuRasterizer,
    fps: Fps,
    sink: &'s mut S,
    clock: f64,
    emitted: u64,
}

impl<'s, S: FrameSink + ?Sized> FrameRenderer<'s, S> {
    /// Renderer rasterizing with `raster` at `fps`. Calls `sink.begin` immediately.
    pub fn new(raster: CpuRasterizer, fps: Fps, sink: &'s mut S) -> SceneResult<Self> {
        let (width, height) = raster.size();
        sink.begin(SinkConfig { width, height, fps })?;
        Ok(Self {
            raster,
            fps,
            sink,
            clock: 0.0,
            emitted: 0,
        })
    }

    /// Frames pushed to the sink so far.
    pub fn frames_emitted(&self) -> u64 {
        self.emitted
    }

    /// Frames owed to advance the clock by `secs`.
    fn frames_until(&mut self, secs: f64) -> u64 {
        self.clock += secs;
        self.fps
            .secs_to_frames_round(self.clock)
            .saturating_sub(self.emitted)
    }

    fn push(&mut self, frame: &FrameRGBA) -> SceneResult<()> {
        self.sink.push_frame(self.emitted, frame)?;
        self.emitted += 1;
        Ok(())
    }
}

impl<S: FrameSink + ?Sized> Renderer for FrameRenderer<'_, S> {
    #[tracing::instrument(skip_all, fields(step = plan.index))]
    fn animate(&mut self, scene: &SceneGraph, plan: &StepPlan) -> SceneResult<()> {
        let n = self.frames_until(plan.run_time);
        for k in 1..=n {
            let sampled = plan.sample(scene, k as f64 / n as f64);
            let frame = self.raster.rasterize(&sampled)?;
            self.push(&frame)?;
        }
        Ok(())
    }

    fn hold(&mut self, scene: &SceneGraph, secs: f64) -> SceneResult<()> {
        let n = self.frames_until(secs);
        if n == 0 {
            return Ok(());
        }
        let frame = self.raster.rasterize(scene)?;
        for _ in 0..n {
            self.push(&frame)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> SceneResult<()> {
        self.sink.end()
    }
}

/// Play `scene` into `sink` using the raster size and rate from `cfg`.
#[tracing::instrument(skip_all, fields(scene = %scene.name))]
pub fn render_scene(
    scene: &Scene,
    cfg: &RenderConfig,
    sink: &mut dyn FrameSink,
) -> SceneResult<PlaybackReport> {
    cfg.validate()?;
    let raster = CpuRasterizer::new(cfg.width_px, cfg.height_px, &cfg.fonts())?;
    let mut renderer = FrameRenderer::new(raster, cfg.frame_rate()?, sink)?;
    let report = scene.play(&mut renderer)?;
    tracing::info!(frames = renderer.frames_emitted(), "frames rendered");
    Ok(report)
}

/// Render `scene` to `out` (or the config's default location) in the configured format.
pub fn render_to_path(
    scene: &Scene,
    cfg: &RenderConfig,
    out: Option<PathBuf>,
) -> SceneResult<(PathBuf, PlaybackReport)> {
    let path = out.unwrap_or_else(|| cfg.output_path(&scene.name));
    let report = match cfg.format {
        OutputFormat::Mp4 => {
            let opts = FfmpegSinkOpts {
                overwrite: cfg.overwrite,
                background: scene.graph.background,
                ..FfmpegSinkOpts::new(&path)
            };
            render_scene(scene, cfg, &mut FfmpegSink::new(opts))?
        }
        OutputFormat::Png => {
            render_scene(scene, cfg, &mut PngSequenceSink::new(&path, cfg.overwrite))?
        }
    };
    Ok((path, report))
}

/// Scene state at `secs` seconds into playback. Times past the end give the final state.
pub fn snapshot_at(scene: &Scene, secs: f64) -> SceneResult<SceneGraph> {
    let mut capture = StateCapture {
        at: secs.max(0.0),
        clock: 0.0,
        captured: None,
    };
    let mut graph = scene.graph.clone();
    Sequencer::new(&scene.timeline).run(&mut graph, &mut capture)?;
    Ok(capture.captured.unwrap_or(graph))
}

/// One rasterized frame at `secs` seconds into playback.
pub fn render_still(scene: &Scene, secs: f64, cfg: &RenderConfig) -> SceneResult<FrameRGBA> {
    let state = snapshot_at(scene, secs)?;
    CpuRasterizer::new(cfg.width_px, cfg.height_px, &cfg.fonts())?.rasterize(&state)
}

/// Captures the first sampled state whose time span contains `at`.
struct StateCapture {
    at: f64,
    clock: f64,
    captured: Option<SceneGraph>,
}

impl Renderer for StateCapture {
    fn animate(&mut self, scene: &SceneGraph, plan: &StepPlan) -> SceneResult<()> {
        let end = self.clock + plan.run_time;
        if self.captured.is_none() && self.at < end {
            let t = (self.at - self.clock) / plan.run_time;
            self.captured = Some(plan.sample(scene, t));
        }
        self.clock = end;
        Ok(())
    }

    fn hold(&mut self, scene: &SceneGraph, secs: f64) -> SceneResult<()> {
        let end = self.clock + secs;
        if self.captured.is_none() && self.at < end {
            self.captured = Some(scene.clone());
        }
        self.clock = end;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
