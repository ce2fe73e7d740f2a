use std::path::{Path, PathBuf};

use crate::{
    encode::sink::check_frame_size,
    foundation::{
        core::Fps,
        error::{SceneError, SceneResult},
    },
    render::cpu::FontOptions,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Container written by `mlreel render`.
pub enum OutputFormat {
    #[default]
    /// H.264 MP4 through the system `ffmpeg`.
    Mp4,
    /// One PNG per frame in a directory.
    Png,
}

/// Render settings loaded from JSON. Every field has a default, so `{}` is a valid config.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Frames per second.
    pub fps: u32,
    /// Output width in pixels.
    pub width_px: u32,
    /// Output height in pixels.
    pub height_px: u32,
    /// Directory default output paths are resolved against.
    pub output_dir: PathBuf,
    /// Output container.
    pub format: OutputFormat,
    /// Extra font directories, on top of system fonts.
    pub font_dirs: Vec<PathBuf>,
    /// Load the platform's installed fonts.
    pub system_fonts: bool,
    /// Replace existing output files.
    pub overwrite: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            width_px: 1280,
            height_px: 720,
            output_dir: PathBuf::from("media"),
            format: OutputFormat::Mp4,
            font_dirs: Vec::new(),
            system_fonts: true,
            overwrite: true,
        }
    }
}

impl RenderConfig {
    /// Read and validate a JSON config file.
    pub fn from_path(path: &Path) -> SceneResult<Self> {
        use anyhow::Context as _;
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read render config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject zero rates and sizes, and odd sizes for MP4.
    pub fn validate(&self) -> SceneResult<()> {
        if self.fps == 0 {
            return Err(SceneError::validation("fps must be non-zero"));
        }
        check_frame_size(
            self.width_px,
            self.height_px,
            self.format == OutputFormat::Mp4,
        )
    }

    /// `fps` as a whole-number [`Fps`].
    pub fn frame_rate(&self) -> SceneResult<Fps> {
        Fps::new(self.fps, 1)
    }

    /// Font sources for the rasterizer.
    pub fn fonts(&self) -> FontOptions {
        FontOptions {
            system_fonts: self.system_fonts,
            dirs: self.font_dirs.clone(),
        }
    }

    /// Default output location for a scene: `<dir>/<scene>.mp4` or `<dir>/<scene>/`.
    pub fn output_path(&self, scene: &str) -> PathBuf {
        match self.format {
            OutputFormat::Mp4 => self.output_dir.join(format!("{scene}.mp4")),
            OutputFormat::Png => self.output_dir.join(scene),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
