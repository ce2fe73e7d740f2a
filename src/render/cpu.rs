use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    foundation::error::{SceneError, SceneResult},
    render::{backend::FrameRGBA, svg::scene_to_svg},
    scene::model::SceneGraph,
};

/// Font sources used when text is rasterized.
#[derive(Clone, Debug, Default)]
pub struct FontOptions {
    /// Load the platform's installed fonts.
    pub system_fonts: bool,
    /// Extra directories scanned for `.ttf`/`.otf`/`.ttc` files.
    pub dirs: Vec<PathBuf>,
}

/// CPU rasterizer: scene -> SVG -> `resvg` pixmap.
pub struct CpuRasterizer {
    width: u32,
    height: u32,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl CpuRasterizer {
    /// Rasterizer for `width` x `height` frames, loading fonts from `fonts`.
    pub fn new(width: u32, height: u32, fonts: &FontOptions) -> SceneResult<Self> {
        if width == 0 || height == 0 {
            return Err(SceneError::validation(
                "raster width/height must be non-zero",
            ));
        }
        Ok(Self {
            width,
            height,
            fontdb: build_fontdb(fonts),
        })
    }

    /// Output size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of font faces available to text.
    pub fn font_faces(&self) -> usize {
        self.fontdb.faces().count()
    }

    /// Rasterize one scene state.
    pub fn rasterize(&self, scene: &SceneGraph) -> SceneResult<FrameRGBA> {
        let svg = scene_to_svg(scene, self.width, self.height)?;
        self.rasterize_svg(&svg)
    }

    /// Rasterize an SVG document into a premultiplied frame of this rasterizer's size.
    pub fn rasterize_svg(&self, svg: &str) -> SceneResult<FrameRGBA> {
        let opts = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(svg, &opts)
            .map_err(|e| SceneError::render(format!("parse svg frame: {e}")))?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(self.width, self.height)
            .ok_or_else(|| SceneError::render("failed to allocate frame pixmap"))?;
        let sx = self.width as f32 / tree.size().width();
        let sy = self.height as f32 / tree.size().height();
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::from_scale(sx, sy),
            &mut pixmap.as_mut(),
        );

        Ok(FrameRGBA {
            width: self.width,
            height: self.height,
            data: pixmap.take(),
            premultiplied: true,
        })
    }
}

fn build_fontdb(fonts: &FontOptions) -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    if fonts.system_fonts {
        db.load_system_fonts();
    }
    for dir in &fonts.dirs {
        load_fonts_from_dir(&mut db, dir);
    }
    Arc::new(db)
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let rd = match std::fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "font directory unreadable");
            return;
        }
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(font = %path.display(), error = %e, "font file skipped");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
