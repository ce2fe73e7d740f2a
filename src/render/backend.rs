use crate::{
    foundation::error::SceneResult, scene::model::SceneGraph, timeline::plan::StepPlan,
};

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGBA of one pixel, `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Collaborator the sequencer drives, one step at a time.
///
/// Calls arrive in timeline order and never overlap. `scene` is always the state *before* the
/// call's change: for [`Renderer::animate`] the plan describes how to get from it to the end
/// state; for [`Renderer::hold`] it is the state to keep on screen.
pub trait Renderer {
    /// Play one step's tweens over `plan.run_time` seconds.
    fn animate(&mut self, scene: &SceneGraph, plan: &StepPlan) -> SceneResult<()>;

    /// Keep `scene` on screen for `secs` seconds.
    fn hold(&mut self, scene: &SceneGraph, secs: f64) -> SceneResult<()>;

    /// An entity left the canvas at the end of the last animation.
    fn remove(&mut self, _id: &str) -> SceneResult<()> {
        Ok(())
    }

    /// No more calls will follow.
    fn finish(&mut self) -> SceneResult<()> {
        Ok(())
    }
}
