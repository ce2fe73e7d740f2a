use crate::foundation::error::{SceneError, SceneResult};

pub use kurbo::{Point, Rect, Vec2};

/// Default visible frame height in scene units.
pub const DEFAULT_FRAME_HEIGHT: f64 = 8.0;
/// Default visible frame width in scene units (16:9).
pub const DEFAULT_FRAME_WIDTH: f64 = DEFAULT_FRAME_HEIGHT * 16.0 / 9.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Output frame rate as a rational number.
pub struct Fps {
    /// Numerator.
    pub num: u32,
    /// Denominator; must be > 0.
    pub den: u32,
}

impl Fps {
    /// Build a validated frame rate.
    pub fn new(num: u32, den: u32) -> SceneResult<Self> {
        if den == 0 {
            return Err(SceneError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(SceneError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Frames per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Timestamp of a frame boundary.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Nearest frame boundary for a timestamp. Negative input clamps to 0.
    pub fn secs_to_frames_round(self, secs: f64) -> u64 {
        (secs * self.as_f64()).round().max(0.0) as u64
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 30, den: 1 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Visible region of a scene in scene units.
///
/// The origin sits at the frame centre and `+y` points up.
pub struct FrameSpec {
    /// Visible width.
    pub width: f64,
    /// Visible height.
    pub height: f64,
}

impl Default for FrameSpec {
    fn default() -> Self {
        Self {
            width: DEFAULT_FRAME_WIDTH,
            height: DEFAULT_FRAME_HEIGHT,
        }
    }
}

impl FrameSpec {
    /// Validated frame dimensions.
    pub fn new(width: f64, height: f64) -> SceneResult<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(SceneError::validation(
                "frame width/height must be finite and > 0",
            ));
        }
        Ok(Self { width, height })
    }

    /// Frame bounds centred on the origin.
    pub fn bounds(self) -> Rect {
        Rect::new(
            -self.width * 0.5,
            -self.height * 0.5,
            self.width * 0.5,
            self.height * 0.5,
        )
    }

    /// Inclusive containment with a small tolerance for accumulated float error.
    pub fn contains(self, p: Point) -> bool {
        const EPS: f64 = 1e-9;
        let b = self.bounds();
        p.x >= b.x0 - EPS && p.x <= b.x1 + EPS && p.y >= b.y0 - EPS && p.y <= b.y1 + EPS
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Screen direction in scene space (+y up).
pub enum Direction {
    /// Towards +y.
    Up,
    /// Towards -y.
    Down,
    /// Towards -x.
    Left,
    /// Towards +x.
    Right,
}

impl Direction {
    /// Unit vector for this direction.
    pub fn unit(self) -> Vec2 {
        match self {
            Self::Up => Vec2::new(0.0, 1.0),
            Self::Down => Vec2::new(0.0, -1.0),
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::Right => Vec2::new(1.0, 0.0),
        }
    }

    /// `unit() * len`.
    pub fn by(self, len: f64) -> Vec2 {
        self.unit() * len
    }

    /// True for left/right.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
